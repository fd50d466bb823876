//! Inbound payload validation shared by the HTTP and MCP surfaces.
//!
//! Each validator collects every violated rule so callers can report them
//! together, and returns [`CatalogError::Validation`] if any rule failed.

use uuid::Uuid;

use crate::catalog::{ItemPatch, NewItem};
use crate::error::CatalogError;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MAX_CATEGORY_LEN: usize = 50;
pub const MAX_TAGS: usize = 10;
pub const MAX_TAG_LEN: usize = 30;
pub const MAX_QUERY_LEN: usize = 100;
pub const MAX_LIMIT: usize = 50;
pub const DEFAULT_SEARCH_LIMIT: usize = 10;
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 5;

fn chars(s: &str) -> usize {
    s.chars().count()
}

fn check_name(name: &str, errors: &mut Vec<String>) {
    if name.trim().is_empty() {
        errors.push("Name cannot be empty".into());
    } else if chars(name) > MAX_NAME_LEN {
        errors.push(format!("Name cannot exceed {MAX_NAME_LEN} characters"));
    }
}

fn check_optional_fields(
    description: Option<&str>,
    category: Option<&str>,
    tags: Option<&[String]>,
    errors: &mut Vec<String>,
) {
    if description.is_some_and(|d| chars(d) > MAX_DESCRIPTION_LEN) {
        errors.push(format!(
            "Description cannot exceed {MAX_DESCRIPTION_LEN} characters"
        ));
    }
    if category.is_some_and(|c| chars(c) > MAX_CATEGORY_LEN) {
        errors.push(format!(
            "Category cannot exceed {MAX_CATEGORY_LEN} characters"
        ));
    }
    if let Some(tags) = tags {
        if tags.len() > MAX_TAGS {
            errors.push(format!("Cannot have more than {MAX_TAGS} tags"));
        }
        if tags.iter().any(|t| chars(t) > MAX_TAG_LEN) {
            errors.push(format!("Tags cannot exceed {MAX_TAG_LEN} characters"));
        }
    }
}

fn finish(errors: Vec<String>) -> Result<(), CatalogError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CatalogError::Validation(errors))
    }
}

pub fn validate_new_item(item: &NewItem) -> Result<(), CatalogError> {
    let mut errors = Vec::new();
    match &item.name {
        Some(name) => check_name(name, &mut errors),
        None => errors.push("Name is required".into()),
    }
    check_optional_fields(
        item.description.as_deref(),
        item.category.as_deref(),
        item.tags.as_deref(),
        &mut errors,
    );
    finish(errors)
}

/// Same bounds as creation, but every field is optional.
pub fn validate_patch(patch: &ItemPatch) -> Result<(), CatalogError> {
    let mut errors = Vec::new();
    if let Some(name) = &patch.name {
        check_name(name, &mut errors);
    }
    check_optional_fields(
        patch.description.as_deref(),
        patch.category.as_deref(),
        patch.tags.as_deref(),
        &mut errors,
    );
    finish(errors)
}

/// Validate a search query and resolve its limit.
pub fn validate_search(query: Option<&str>, limit: Option<usize>) -> Result<(String, usize), CatalogError> {
    let mut errors = Vec::new();
    let query = query.unwrap_or_default();
    if query.is_empty() {
        errors.push("Search query is required".into());
    } else if chars(query) > MAX_QUERY_LEN {
        errors.push(format!(
            "Search query cannot exceed {MAX_QUERY_LEN} characters"
        ));
    }
    let limit = match validate_limit(limit, DEFAULT_SEARCH_LIMIT) {
        Ok(limit) => limit,
        Err(msg) => {
            errors.push(msg);
            0
        }
    };
    finish(errors).map(|()| (query.to_string(), limit))
}

pub fn validate_recommendation_limit(limit: Option<usize>) -> Result<usize, CatalogError> {
    validate_limit(limit, DEFAULT_RECOMMENDATION_LIMIT).map_err(CatalogError::invalid)
}

fn validate_limit(limit: Option<usize>, default: usize) -> Result<usize, String> {
    match limit {
        None => Ok(default),
        Some(n) if (1..=MAX_LIMIT).contains(&n) => Ok(n),
        Some(_) => Err(format!("Limit must be between 1 and {MAX_LIMIT}")),
    }
}

/// Item ids must be UUIDs.
pub fn parse_item_id(raw: &str) -> Result<Uuid, CatalogError> {
    Uuid::parse_str(raw).map_err(|_| CatalogError::invalid("Item ID must be a valid UUID"))
}
