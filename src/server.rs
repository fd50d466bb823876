use rmcp::handler::server::{router::tool::ToolRouter, wrapper::Parameters};
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::transport::stdio;
use rmcp::{ErrorData, ServerHandler, ServiceExt, tool, tool_handler, tool_router};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::catalog::{ItemPatch, NewItem};
use crate::error::CatalogError;
use crate::service::CatalogService;
use crate::validation::{
    parse_item_id, validate_new_item, validate_patch, validate_recommendation_limit,
    validate_search,
};

// ---------------------------------------------------------------------------
// Parameter structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, rmcp::schemars::JsonSchema)]
pub struct CreateParams {
    #[schemars(description = "Item name, 1 to 100 characters")]
    pub name: String,
    #[schemars(description = "Optional description, up to 500 characters")]
    pub description: Option<String>,
    #[schemars(description = "Optional category (default: 'General')")]
    pub category: Option<String>,
    #[schemars(description = "Optional tags, at most 10 of up to 30 characters each")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, rmcp::schemars::JsonSchema)]
pub struct IdParams {
    #[schemars(description = "Item id (UUID)")]
    pub id: String,
}

#[derive(Debug, Deserialize, rmcp::schemars::JsonSchema)]
pub struct UpdateParams {
    #[schemars(description = "Item id (UUID)")]
    pub id: String,
    #[schemars(description = "New name; omitted fields are left unchanged")]
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, rmcp::schemars::JsonSchema)]
pub struct SearchParams {
    #[schemars(description = "Search text, 1 to 100 characters")]
    pub query: String,
    #[schemars(description = "Maximum number of results, 1 to 50 (default: 10)")]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, rmcp::schemars::JsonSchema)]
pub struct FilterParams {
    #[schemars(description = "Exact category to match. Provide this or 'tag'.")]
    pub category: Option<String>,
    #[schemars(description = "Exact tag to match. Provide this or 'category'.")]
    pub tag: Option<String>,
}

#[derive(Debug, Deserialize, rmcp::schemars::JsonSchema)]
pub struct LimitParams {
    #[schemars(description = "Number of suggestions, 1 to 50 (default: 5)")]
    pub limit: Option<usize>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn json_result(value: &impl Serialize) -> Result<CallToolResult, ErrorData> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ErrorData::internal_error(format!("JSON serialization error: {e}"), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn not_found() -> Result<CallToolResult, ErrorData> {
    Ok(CallToolResult::success(vec![Content::text(
        r#"{"error":"not_found"}"#,
    )]))
}

impl From<CatalogError> for ErrorData {
    fn from(err: CatalogError) -> Self {
        ErrorData::invalid_params(err.to_string(), None)
    }
}

fn item_id(raw: &str) -> Result<Uuid, ErrorData> {
    Ok(parse_item_id(raw)?)
}

// ---------------------------------------------------------------------------
// MCP Server
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct CatalogServer {
    service: CatalogService,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl CatalogServer {
    pub fn new(service: CatalogService) -> Self {
        Self {
            service,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Create a catalog item. Returns the stored item with its generated id.")]
    async fn catalog_create(
        &self,
        Parameters(p): Parameters<CreateParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let fields = NewItem {
            name: Some(p.name),
            description: p.description,
            category: p.category,
            tags: p.tags,
        };
        validate_new_item(&fields)?;
        json_result(&self.service.create(fields).await)
    }

    #[tool(description = "Fetch one item by id.")]
    async fn catalog_get(
        &self,
        Parameters(p): Parameters<IdParams>,
    ) -> Result<CallToolResult, ErrorData> {
        match self.service.get_by_id(&item_id(&p.id)?).await {
            Some(item) => json_result(&item),
            None => not_found(),
        }
    }

    #[tool(description = "List every item in insertion order.")]
    async fn catalog_list(&self) -> Result<CallToolResult, ErrorData> {
        json_result(&self.service.get_all().await)
    }

    #[tool(description = "Update an item. Only the provided fields change.")]
    async fn catalog_update(
        &self,
        Parameters(p): Parameters<UpdateParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let id = item_id(&p.id)?;
        let patch = ItemPatch {
            name: p.name,
            description: p.description,
            category: p.category,
            tags: p.tags,
        };
        validate_patch(&patch)?;
        match self.service.update(&id, patch).await {
            Some(item) => json_result(&item),
            None => not_found(),
        }
    }

    #[tool(description = "Delete an item by id. Returns the removed item.")]
    async fn catalog_delete(
        &self,
        Parameters(p): Parameters<IdParams>,
    ) -> Result<CallToolResult, ErrorData> {
        match self.service.remove(&item_id(&p.id)?).await {
            Some(item) => json_result(&item),
            None => not_found(),
        }
    }

    #[tool(
        description = "Case-insensitive substring search over name, description, category and tags."
    )]
    async fn catalog_search(
        &self,
        Parameters(p): Parameters<SearchParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let (query, limit) = validate_search(Some(&p.query), p.limit)?;
        let mut items = self.service.search(&query).await;
        items.truncate(limit);
        json_result(&items)
    }

    #[tool(description = "List items whose category or tag matches exactly.")]
    async fn catalog_filter(
        &self,
        Parameters(p): Parameters<FilterParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let items = match (p.category, p.tag) {
            (Some(category), None) => self.service.get_by_category(&category).await,
            (None, Some(tag)) => self.service.get_by_tag(&tag).await,
            _ => {
                return Err(ErrorData::invalid_params(
                    "Provide exactly one of 'category' or 'tag'.",
                    None,
                ));
            }
        };
        json_result(&items)
    }

    #[tool(description = "Aggregate catalog statistics.")]
    async fn catalog_stats(&self) -> Result<CallToolResult, ErrorData> {
        json_result(&self.service.get_stats().await)
    }

    #[tool(
        description = "Generate category, tags, insights and suggestions for an item and store them on it."
    )]
    async fn ai_insights(
        &self,
        Parameters(p): Parameters<IdParams>,
    ) -> Result<CallToolResult, ErrorData> {
        match self.service.generate_insights(&item_id(&p.id)?).await {
            Some(outcome) => json_result(&outcome),
            None => not_found(),
        }
    }

    #[tool(description = "Analyze the sentiment of an item's text and store the result on it.")]
    async fn ai_sentiment(
        &self,
        Parameters(p): Parameters<IdParams>,
    ) -> Result<CallToolResult, ErrorData> {
        match self.service.analyze_sentiment(&item_id(&p.id)?).await {
            Some(outcome) => json_result(&outcome),
            None => not_found(),
        }
    }

    #[tool(description = "Rank catalog items by relevance to a natural language query.")]
    async fn ai_search(
        &self,
        Parameters(p): Parameters<SearchParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let (query, limit) = validate_search(Some(&p.query), p.limit)?;
        json_result(&self.service.smart_search(&query, limit).await)
    }

    #[tool(description = "Suggest new items that would complement the catalog.")]
    async fn ai_recommendations(
        &self,
        Parameters(p): Parameters<LimitParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let limit = validate_recommendation_limit(p.limit)?;
        json_result(&self.service.get_recommendations(limit).await)
    }

    #[tool(description = "Draft API test cases for an item's shape. Nothing is stored.")]
    async fn ai_test_cases(
        &self,
        Parameters(p): Parameters<IdParams>,
    ) -> Result<CallToolResult, ErrorData> {
        match self.service.generate_test_cases(&item_id(&p.id)?).await {
            Some(set) => json_result(&set),
            None => not_found(),
        }
    }
}

#[tool_handler]
impl ServerHandler for CatalogServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Item catalog with AI augmentation. Use the 'catalog_*' tools to create, read, \
                 update, delete, search and filter items, and the 'ai_*' tools for insights, \
                 sentiment, ranked search, recommendations and test case drafts. AI tools fall \
                 back to deterministic answers when no model is configured."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Serve the catalog over MCP on stdin/stdout until the client disconnects.
pub async fn run_mcp_server(service: CatalogService) -> Result<(), Box<dyn std::error::Error>> {
    info!("MCP server listening on stdio");
    let running = CatalogServer::new(service).serve(stdio()).await?;
    running.waiting().await?;
    Ok(())
}
