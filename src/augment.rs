//! Augmentation gateway.
//!
//! Turns catalog data into one of five fixed result shapes, using an external
//! text generator when one is configured:
//!
//! | Operation | Provider output | Fallback |
//! |---|---|---|
//! | [`insights`](AugmentationGateway::insights) | JSON object | generic "General" insight |
//! | [`sentiment`](AugmentationGateway::sentiment) | JSON object | neutral, 0.5 |
//! | [`smart_search`](AugmentationGateway::smart_search) | comma-separated names | substring match on name/description |
//! | [`recommendations`](AugmentationGateway::recommendations) | JSON array | `N` numbered generic suggestions |
//! | [`test_cases`](AugmentationGateway::test_cases) | JSON object with `testCases` | two canned cases |
//!
//! Every public operation is total: provider errors, timeouts and malformed
//! output are logged and replaced by the operation's fallback, which depends
//! only on the operation and its input. Nothing here mutates the catalog.

use std::fmt;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::Item;
use crate::llm::{CompletionRequest, LlmClient, LlmError};

/// Default bound on a single provider call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Categories cycled through by fallback recommendations.
pub const FALLBACK_CATEGORIES: [&str; 5] =
    ["Technology", "Books", "Electronics", "Clothing", "Food"];

// ============================================================================
// Result Shapes
// ============================================================================

/// Structured insight about a single item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightResult {
    pub category: String,
    pub tags: Vec<String>,
    pub insights: String,
    pub suggestions: Vec<String>,
}

/// Sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "positive" => Some(Self::Positive),
            "negative" => Some(Self::Negative),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

/// Sentiment analysis of a single item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub sentiment: Sentiment,
    /// Always within `[0, 1]`.
    pub confidence: f64,
    pub tone: String,
    pub suggestions: Vec<String>,
}

/// A suggested new item. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub description: String,
    pub category: String,
}

/// One drafted API test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub name: String,
    pub method: String,
    pub path: String,
    pub body: Value,
    pub expected_status: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseSet {
    pub test_cases: Vec<TestCase>,
}

// ============================================================================
// Errors (absorbed, never returned to callers)
// ============================================================================

/// Provider text did not fit the operation's expected shape.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("not valid JSON: {0}")]
    Json(String),
    #[error("expected {0}")]
    Shape(&'static str),
    #[error("invalid field: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
enum AugmentationFailure {
    #[error("provider call failed: {0}")]
    Provider(#[from] LlmError),
    #[error("unusable provider output: {0}")]
    Parse(#[from] ParseError),
}

// ============================================================================
// Operations
// ============================================================================

/// The five augmentation operations, each with a fixed generation budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insights,
    Sentiment,
    SmartSearch,
    Recommendations,
    TestCases,
}

impl Operation {
    pub fn max_tokens(self) -> u32 {
        match self {
            Self::Insights => 300,
            Self::Sentiment => 200,
            Self::SmartSearch => 100,
            Self::Recommendations => 400,
            Self::TestCases => 600,
        }
    }

    pub fn temperature(self) -> f32 {
        match self {
            Self::Insights => 0.7,
            Self::Sentiment => 0.5,
            Self::SmartSearch => 0.3,
            Self::Recommendations => 0.8,
            Self::TestCases => 0.3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Insights => "insights",
            Self::Sentiment => "sentiment",
            Self::SmartSearch => "smart_search",
            Self::Recommendations => "recommendations",
            Self::TestCases => "test_cases",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Gateway
// ============================================================================

/// Provider handle, checked explicitly on every call.
#[derive(Clone)]
pub enum Generator {
    /// No credential: every call takes the fallback path.
    Unconfigured,
    Configured(Arc<dyn LlmClient>),
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconfigured => f.write_str("Unconfigured"),
            Self::Configured(_) => f.write_str("Configured(..)"),
        }
    }
}

/// Stateless facade over the text generator.
///
/// A failed call degrades only that call; there is no sticky mode flag.
#[derive(Debug, Clone)]
pub struct AugmentationGateway {
    generator: Generator,
    timeout: Duration,
}

impl AugmentationGateway {
    pub fn new(generator: Generator, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// A gateway that always answers with fallbacks.
    pub fn unconfigured() -> Self {
        Self::new(Generator::Unconfigured, DEFAULT_TIMEOUT)
    }

    /// Whether a provider is configured at all.
    pub fn is_live(&self) -> bool {
        matches!(self.generator, Generator::Configured(_))
    }

    pub async fn insights(&self, item: &Item) -> InsightResult {
        self.run(
            Operation::Insights,
            || insights_prompt(item),
            parse_insights,
            fallback_insights,
        )
        .await
    }

    pub async fn sentiment(&self, item: &Item) -> SentimentResult {
        self.run(
            Operation::Sentiment,
            || sentiment_prompt(item),
            parse_sentiment,
            fallback_sentiment,
        )
        .await
    }

    /// Items judged relevant to `query`, in catalog order.
    pub async fn smart_search(&self, items: &[Item], query: &str) -> Vec<Item> {
        self.run(
            Operation::SmartSearch,
            || smart_search_prompt(items, query),
            |text| Ok(match_names(items, &parse_name_list(text))),
            || fallback_search(items, query),
        )
        .await
    }

    /// At most `limit` suggestions; exactly `limit` on the fallback path.
    pub async fn recommendations(&self, items: &[Item], limit: usize) -> Vec<Recommendation> {
        self.run(
            Operation::Recommendations,
            || recommendations_prompt(items, limit),
            |text| parse_recommendations(text, limit),
            || fallback_recommendations(limit),
        )
        .await
    }

    pub async fn test_cases(&self, item: &Item) -> TestCaseSet {
        self.run(
            Operation::TestCases,
            || test_cases_prompt(item),
            parse_test_cases,
            fallback_test_cases,
        )
        .await
    }

    /// Shared call-parse-or-fallback pipeline.
    async fn run<T>(
        &self,
        op: Operation,
        prompt: impl FnOnce() -> String,
        parse: impl FnOnce(&str) -> Result<T, ParseError>,
        fallback: impl FnOnce() -> T,
    ) -> T {
        let client = match &self.generator {
            Generator::Unconfigured => {
                debug!(operation = %op, "no provider configured, using fallback");
                return fallback();
            }
            Generator::Configured(client) => client,
        };

        let request = CompletionRequest {
            prompt: prompt(),
            max_tokens: op.max_tokens(),
            temperature: op.temperature(),
        };

        match self.call(client.as_ref(), &request).await.and_then(|text| {
            parse(&text).map_err(AugmentationFailure::from)
        }) {
            Ok(result) => {
                debug!(operation = %op, "provider result accepted");
                result
            }
            Err(e) => {
                warn!(operation = %op, "augmentation failed, using fallback: {e}");
                fallback()
            }
        }
    }

    async fn call(
        &self,
        client: &dyn LlmClient,
        request: &CompletionRequest,
    ) -> Result<String, AugmentationFailure> {
        match tokio::time::timeout(self.timeout, client.complete(request)).await {
            Ok(completion) => Ok(completion?.text),
            Err(_) => Err(LlmError::Timeout(self.timeout).into()),
        }
    }
}

// ============================================================================
// Prompts
// ============================================================================

fn describe(item: &Item) -> &str {
    if item.description.is_empty() {
        "No description provided"
    } else {
        &item.description
    }
}

fn item_lines(items: &[Item]) -> String {
    items
        .iter()
        .map(|item| format!("- {}: {}", item.name, describe(item)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn insights_prompt(item: &Item) -> String {
    format!(
        "Analyze this catalog item and provide insights.\n\
         Name: {}\n\
         Description: {}\n\
         Current category: {}\n\
         Current tags: {}\n\n\
         Respond with ONLY a JSON object (no markdown, no explanation) with keys:\n\
         \"category\" (suggested category), \"tags\" (array of relevant tags), \
         \"insights\" (short business insight), \"suggestions\" (array of improvement suggestions).",
        item.name,
        describe(item),
        item.category,
        if item.tags.is_empty() {
            "none".to_string()
        } else {
            item.tags.join(", ")
        },
    )
}

pub fn sentiment_prompt(item: &Item) -> String {
    format!(
        "Analyze the sentiment and tone of this catalog item.\n\
         Name: {}\n\
         Description: {}\n\n\
         Respond with ONLY a JSON object with keys: \"sentiment\" (one of positive, negative, neutral), \
         \"confidence\" (number between 0 and 1), \"tone\" (one or two words), \
         \"suggestions\" (array of strings).",
        item.name,
        describe(item),
    )
}

pub fn smart_search_prompt(items: &[Item], query: &str) -> String {
    format!(
        "Given these catalog items and a search query, pick the relevant items.\n\n\
         Search query: \"{query}\"\n\n\
         Items:\n{}\n\n\
         Return only the names of matching items, separated by commas. \
         Return nothing if no item matches.",
        item_lines(items),
    )
}

pub fn recommendations_prompt(items: &[Item], limit: usize) -> String {
    format!(
        "Based on these existing catalog items, suggest {limit} new related items.\n\n\
         Existing items:\n{}\n\n\
         Respond with ONLY a JSON array of at most {limit} objects, each with keys \
         \"name\", \"description\" and \"category\".",
        item_lines(items),
    )
}

/// Describes the item's fields and JSON types; values are not included.
pub fn test_cases_prompt(item: &Item) -> String {
    let shape = match serde_json::to_value(item) {
        Ok(Value::Object(fields)) => fields
            .iter()
            .map(|(name, value)| format!("- {name}: {}", json_type(value)))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    };

    format!(
        "Generate API test cases for a REST endpoint managing catalog items at /api/items.\n\n\
         Item structure:\n{shape}\n\n\
         Cover valid creation, creation without a name, retrieval, update, deletion and edge cases.\n\
         Respond with ONLY a JSON object {{\"testCases\": [...]}} where each test case has \
         \"name\", \"method\", \"path\", \"body\" and \"expectedStatus\"."
    )
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Parsers
// ============================================================================

/// Strip markdown code fences from LLM output.
pub fn strip_markdown_fences(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.starts_with("```") {
        let after_first_fence = trimmed
            .find('\n')
            .map(|i| &trimmed[i + 1..])
            .unwrap_or(trimmed);
        if let Some(end) = after_first_fence.rfind("```") {
            return after_first_fence[..end].trim().to_string();
        }
    }
    trimmed.to_string()
}

fn parse_json(text: &str) -> Result<Value, ParseError> {
    serde_json::from_str(&strip_markdown_fences(text)).map_err(|e| ParseError::Json(e.to_string()))
}

fn from_value<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, ParseError> {
    serde_json::from_value(value).map_err(|e| ParseError::Invalid(e.to_string()))
}

pub fn parse_insights(text: &str) -> Result<InsightResult, ParseError> {
    let value = parse_json(text)?;
    if !value.is_object() {
        return Err(ParseError::Shape("a JSON object"));
    }
    from_value(value)
}

#[derive(Deserialize)]
struct RawSentiment {
    sentiment: String,
    confidence: f64,
    tone: String,
    suggestions: Vec<String>,
}

pub fn parse_sentiment(text: &str) -> Result<SentimentResult, ParseError> {
    let value = parse_json(text)?;
    if !value.is_object() {
        return Err(ParseError::Shape("a JSON object"));
    }
    let raw: RawSentiment = from_value(value)?;

    let sentiment = Sentiment::parse(&raw.sentiment)
        .ok_or_else(|| ParseError::Invalid(format!("unknown sentiment '{}'", raw.sentiment)))?;
    if !(0.0..=1.0).contains(&raw.confidence) {
        return Err(ParseError::Invalid(format!(
            "confidence {} outside [0, 1]",
            raw.confidence
        )));
    }

    Ok(SentimentResult {
        sentiment,
        confidence: raw.confidence,
        tone: raw.tone,
        suggestions: raw.suggestions,
    })
}

static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*]\s*").unwrap());

/// Split a comma-separated name list, dropping bullets and blanks.
pub fn parse_name_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(|name| BULLET.replace(name.trim(), "").trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Items whose name contains any of `names`, case-insensitively.
pub fn match_names(items: &[Item], names: &[String]) -> Vec<Item> {
    let names: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();
    items
        .iter()
        .filter(|item| {
            let item_name = item.name.to_lowercase();
            names.iter().any(|name| item_name.contains(name.as_str()))
        })
        .cloned()
        .collect()
}

/// A JSON array of recommendations, truncated to `limit`.
pub fn parse_recommendations(text: &str, limit: usize) -> Result<Vec<Recommendation>, ParseError> {
    let value = parse_json(text)?;
    if !value.is_array() {
        return Err(ParseError::Shape("a JSON array"));
    }
    let mut recommendations: Vec<Recommendation> = from_value(value)?;
    recommendations.truncate(limit);
    Ok(recommendations)
}

pub fn parse_test_cases(text: &str) -> Result<TestCaseSet, ParseError> {
    let value = parse_json(text)?;
    if !value.get("testCases").is_some_and(Value::is_array) {
        return Err(ParseError::Shape("an object with a testCases array"));
    }
    let set: TestCaseSet = from_value(value)?;
    if set.test_cases.is_empty() {
        return Err(ParseError::Invalid("testCases is empty".into()));
    }
    Ok(set)
}

// ============================================================================
// Fallbacks
// ============================================================================

pub fn fallback_insights() -> InsightResult {
    InsightResult {
        category: "General".into(),
        tags: vec!["item".into(), "general".into()],
        insights: "Standard item with basic information".into(),
        suggestions: vec![
            "Add more detailed description".into(),
            "Consider adding tags".into(),
        ],
    }
}

pub fn fallback_sentiment() -> SentimentResult {
    SentimentResult {
        sentiment: Sentiment::Neutral,
        confidence: 0.5,
        tone: "neutral".into(),
        suggestions: Vec::new(),
    }
}

/// Case-insensitive substring match on name and description.
pub fn fallback_search(items: &[Item], query: &str) -> Vec<Item> {
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| {
            item.name.to_lowercase().contains(&needle)
                || item.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

pub fn fallback_recommendations(limit: usize) -> Vec<Recommendation> {
    (0..limit)
        .map(|i| Recommendation {
            name: format!("Recommended Item {}", i + 1),
            description: "AI-generated recommendation based on your items".into(),
            category: FALLBACK_CATEGORIES[i % FALLBACK_CATEGORIES.len()].into(),
        })
        .collect()
}

pub fn fallback_test_cases() -> TestCaseSet {
    TestCaseSet {
        test_cases: vec![
            TestCase {
                name: "Create valid item".into(),
                method: "POST".into(),
                path: "/api/items".into(),
                body: serde_json::json!({"name": "Test Item", "description": "Test Description"}),
                expected_status: 201,
            },
            TestCase {
                name: "Create item without name".into(),
                method: "POST".into(),
                path: "/api/items".into(),
                body: serde_json::json!({"description": "Test Description"}),
                expected_status: 400,
            },
        ],
    }
}

// ============================================================================
// Tests
// ============================================================================
