use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::info;

use crate::models::fear_greed::{IndexSnapshot, Rating, Slot};
use crate::services::api::{FearGreedClient, FetchError};

pub const TOOL_NAME: &str = "get_fear_greed_index";

const TOOL_DESCRIPTION: &str = "Get US stock market Fear & Greed Index data. Returns comprehensive \
market sentiment analysis including the main composite index and 7 individual indicators (market \
momentum, stock price strength/breadth, options sentiment, volatility, safe haven demand, junk bond \
demand). Each indicator includes score (0-100), rating, and timestamp. See schema for detailed field \
descriptions.";

/// Descriptor returned from `tools/list`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
    pub output_schema: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text { text: String },
}

/// Outcome of one tool invocation. Failures are data, never a fault.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub is_error: bool,
    pub content: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
}

impl ToolResult {
    pub fn success(snapshot: &IndexSnapshot) -> Self {
        match serde_json::to_value(snapshot) {
            Ok(data) => ToolResult {
                is_error: false,
                content: vec![Content::Text {
                    text: data.to_string(),
                }],
                structured_content: Some(json!({ "data": data })),
            },
            Err(err) => ToolResult::failure(&err.to_string()),
        }
    }

    pub fn failure(message: &str) -> Self {
        ToolResult {
            is_error: true,
            content: vec![Content::Text {
                text: format!("Error fetching Fear and Greed Index: {}", message),
            }],
            structured_content: None,
        }
    }

    pub fn from_fetch(result: Result<IndexSnapshot, FetchError>) -> Self {
        match result {
            Ok(snapshot) => ToolResult::success(&snapshot),
            Err(err) => ToolResult::failure(&err.to_string()),
        }
    }

    pub fn text(&self) -> &str {
        match self.content.first() {
            Some(Content::Text { text }) => text,
            None => "",
        }
    }
}

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: TOOL_NAME,
        description: TOOL_DESCRIPTION,
        input_schema: json!({ "type": "object", "properties": {} }),
        output_schema: output_schema(),
    }
}

/// Runs the tool once: one fetch, one normalize/validate pass
pub async fn call(client: &FearGreedClient) -> ToolResult {
    info!(tool = TOOL_NAME, "tool invoked");
    ToolResult::from_fetch(client.fetch_index().await)
}

fn output_schema() -> Value {
    let mut properties = Map::new();
    for slot in Slot::ALL {
        properties.insert(slot.name().to_string(), slot_schema(slot));
    }
    let required: Vec<&str> = Slot::ALL.iter().map(|s| s.name()).collect();

    json!({
        "type": "object",
        "properties": {
            "data": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        },
        "required": ["data"],
    })
}

fn slot_schema(slot: Slot) -> Value {
    let ratings: Vec<&str> = Rating::ALL.iter().map(|r| r.as_str()).collect();
    let mut properties = json!({
        "timestamp": {
            "type": "string",
            "description": "ISO timestamp when the data was last updated",
        },
        "score": {
            "type": "number",
            "description": "Fear & Greed score from 0-100 (0=extreme fear, 100=extreme greed)",
        },
        "rating": {
            "type": "string",
            "enum": ratings,
            "description": "Textual rating based on the score: 0-25=extreme fear, 26-45=fear, 46-55=neutral, 56-75=greed, 76-100=extreme greed",
        },
    });
    let mut required = vec!["timestamp", "score", "rating"];

    if slot.is_composite() {
        let history = [
            ("previous_close", "Previous day's closing score"),
            ("previous_1_week", "Score from 1 week ago"),
            ("previous_1_month", "Score from 1 month ago"),
            ("previous_1_year", "Score from 1 year ago"),
        ];
        for (field, description) in history {
            properties[field] = json!({ "type": "number", "description": description });
            required.push(field);
        }
    }

    json!({
        "type": "object",
        "description": slot.description(),
        "properties": properties,
        "required": required,
    })
}
