//! Fear & Greed Index tool: fetches CNN's market sentiment index, normalizes
//! the provider payload and validates it against a fixed eleven-slot schema.

pub mod app;
pub mod models;
pub mod services;
pub mod utils;

pub use app::tool::{ToolResult, TOOL_NAME};
pub use models::fear_greed::{CompositeIndicator, IndexSnapshot, IndicatorRecord, Rating, Slot};
pub use services::api::{FearGreedClient, FetchError};
