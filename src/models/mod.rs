pub mod config;
pub mod fear_greed;
