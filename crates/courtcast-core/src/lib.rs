// Shared domain types, configuration, and data sources for the valuation engine.

pub mod category;
pub mod config;
pub mod source;
pub mod stats;
