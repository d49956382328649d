//! Shared types, error model, and configuration for threadpull.
//!
//! This crate is the foundation depended on by all other threadpull crates.
//! It provides:
//! - [`ThreadpullError`] — the unified error type
//! - Domain types ([`Post`], [`CollectionResult`], [`EnrichedPost`])
//! - Configuration ([`AppConfig`], [`RunConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    ApiConfig, AppConfig, DefaultsConfig, RunConfig, SessionConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from, validate_bearer_token,
};
pub use error::{Result, ThreadpullError};
pub use types::{CollectionResult, EnrichedPost, Post, PublicMetrics};
