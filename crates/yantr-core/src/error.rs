//! Typed errors for config and registry lookups
//!
//! Command flows wrap these in `anyhow::Error`; tests and callers that need to
//! branch on the failure kind can downcast.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("yantr.json not found in {0}. Run \"yantr init\" first.")]
    ConfigNotFound(PathBuf),

    #[error("Failed to parse {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown component: {name}. Available components: {}", available.join(", "))]
    UnknownComponent {
        name: String,
        available: Vec<String>,
    },

    #[error(
        "Component {component} is not yet available for {framework}. Available for: {}",
        available.join(", ")
    )]
    NotAvailableForFramework {
        component: String,
        framework: String,
        available: Vec<String>,
    },

    #[error("Component {component} has no variant {variant}")]
    UnknownVariant { component: String, variant: String },

    #[error("{orm} can only be used with {expected}")]
    OrmMismatch { orm: String, expected: String },

    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    #[error("Failed to load registry: {0}")]
    RegistryUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
