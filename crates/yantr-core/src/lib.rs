//! Yantr Core - backend component scaffolding for Node.js projects
//!
//! This library copies component templates (auth, logger, security, database)
//! from a registry into an Express, Hono or Fastify project, keeps the
//! project's `yantr.json` up to date and installs npm dependencies through the
//! project's package manager.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - config store, registry loading and caching,
//!   template placement, route generation, package installation
//! - **Layer 2: Product Configuration** - the `ProductConfig` trait supplied by the binary
//! - **Layer 3: CLI/TUI Interface** - cliclack-based command flows (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based `init`, `add`, `generate` and `list` flows
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use yantr_core::{config, registry::RegistryClient, ProductConfig};
//!
//! let project = config::read_config(&cwd)?;
//! let mut client = RegistryClient::from_config(&MyProduct, None, false)?;
//! let files = client
//!     .registry()
//!     .await?
//!     .component_files("logger", project.framework)?;
//! let contents = client.fetch_files(&files).await?;
//! ```

pub mod config;
pub mod error;
pub mod generate;
pub mod product;
pub mod project;
pub mod registry;
pub mod render;
pub mod runtime;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{Framework, PackageManager, Runtime, YantrConfig};
pub use error::Error;
pub use product::ProductConfig;
pub use registry::{Registry, RegistryClient};
pub use runtime::{check_runtime, PackageInstaller, RuntimeInfo};
