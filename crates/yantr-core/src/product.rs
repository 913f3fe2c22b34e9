//! Product configuration trait for CLI binaries
//!
//! The binary implements this trait to tell the core library where its
//! registry lives, which environment variables override those locations, and
//! what to print in upgrade hints.

use crate::config::Framework;

pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for the CLI command)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Default URL of the remote registry.json
    fn default_registry_url(&self) -> &'static str;

    /// Environment variable overriding the remote registry URL
    fn registry_url_env(&self) -> &'static str;

    /// Environment variable pointing at a local registry directory
    fn registry_dir_env(&self) -> &'static str;

    /// Environment variable overriding the registry cache directory
    fn cache_dir_env(&self) -> &'static str;

    /// Environment variable that disables network access when set to `1` or `true`
    fn offline_env(&self) -> &'static str;

    /// URL for product documentation
    fn docs_url(&self) -> &'static str;

    /// Upgrade/install command shown in version warnings
    fn upgrade_command(&self) -> &'static str;

    /// Instructions for mounting the base error handler after `init`
    fn init_next_steps(&self, framework: Framework, templates_dir: &str) -> Vec<String>;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}
