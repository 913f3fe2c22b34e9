//! Registry loading from local directories, the file cache, or a remote URL
//!
//! Lookup order for the descriptor:
//! 1. Local registry directories (explicit, environment, next to the executable)
//! 2. The file cache, when younger than its TTL
//! 3. The remote URL; a successful fetch refreshes the cache
//!
//! Template files come from the first local directory that has them, else from
//! the registry's `baseUrl`.

use super::cache::RegistryCache;
use super::manifest::Registry;
use crate::error::Error;
use crate::product::ProductConfig;
use anyhow::{Context, Result};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use url::Url;

/// Timeout for every network request
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Descriptor file name inside a registry directory
pub const REGISTRY_FILE: &str = "registry.json";

/// Template directory name inside a registry directory
pub const TEMPLATES_DIR: &str = "templates";

/// Where the loaded registry came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryOrigin {
    Local(PathBuf),
    Cache(PathBuf),
    Remote(Url),
}

impl fmt::Display for RegistryOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryOrigin::Local(path) => write!(f, "local registry {}", path.display()),
            RegistryOrigin::Cache(path) => write!(f, "cached registry {}", path.display()),
            RegistryOrigin::Remote(url) => write!(f, "remote registry {}", url),
        }
    }
}

pub struct RegistryClient {
    local_dirs: Vec<PathBuf>,
    /// `None` in offline mode
    remote: Option<Url>,
    cache: RegistryCache,
    client: reqwest::Client,
    registry: Option<Registry>,
    origin: Option<RegistryOrigin>,
}

impl RegistryClient {
    /// Create a client with a custom user agent
    pub fn new(
        local_dirs: Vec<PathBuf>,
        remote: Option<Url>,
        cache: RegistryCache,
        user_agent: &str,
    ) -> Self {
        Self {
            local_dirs,
            remote,
            cache,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .timeout(FETCH_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            registry: None,
            origin: None,
        }
    }

    /// Create a client from a product config
    ///
    /// `registry_dir` takes precedence over the product's registry directory
    /// environment variable; `offline` (or the offline environment variable)
    /// disables the remote source.
    pub fn from_config<C: ProductConfig>(
        config: &C,
        registry_dir: Option<PathBuf>,
        offline: bool,
    ) -> Result<Self> {
        let mut local_dirs: Vec<PathBuf> = Vec::new();

        // Explicitly requested directories must hold a registry
        let requested = registry_dir.into_iter().chain(
            std::env::var_os(config.registry_dir_env()).map(PathBuf::from),
        );
        for dir in requested {
            if !dir.join(REGISTRY_FILE).is_file() {
                anyhow::bail!(
                    "No {} found in registry directory {}",
                    REGISTRY_FILE,
                    dir.display()
                );
            }
            local_dirs.push(dir);
        }

        local_dirs.extend(
            bundled_registry_dirs()
                .into_iter()
                .filter(|dir| dir.join(REGISTRY_FILE).is_file()),
        );

        let offline = offline || env_flag(config.offline_env());
        let remote = if offline {
            None
        } else {
            let url_str = std::env::var(config.registry_url_env())
                .unwrap_or_else(|_| config.default_registry_url().to_string());
            Some(
                Url::parse(&url_str)
                    .with_context(|| format!("Invalid registry URL: {}", url_str))?,
            )
        };

        let cache = match std::env::var_os(config.cache_dir_env()) {
            Some(dir) => RegistryCache::new(PathBuf::from(dir)),
            None => RegistryCache::in_home(),
        };

        tracing::debug!(?local_dirs, ?remote, cache = %cache.dir().display(), "registry sources");
        Ok(Self::new(local_dirs, remote, cache, config.user_agent()))
    }

    /// Where the registry was loaded from, once loaded
    pub fn origin(&self) -> Option<&RegistryOrigin> {
        self.origin.as_ref()
    }

    pub fn is_offline(&self) -> bool {
        self.remote.is_none()
    }

    /// Load (once) and return the registry descriptor
    pub async fn registry(&mut self) -> Result<&Registry> {
        if self.registry.is_none() {
            let (registry, origin) = self.load().await?;
            tracing::debug!(%origin, version = %registry.version, "registry loaded");
            self.registry = Some(registry);
            self.origin = Some(origin);
        }
        self.registry
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("registry not loaded"))
    }

    async fn load(&self) -> Result<(Registry, RegistryOrigin)> {
        if let Some(dir) = self.local_dirs.first() {
            let registry = Self::read_local(&dir.join(REGISTRY_FILE))
                .await
                .map_err(|e| Error::RegistryUnavailable(format!("{:#}", e)))?;
            return Ok((registry, RegistryOrigin::Local(dir.clone())));
        }

        if let Some(registry) = self.cache.load() {
            return Ok((registry, RegistryOrigin::Cache(self.cache.path())));
        }

        let Some(url) = &self.remote else {
            return Err(Error::RegistryUnavailable(
                "no local registry found and network access is disabled (offline mode)"
                    .to_string(),
            )
            .into());
        };

        let registry = self
            .fetch_remote(url)
            .await
            .map_err(|e| Error::RegistryUnavailable(format!("{:#}", e)))?;
        self.cache.store(&registry);
        Ok((registry, RegistryOrigin::Remote(url.clone())))
    }

    async fn read_local(path: &Path) -> Result<Registry> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    async fn fetch_remote(&self, url: &Url) -> Result<Registry> {
        tracing::debug!(%url, "fetching remote registry");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP {} from {}", response.status(), url);
        }

        let content = response.text().await?;
        serde_json::from_str(&content).context("Failed to parse remote registry")
    }

    /// Fetch one template file by its registry path (e.g. `logger/logger.ts`)
    pub async fn fetch_template_file(&mut self, file_path: &str) -> Result<String> {
        check_relative(file_path)?;

        for dir in &self.local_dirs {
            let path = dir.join(TEMPLATES_DIR).join(file_path);
            if path.is_file() {
                return fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()));
            }
        }

        if self.remote.is_none() {
            anyhow::bail!(
                "Template {} not found in a local registry (offline mode)",
                file_path
            );
        }

        let base_url = self.registry().await?.base_url.clone();
        let base = Url::parse(&base_url)
            .with_context(|| format!("Invalid registry baseUrl: {}", base_url))?;
        let url = Self::build_url(&base, file_path)?;

        tracing::debug!(%url, "fetching remote template");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch template: {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to fetch template: {} ({})", url, response.status());
        }

        Ok(response.text().await?)
    }

    /// Fetch several template files, preserving order
    pub async fn fetch_files(&mut self, file_paths: &[String]) -> Result<Vec<(String, String)>> {
        let mut files = Vec::with_capacity(file_paths.len());
        for file_path in file_paths {
            let content = self.fetch_template_file(file_path).await?;
            files.push((file_path.clone(), content));
        }
        Ok(files)
    }

    /// Append a slash-separated relative path to a base URL, preserving query parameters
    fn build_url(base: &Url, relative: &str) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", base))?
            .pop_if_empty()
            .extend(relative.split('/'));
        Ok(url)
    }
}

/// Registry directories shipped alongside the executable
fn bundled_registry_dirs() -> Vec<PathBuf> {
    let Ok(exe) = std::env::current_exe() else {
        return Vec::new();
    };
    let Some(bin_dir) = exe.parent() else {
        return Vec::new();
    };
    vec![
        bin_dir.join("registry"),
        bin_dir.join("..").join("share").join("yantr").join("registry"),
    ]
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Registry paths must stay inside the templates directory
fn check_relative(file_path: &str) -> Result<()> {
    let path = Path::new(file_path);
    let escapes = path.is_absolute()
        || path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
    if escapes || file_path.is_empty() {
        anyhow::bail!("Invalid template path in registry: {:?}", file_path);
    }
    Ok(())
}
