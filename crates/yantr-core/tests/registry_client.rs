use httpmock::prelude::*;
use std::fs;
use std::path::Path;
use std::time::Duration;
use yantr_core::registry::{RegistryCache, RegistryClient, RegistryOrigin};
use yantr_core::{Framework, ProductConfig};

#[derive(Clone)]
struct TestProduct;

impl ProductConfig for TestProduct {
    fn name(&self) -> &'static str {
        "yantr-test"
    }

    fn display_name(&self) -> &'static str {
        "Yantr Test"
    }

    fn default_registry_url(&self) -> &'static str {
        "http://127.0.0.1:9/registry.json"
    }

    fn registry_url_env(&self) -> &'static str {
        "YANTR_TEST_UNSET_REGISTRY_URL"
    }

    fn registry_dir_env(&self) -> &'static str {
        "YANTR_TEST_UNSET_REGISTRY_DIR"
    }

    fn cache_dir_env(&self) -> &'static str {
        "YANTR_TEST_UNSET_CACHE_DIR"
    }

    fn offline_env(&self) -> &'static str {
        "YANTR_TEST_UNSET_OFFLINE"
    }

    fn docs_url(&self) -> &'static str {
        "https://example.com/docs"
    }

    fn upgrade_command(&self) -> &'static str {
        "upgrade"
    }

    fn init_next_steps(&self, _framework: Framework, _templates_dir: &str) -> Vec<String> {
        Vec::new()
    }
}

fn registry_json(version: &str, base_url: &str) -> String {
    serde_json::json!({
        "version": version,
        "baseUrl": base_url,
        "components": {
            "logger": {
                "name": "Logger",
                "description": "Structured logging",
                "files": ["logger/logger.ts"],
                "dependencies": ["pino"]
            }
        }
    })
    .to_string()
}

fn client(local_dirs: Vec<&Path>, remote: Option<String>, cache_dir: &Path) -> RegistryClient {
    RegistryClient::new(
        local_dirs.into_iter().map(Path::to_path_buf).collect(),
        remote.map(|url| url.parse().unwrap()),
        RegistryCache::new(cache_dir.to_path_buf()),
        "yantr-test",
    )
}

#[tokio::test]
async fn remote_registry_is_fetched_and_cached() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/registry.json");
            then.status(200)
                .header("content-type", "application/json")
                .body(registry_json("0.3.0", "https://example.com/templates"));
        })
        .await;

    let cache = tempfile::tempdir().unwrap();
    let mut remote = client(vec![], Some(server.url("/registry.json")), cache.path());
    let registry = remote.registry().await.unwrap();
    assert_eq!(registry.version, "0.3.0");
    assert_eq!(
        registry.component_files("logger", Framework::Hono).unwrap(),
        vec!["logger/logger.ts"]
    );
    assert!(matches!(remote.origin(), Some(RegistryOrigin::Remote(_))));
    assert!(cache.path().join("registry.json").is_file());

    // A fresh cache is enough without the network
    let mut offline = client(vec![], None, cache.path());
    assert_eq!(offline.registry().await.unwrap().version, "0.3.0");
    assert!(matches!(offline.origin(), Some(RegistryOrigin::Cache(_))));
}

#[tokio::test]
async fn remote_error_status_is_reported() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/registry.json");
            then.status(404);
        })
        .await;

    let cache = tempfile::tempdir().unwrap();
    let mut remote = client(vec![], Some(server.url("/registry.json")), cache.path());
    let err = remote.registry().await.unwrap_err().to_string();
    assert!(err.starts_with("Failed to load registry"), "{err}");
    assert!(err.contains("404"), "{err}");
    assert!(!cache.path().join("registry.json").exists());
}

#[tokio::test]
async fn invalid_remote_json_is_an_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/registry.json");
            then.status(200).body("{ not json");
        })
        .await;

    let cache = tempfile::tempdir().unwrap();
    let mut remote = client(vec![], Some(server.url("/registry.json")), cache.path());
    let err = remote.registry().await.unwrap_err().to_string();
    assert!(err.contains("Failed to parse remote registry"), "{err}");
}

#[tokio::test]
async fn offline_without_sources_fails() {
    let cache = tempfile::tempdir().unwrap();
    let mut offline = client(vec![], None, cache.path());
    assert!(offline.is_offline());

    let err = offline.registry().await.unwrap_err().to_string();
    assert!(err.contains("offline"), "{err}");
}

#[tokio::test]
async fn unreadable_local_registry_is_a_load_failure() {
    let local = tempfile::tempdir().unwrap();
    fs::write(local.path().join("registry.json"), "{ broken").unwrap();

    let cache = tempfile::tempdir().unwrap();
    let mut offline = client(vec![local.path()], None, cache.path());
    let err = format!("{:#}", offline.registry().await.unwrap_err());
    assert!(err.starts_with("Failed to load registry"), "{err}");
    assert!(err.contains("Failed to parse"), "{err}");
    assert!(err.contains(&local.path().display().to_string()), "{err}");
}

#[test]
fn requested_registry_dir_without_descriptor_is_rejected() {
    let empty = tempfile::tempdir().unwrap();
    let err = match RegistryClient::from_config(&TestProduct, Some(empty.path().to_path_buf()), false) {
        Ok(_) => panic!("a directory without registry.json was accepted"),
        Err(e) => e.to_string(),
    };
    assert!(err.contains("No registry.json found"), "{err}");
    assert!(err.contains(&empty.path().display().to_string()), "{err}");
}

#[tokio::test]
async fn requested_registry_dir_is_used() {
    let local = tempfile::tempdir().unwrap();
    fs::write(
        local.path().join("registry.json"),
        registry_json("7.0.0", "https://example.com/templates"),
    )
    .unwrap();

    let mut client =
        RegistryClient::from_config(&TestProduct, Some(local.path().to_path_buf()), true).unwrap();
    assert_eq!(client.registry().await.unwrap().version, "7.0.0");
    assert_eq!(
        client.origin(),
        Some(&RegistryOrigin::Local(local.path().to_path_buf()))
    );
}

#[tokio::test]
async fn registry_is_loaded_once_per_client() {
    let server = MockServer::start_async().await;
    let base_url = server.url("/templates");
    let descriptor = server
        .mock_async(|when, then| {
            when.method(GET).path("/registry.json");
            then.status(200).body(registry_json("0.5.0", &base_url));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/templates/logger/logger.ts");
            then.status(200).body("export {};\n");
        })
        .await;

    let cache = tempfile::tempdir().unwrap();
    let mut remote = RegistryClient::new(
        vec![],
        Some(server.url("/registry.json").parse().unwrap()),
        RegistryCache::new(cache.path().to_path_buf()).with_ttl(Duration::ZERO),
        "yantr-test",
    );
    assert_eq!(remote.registry().await.unwrap().version, "0.5.0");
    assert_eq!(remote.registry().await.unwrap().version, "0.5.0");
    remote.fetch_template_file("logger/logger.ts").await.unwrap();

    descriptor.assert_hits_async(1).await;
}

#[tokio::test]
async fn local_registry_is_preferred() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/registry.json");
            then.status(200)
                .body(registry_json("0.1.0", "https://example.com/templates"));
        })
        .await;

    let local = tempfile::tempdir().unwrap();
    fs::write(
        local.path().join("registry.json"),
        registry_json("9.9.9", "https://example.com/templates"),
    )
    .unwrap();
    fs::create_dir_all(local.path().join("templates/logger")).unwrap();
    fs::write(
        local.path().join("templates/logger/logger.ts"),
        "export const logger = console;\n",
    )
    .unwrap();

    let cache = tempfile::tempdir().unwrap();
    let mut client = client(
        vec![local.path()],
        Some(server.url("/registry.json")),
        cache.path(),
    );
    assert_eq!(client.registry().await.unwrap().version, "9.9.9");
    assert_eq!(
        client.origin(),
        Some(&RegistryOrigin::Local(local.path().to_path_buf()))
    );

    let content = client.fetch_template_file("logger/logger.ts").await.unwrap();
    assert_eq!(content, "export const logger = console;\n");
    // Local loads never populate the cache
    assert!(!cache.path().join("registry.json").exists());
}

#[tokio::test]
async fn templates_are_fetched_from_base_url() {
    let server = MockServer::start_async().await;
    let base_url = server.url("/templates");
    server
        .mock_async(|when, then| {
            when.method(GET).path("/registry.json");
            then.status(200).body(registry_json("0.2.0", &base_url));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/templates/logger/logger.ts");
            then.status(200).body("import pino from 'pino';\n");
        })
        .await;

    let cache = tempfile::tempdir().unwrap();
    let mut remote = client(vec![], Some(server.url("/registry.json")), cache.path());
    let files = remote
        .fetch_files(&["logger/logger.ts".to_string()])
        .await
        .unwrap();
    assert_eq!(
        files,
        vec![(
            "logger/logger.ts".to_string(),
            "import pino from 'pino';\n".to_string()
        )]
    );

    let err = remote
        .fetch_template_file("logger/missing.ts")
        .await
        .unwrap_err()
        .to_string();
    assert!(err.contains("Failed to fetch template"), "{err}");

    assert!(remote.fetch_template_file("../registry.json").await.is_err());
}

#[tokio::test]
async fn offline_template_missing_locally_is_an_error() {
    let local = tempfile::tempdir().unwrap();
    fs::write(
        local.path().join("registry.json"),
        registry_json("0.1.0", "https://example.com/templates"),
    )
    .unwrap();

    let cache = tempfile::tempdir().unwrap();
    let mut offline = client(vec![local.path()], None, cache.path());
    let err = offline
        .fetch_template_file("logger/logger.ts")
        .await
        .unwrap_err()
        .to_string();
    assert!(err.contains("offline mode"), "{err}");
}

#[tokio::test]
async fn expired_cache_is_refetched() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/registry.json");
            then.status(200)
                .body(registry_json("0.4.0", "https://example.com/templates"));
        })
        .await;

    let cache = tempfile::tempdir().unwrap();
    fs::write(
        cache.path().join("registry.json"),
        registry_json("0.0.1", "https://example.com/templates"),
    )
    .unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;
    let mut remote = RegistryClient::new(
        vec![],
        Some(server.url("/registry.json").parse().unwrap()),
        RegistryCache::new(cache.path().to_path_buf()).with_ttl(Duration::ZERO),
        "yantr-test",
    );
    assert_eq!(remote.registry().await.unwrap().version, "0.4.0");
    mock.assert_async().await;

    let cached = fs::read_to_string(cache.path().join("registry.json")).unwrap();
    assert!(cached.contains("0.4.0"));
}
