//! Runtime detection for Node.js and Bun

use crate::config::Runtime;
use std::process::Command;

/// Runtime detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

/// Run `<binary> --version` and report what it printed
pub fn probe(name: &'static str, binary: &str) -> RuntimeInfo {
    let output = Command::new(binary).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            RuntimeInfo {
                name,
                version: Some(version),
                available: true,
            }
        }
        _ => RuntimeInfo {
            name,
            version: None,
            available: false,
        },
    }
}

/// Check whether the project's runtime is installed
pub fn check_runtime(runtime: Runtime) -> RuntimeInfo {
    probe(runtime.display_name(), runtime.binary())
}

/// Install hint for a missing runtime
pub fn install_hint(runtime: Runtime) -> &'static str {
    match runtime {
        Runtime::Node => "install from https://nodejs.org",
        Runtime::Bun => "install from https://bun.sh",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_is_unavailable() {
        let info = probe("Nothing", "yantr-definitely-not-a-real-binary");
        assert!(!info.available);
        assert!(info.version.is_none());
        assert_eq!(info.name, "Nothing");
    }

    #[test]
    fn test_check_runtime_reports_display_name() {
        let info = check_runtime(Runtime::Bun);
        assert_eq!(info.name, "Bun");
        assert_eq!(info.available, info.version.is_some());
    }
}
