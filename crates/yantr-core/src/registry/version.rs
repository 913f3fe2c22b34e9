//! Version comparison for CLI and registry compatibility

use anyhow::Result;
use semver::Version;

/// Compare the running CLI against the registry's minimum CLI version
/// Returns a warning message if the CLI is older than the registry expects
pub fn check_compatibility(
    cli_version: &str,
    min_cli_version: &str,
    upgrade_command: &str,
) -> Option<String> {
    // Unparsable versions never produce a warning
    let cli_ver = parse_version(cli_version).ok()?;
    let required = parse_version(min_cli_version).ok()?;

    if cli_ver < required {
        Some(format!(
            "This registry requires CLI version {} or newer.\n\
             You are running version {}.\n\
             Consider updating: {}",
            required, cli_ver, upgrade_command
        ))
    } else {
        None
    }
}

/// Parse version string, accepting a leading `v`
pub fn parse_version(version_str: &str) -> Result<Version> {
    let cleaned = version_str.trim();
    let cleaned = cleaned.strip_prefix('v').unwrap_or(cleaned);
    Version::parse(cleaned).map_err(|e| anyhow::anyhow!("Invalid version '{}': {}", version_str, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_older_than_registry() {
        let warning = check_compatibility("0.1.0", "0.2.0", "cargo install yantr-cli --force");
        assert!(warning.is_some());
        assert!(warning.unwrap().contains("0.2.0"));
    }

    #[test]
    fn test_cli_same_as_registry() {
        let warning = check_compatibility("0.1.0", "0.1.0", "cargo install yantr-cli --force");
        assert!(warning.is_none());
    }

    #[test]
    fn test_cli_newer_than_registry() {
        let warning = check_compatibility("0.2.0", "0.1.0", "cargo install yantr-cli --force");
        assert!(warning.is_none());
    }

    #[test]
    fn test_leading_v_is_accepted() {
        let warning = check_compatibility("0.1.0", "v0.3.1", "cargo install yantr-cli --force");
        assert!(warning.unwrap().contains("0.3.1"));
    }

    #[test]
    fn test_invalid_versions() {
        let warning = check_compatibility("invalid", "0.1.0", "cargo install yantr-cli --force");
        assert!(warning.is_none());
    }

    #[test]
    fn test_prerelease_is_older_than_release() {
        let warning =
            check_compatibility("0.1.0-beta.2", "0.1.0", "cargo install yantr-cli --force");
        assert!(warning.is_some());
    }
}
