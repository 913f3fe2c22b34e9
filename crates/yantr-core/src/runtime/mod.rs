//! Runtime detection and package installation
//!
//! This module provides:
//! - JavaScript runtime detection (Node.js, Bun)
//! - Package manager invocation for dependency installs

pub mod check;
pub mod installer;

pub use check::{check_runtime, RuntimeInfo};
pub use installer::{install_args, manual_command, PackageInstaller};
