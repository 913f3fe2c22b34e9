//! Dependency installation through the project's package manager
//!
//! The package manager is an external black box: yantr only builds the
//! command line, runs it in the project directory and reports the outcome.

use crate::config::PackageManager;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// Timeout for a single install command (5 minutes)
const INSTALL_TIMEOUT: Duration = Duration::from_secs(300);

/// Lines of stderr kept for the error message in quiet mode
const STDERR_TAIL: usize = 20;

/// Arguments passed to the package manager to add `packages`
pub fn install_args(pm: PackageManager, packages: &[String], dev: bool) -> Vec<String> {
    let mut args = Vec::with_capacity(packages.len() + 2);
    match pm {
        PackageManager::Npm => {
            args.push("install".to_string());
            if dev {
                args.push("--save-dev".to_string());
            }
        }
        PackageManager::Pnpm | PackageManager::Yarn => {
            args.push("add".to_string());
            if dev {
                args.push("-D".to_string());
            }
        }
        PackageManager::Bun => {
            args.push("add".to_string());
            if dev {
                args.push("-d".to_string());
            }
        }
    }
    args.extend(packages.iter().cloned());
    args
}

/// Command line shown to the user when automatic installation fails
pub fn manual_command(pm: PackageManager, packages: &[String], dev: bool) -> String {
    let mut parts = vec![pm.command().to_string()];
    parts.extend(install_args(pm, packages, dev));
    parts.join(" ")
}

/// Runs the package manager inside a project directory
#[derive(Debug, Clone)]
pub struct PackageInstaller {
    pm: PackageManager,
    cwd: PathBuf,
    program: String,
    quiet: bool,
}

impl PackageInstaller {
    pub fn new(pm: PackageManager, cwd: impl Into<PathBuf>) -> Self {
        Self {
            pm,
            cwd: cwd.into(),
            program: pm.command().to_string(),
            quiet: false,
        }
    }

    /// Run a different executable with the same arguments
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Capture output instead of streaming it; it is logged at debug level
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn package_manager(&self) -> PackageManager {
        self.pm
    }

    /// Check if the package manager is available in PATH
    pub fn is_available(&self) -> bool {
        std::process::Command::new(&self.program)
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Install `packages`; an empty list does nothing
    pub async fn install(&self, packages: &[String], dev: bool) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }

        let args = install_args(self.pm, packages, dev);
        let display = manual_command(self.pm, packages, dev);
        tracing::debug!(program = %self.program, ?args, cwd = %self.cwd.display(), "running package manager");

        if !self.quiet {
            println!();
            println!("{} {}", "Running:".dimmed(), display.yellow());
            println!();
        }

        let mut child = TokioCommand::new(&self.program)
            .args(&args)
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to start {}", self.program))?;

        let stdout = child
            .stdout
            .take()
            .context("Failed to capture package manager stdout")?;
        let stderr = child
            .stderr
            .take()
            .context("Failed to capture package manager stderr")?;

        let mut stdout_reader = BufReader::new(stdout).lines();
        let mut stderr_reader = BufReader::new(stderr).lines();
        let mut stderr_tail: Vec<String> = Vec::new();
        let quiet = self.quiet;

        let output_task = async {
            let mut stdout_done = false;
            let mut stderr_done = false;
            while !(stdout_done && stderr_done) {
                tokio::select! {
                    line = stdout_reader.next_line(), if !stdout_done => {
                        match line {
                            Ok(Some(line)) => {
                                if quiet {
                                    tracing::debug!(target: "yantr::installer", "{}", line);
                                } else {
                                    println!("  {}", line);
                                }
                            }
                            _ => stdout_done = true,
                        }
                    }
                    line = stderr_reader.next_line(), if !stderr_done => {
                        match line {
                            Ok(Some(line)) => {
                                if quiet {
                                    tracing::debug!(target: "yantr::installer", "{}", line);
                                    stderr_tail.push(line);
                                    if stderr_tail.len() > STDERR_TAIL {
                                        stderr_tail.remove(0);
                                    }
                                } else {
                                    eprintln!("  {}", line.yellow());
                                }
                            }
                            _ => stderr_done = true,
                        }
                    }
                }
            }
        };

        if timeout(INSTALL_TIMEOUT, output_task).await.is_err() {
            let _ = child.kill().await;
            anyhow::bail!(
                "{} timed out after {} seconds. Please run manually: {}",
                self.program,
                INSTALL_TIMEOUT.as_secs(),
                display
            );
        }

        let status = match timeout(Duration::from_secs(5), child.wait()).await {
            Ok(status) => status.with_context(|| format!("Failed to wait for {}", self.program))?,
            Err(_) => {
                let _ = child.kill().await;
                anyhow::bail!("{} hung. Please run manually: {}", self.program, display);
            }
        };

        if !status.success() {
            let mut message = format!(
                "{} exited with code {}. Please run manually: {}",
                self.program,
                status.code().unwrap_or(-1),
                display
            );
            if !stderr_tail.is_empty() {
                message.push('\n');
                message.push_str(&stderr_tail.join("\n"));
            }
            anyhow::bail!(message);
        }

        Ok(())
    }
}
