//! Placing fetched template files into the target project

use crate::render::render;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// A template file resolved to its destination
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedFile {
    /// Registry path the content came from
    pub source: String,
    pub target: PathBuf,
    pub content: String,
    /// Whether `target` already exists on disk
    pub exists: bool,
}

/// Values substituted into `{{projectName}}` and `{{srcDir}}`
#[derive(Debug, Clone)]
pub struct TemplateVars {
    pub project_name: String,
    pub src_dir: String,
}

impl TemplateVars {
    fn apply(&self, content: &str) -> String {
        render(
            content,
            &[
                ("projectName", self.project_name.as_str()),
                ("srcDir", self.src_dir.as_str()),
            ],
        )
    }
}

/// Map fetched files onto `dest_dir/<basename>`
///
/// Two sources with the same basename would overwrite each other, so that is
/// rejected up front.
pub fn plan_files(
    files: Vec<(String, String)>,
    dest_dir: &Path,
    vars: &TemplateVars,
) -> Result<Vec<PlannedFile>> {
    let mut seen: HashMap<PathBuf, String> = HashMap::new();
    let mut planned = Vec::with_capacity(files.len());

    for (source, content) in files {
        let file_name = Path::new(&source)
            .file_name()
            .with_context(|| format!("Template path has no file name: {}", source))?;
        let target = dest_dir.join(file_name);

        if let Some(previous) = seen.insert(target.clone(), source.clone()) {
            anyhow::bail!(
                "Templates {} and {} would both be written to {}",
                previous,
                source,
                target.display()
            );
        }

        planned.push(PlannedFile {
            exists: target.exists(),
            content: vars.apply(&content),
            source,
            target,
        });
    }

    Ok(planned)
}

/// Write planned files, creating parent directories; returns the written paths
pub async fn write_planned(files: &[PlannedFile]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(files.len());

    for file in files {
        if let Some(parent) = file.target.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(&file.target, &file.content)
            .await
            .with_context(|| format!("Failed to write file: {}", file.target.display()))?;
        tracing::debug!(source = %file.source, target = %file.target.display(), "wrote template");
        written.push(file.target.clone());
    }

    Ok(written)
}
