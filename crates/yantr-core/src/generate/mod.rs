//! Boilerplate generation (`yantr generate route <name>`)
//!
//! Route and controller templates are framework specific; the service layer is
//! shared. Templates are compiled into the binary so generation works offline.

pub mod names;

pub use names::{normalize_name, to_camel_case, to_pascal_case, ResourceNames};

use crate::config::Framework;
use crate::project::join_relative;
use crate::render::render;
use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;

const SERVICE_TEMPLATE: &str = include_str!("../../templates/generate/service.ts.tmpl");

const EXPRESS_ROUTE: &str = include_str!("../../templates/generate/express/route.ts.tmpl");
const EXPRESS_CONTROLLER: &str =
    include_str!("../../templates/generate/express/controller.ts.tmpl");
const HONO_ROUTE: &str = include_str!("../../templates/generate/hono/route.ts.tmpl");
const HONO_CONTROLLER: &str = include_str!("../../templates/generate/hono/controller.ts.tmpl");
const FASTIFY_ROUTE: &str = include_str!("../../templates/generate/fastify/route.ts.tmpl");
const FASTIFY_CONTROLLER: &str =
    include_str!("../../templates/generate/fastify/controller.ts.tmpl");

/// What `yantr generate` can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateKind {
    Route,
}

impl GenerateKind {
    pub const VALID: &'static [&'static str] = &["route"];

    pub fn parse(kind: &str) -> Result<Self> {
        match kind {
            "route" => Ok(GenerateKind::Route),
            other => anyhow::bail!(
                "Unknown type: {}. Available types: {}",
                other,
                Self::VALID.join(", ")
            ),
        }
    }
}

impl fmt::Display for GenerateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateKind::Route => write!(f, "route"),
        }
    }
}

/// Role of a generated file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Route,
    Controller,
    Service,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileKind::Route => "route",
            FileKind::Controller => "controller",
            FileKind::Service => "service",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFile {
    pub kind: FileKind,
    pub path: PathBuf,
    pub content: String,
}

fn templates_for(framework: Framework) -> (&'static str, &'static str) {
    match framework {
        Framework::Express => (EXPRESS_ROUTE, EXPRESS_CONTROLLER),
        Framework::Hono => (HONO_ROUTE, HONO_CONTROLLER),
        Framework::Fastify => (FASTIFY_ROUTE, FASTIFY_CONTROLLER),
    }
}

/// Route, controller and service files for a resource, rendered but not written
pub fn route_files(
    project_dir: &Path,
    src_dir: &str,
    names: &ResourceNames,
    framework: Framework,
) -> Vec<GeneratedFile> {
    let base = join_relative(project_dir, src_dir);
    let vars = names.vars();
    let (route, controller) = templates_for(framework);

    vec![
        GeneratedFile {
            kind: FileKind::Route,
            path: base
                .join("routes")
                .join(format!("{}.routes.ts", names.kebab)),
            content: render(route, &vars),
        },
        GeneratedFile {
            kind: FileKind::Controller,
            path: base
                .join("controllers")
                .join(format!("{}.controller.ts", names.kebab)),
            content: render(controller, &vars),
        },
        GeneratedFile {
            kind: FileKind::Service,
            path: base
                .join("services")
                .join(format!("{}.service.ts", names.kebab)),
            content: render(SERVICE_TEMPLATE, &vars),
        },
    ]
}

pub async fn write_generated(files: &[GeneratedFile]) -> Result<()> {
    for file in files {
        if let Some(parent) = file.path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(&file.path, &file.content)
            .await
            .with_context(|| format!("Failed to write file: {}", file.path.display()))?;
    }
    Ok(())
}

/// How to mount the generated router in the application
pub fn mount_hint(framework: Framework, src_dir: &str, names: &ResourceNames) -> Vec<String> {
    let src = src_dir.trim_start_matches("./").trim_end_matches('/');
    let module = if src.is_empty() || src == "." {
        format!("./routes/{}.routes", names.kebab)
    } else {
        format!("./{}/routes/{}.routes", src, names.kebab)
    };
    let import = format!("import {}Routes from '{}';", names.camel, module);
    let mount = match framework {
        Framework::Express => format!("app.use('/api/{}', {}Routes);", names.kebab, names.camel),
        Framework::Hono => format!("app.route('/api/{}', {}Routes);", names.kebab, names.camel),
        Framework::Fastify => format!(
            "app.register({}Routes, {{ prefix: '/api/{}' }});",
            names.camel, names.kebab
        ),
    };
    vec![import, mount]
}
