//! Registry descriptor types and parsing

use crate::config::{DatabaseType, Framework, Orm};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Template files of a component: one list for every framework, or one per framework
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComponentFiles {
    Shared(Vec<String>),
    PerFramework(BTreeMap<Framework, Vec<String>>),
}

impl Default for ComponentFiles {
    fn default() -> Self {
        ComponentFiles::Shared(Vec::new())
    }
}

impl ComponentFiles {
    /// Files for a framework; `None` when the framework has no (or an empty) entry
    pub fn for_framework(&self, framework: Framework) -> Option<&[String]> {
        match self {
            ComponentFiles::Shared(files) => Some(files),
            ComponentFiles::PerFramework(map) => map
                .get(&framework)
                .map(Vec::as_slice)
                .filter(|files| !files.is_empty()),
        }
    }

    /// Frameworks that have at least one file
    pub fn available_frameworks(&self) -> Vec<Framework> {
        match self {
            ComponentFiles::Shared(_) => Framework::ALL.to_vec(),
            ComponentFiles::PerFramework(map) => map
                .iter()
                .filter(|(_, files)| !files.is_empty())
                .map(|(fw, _)| *fw)
                .collect(),
        }
    }

    /// Every file path mentioned, across all frameworks
    pub fn all(&self) -> Vec<&str> {
        match self {
            ComponentFiles::Shared(files) => files.iter().map(String::as_str).collect(),
            ComponentFiles::PerFramework(map) => map
                .values()
                .flat_map(|files| files.iter().map(String::as_str))
                .collect(),
        }
    }
}

/// npm packages: a flat list, or `common` plus per-framework additions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencyList {
    Flat(Vec<String>),
    Grouped {
        #[serde(default)]
        common: Vec<String>,
        #[serde(flatten)]
        frameworks: BTreeMap<String, Vec<String>>,
    },
}

impl Default for DependencyList {
    fn default() -> Self {
        DependencyList::Flat(Vec::new())
    }
}

impl DependencyList {
    /// Common packages followed by the framework's own, without duplicates
    pub fn for_framework(&self, framework: Framework) -> Vec<String> {
        let mut packages = match self {
            DependencyList::Flat(list) => list.clone(),
            DependencyList::Grouped { common, frameworks } => {
                let mut list = common.clone();
                if let Some(extra) = frameworks.get(framework.key()) {
                    list.extend(extra.iter().cloned());
                }
                list
            }
        };
        let mut seen = std::collections::HashSet::new();
        packages.retain(|p| seen.insert(p.clone()));
        packages
    }
}

/// One database/ORM combination of the database component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub label: String,
    pub files: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub dev_dependencies: Vec<String>,
}

/// A named bundle of template files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub framework_specific: bool,
    #[serde(default)]
    pub files: ComponentFiles,
    #[serde(default)]
    pub dependencies: DependencyList,
    #[serde(default)]
    pub dev_dependencies: DependencyList,
    /// Keyed `<database>-<orm>`; only the database component has these
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variants: BTreeMap<String, Variant>,
}

impl Component {
    pub fn variant_key(db: DatabaseType, orm: Orm) -> String {
        format!("{}-{}", db.key(), orm.key())
    }

    pub fn variant(&self, db: DatabaseType, orm: Orm) -> Option<&Variant> {
        self.variants.get(&Self::variant_key(db, orm))
    }

    /// Files for `framework`; `key` is the component's registry key, used in the error
    pub fn files_for(&self, key: &str, framework: Framework) -> Result<Vec<String>, Error> {
        self.files
            .for_framework(framework)
            .map(<[String]>::to_vec)
            .ok_or_else(|| Error::NotAvailableForFramework {
                component: key.to_string(),
                framework: framework.display_name().to_string(),
                available: self
                    .files
                    .available_frameworks()
                    .iter()
                    .map(|fw| fw.key().to_string())
                    .collect(),
            })
    }
}

/// Templates copied by `yantr init`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseTemplates {
    #[serde(default)]
    pub files: ComponentFiles,
    #[serde(default)]
    pub dependencies: DependencyList,
    #[serde(default)]
    pub dev_dependencies: DependencyList,
}

/// The registry descriptor (registry.json)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registry {
    pub version: String,

    /// Oldest CLI release that understands this registry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_cli_version: Option<String>,

    /// Remote location of `templates/`
    pub base_url: String,

    #[serde(default)]
    pub base: BaseTemplates,

    pub components: BTreeMap<String, Component>,
}

impl Registry {
    pub fn component_names(&self) -> Vec<String> {
        self.components.keys().cloned().collect()
    }

    pub fn component(&self, name: &str) -> Result<&Component, Error> {
        self.components
            .get(name)
            .ok_or_else(|| Error::UnknownComponent {
                name: name.to_string(),
                available: self.component_names(),
            })
    }

    /// Files of a component for the project's framework
    pub fn component_files(&self, name: &str, framework: Framework) -> Result<Vec<String>, Error> {
        self.component(name)?.files_for(name, framework)
    }

    pub fn variant(&self, component: &str, db: DatabaseType, orm: Orm) -> Result<&Variant, Error> {
        self.component(component)?
            .variant(db, orm)
            .ok_or_else(|| Error::UnknownVariant {
                component: component.to_string(),
                variant: Component::variant_key(db, orm),
            })
    }

    /// Every template path the descriptor references
    pub fn referenced_files(&self) -> Vec<&str> {
        let mut files = self.base.files.all();
        for component in self.components.values() {
            files.extend(component.files.all());
            for variant in component.variants.values() {
                files.extend(variant.files.iter().map(String::as_str));
            }
        }
        files.sort_unstable();
        files.dedup();
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "version": "0.2.0",
        "minCliVersion": "0.1.0",
        "baseUrl": "https://example.com/templates",
        "base": {
            "files": { "express": ["express/base/error-handler.ts"] },
            "dependencies": ["zod"]
        },
        "components": {
            "logger": {
                "name": "Logger",
                "description": "Structured logging",
                "files": ["logger/logger.ts", "logger/http-logger.ts"],
                "dependencies": ["pino", "pino-http"],
                "devDependencies": ["pino-pretty"]
            },
            "auth": {
                "name": "Authentication",
                "description": "JWT auth",
                "frameworkSpecific": true,
                "files": {
                    "express": ["express/auth/auth.routes.ts"],
                    "hono": ["hono/auth/auth.routes.ts"],
                    "fastify": []
                },
                "dependencies": { "common": ["jsonwebtoken", "bcryptjs"], "hono": ["@hono/zod-validator"] }
            },
            "database": {
                "name": "Database",
                "description": "ORM setup",
                "variants": {
                    "postgres-prisma": {
                        "label": "PostgreSQL + Prisma",
                        "files": ["shared/database/prisma/db.ts"],
                        "dependencies": ["@prisma/client"],
                        "devDependencies": ["prisma"]
                    }
                }
            }
        }
    }"#;

    fn registry() -> Registry {
        serde_json::from_str(SAMPLE).unwrap()
    }

    #[test]
    fn test_shared_files_apply_to_every_framework() {
        let reg = registry();
        for fw in Framework::ALL {
            assert_eq!(reg.component_files("logger", fw).unwrap().len(), 2);
        }
    }

    #[test]
    fn test_framework_specific_files() {
        let reg = registry();
        assert_eq!(
            reg.component_files("auth", Framework::Hono).unwrap(),
            vec!["hono/auth/auth.routes.ts"]
        );

        let err = reg.component_files("auth", Framework::Fastify).unwrap_err();
        match err {
            Error::NotAvailableForFramework { available, .. } => {
                assert_eq!(available, vec!["express", "hono"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_component_lists_available() {
        let err = registry().component("cache").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown component: cache. Available components: auth, database, logger"
        );
    }

    #[test]
    fn test_grouped_dependencies() {
        let reg = registry();
        let auth = reg.component("auth").unwrap();
        assert_eq!(
            auth.dependencies.for_framework(Framework::Hono),
            vec!["jsonwebtoken", "bcryptjs", "@hono/zod-validator"]
        );
        assert_eq!(
            auth.dependencies.for_framework(Framework::Express),
            vec!["jsonwebtoken", "bcryptjs"]
        );
        assert!(auth.dev_dependencies.for_framework(Framework::Express).is_empty());
    }

    #[test]
    fn test_database_variants() {
        let reg = registry();
        let variant = reg
            .variant("database", DatabaseType::Postgres, Orm::Prisma)
            .unwrap();
        assert_eq!(variant.label, "PostgreSQL + Prisma");
        assert_eq!(variant.dev_dependencies, vec!["prisma"]);

        let err = reg
            .variant("database", DatabaseType::Postgres, Orm::Drizzle)
            .unwrap_err();
        assert!(err.to_string().contains("postgres-drizzle"));
    }

    #[test]
    fn test_referenced_files_cover_base_components_and_variants() {
        let reg = registry();
        let files = reg.referenced_files();
        assert!(files.contains(&"express/base/error-handler.ts"));
        assert!(files.contains(&"logger/http-logger.ts"));
        assert!(files.contains(&"shared/database/prisma/db.ts"));
        assert_eq!(reg.min_cli_version.as_deref(), Some("0.1.0"));
    }
}
