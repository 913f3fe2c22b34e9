//! Enumerated choices stored in yantr.json

use crate::error::Error;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Web frameworks yantr can scaffold for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    Express,
    Hono,
    Fastify,
}

impl Framework {
    pub const ALL: [Framework; 3] = [Framework::Express, Framework::Hono, Framework::Fastify];

    /// Key used in yantr.json and the registry
    pub fn key(&self) -> &'static str {
        match self {
            Framework::Express => "express",
            Framework::Hono => "hono",
            Framework::Fastify => "fastify",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Framework::Express => "Express.js",
            Framework::Hono => "Hono",
            Framework::Fastify => "Fastify",
        }
    }

    /// npm package providing the framework
    pub fn package(&self) -> &'static str {
        self.key()
    }

    /// Version range written into a fresh package.json
    pub fn version_range(&self) -> &'static str {
        match self {
            Framework::Express => "^4.18.0",
            Framework::Hono => "^4.0.0",
            Framework::Fastify => "^4.0.0",
        }
    }

    /// Type packages needed when the project is created from scratch
    pub fn dev_dependencies(&self) -> &'static [&'static str] {
        match self {
            Framework::Express => &["@types/express"],
            Framework::Hono | Framework::Fastify => &[],
        }
    }

    /// Express and Hono ship the complete component set; Fastify only has base templates
    pub fn is_fully_supported(&self) -> bool {
        matches!(self, Framework::Express | Framework::Hono)
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// JavaScript runtime the project runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Runtime {
    #[default]
    Node,
    Bun,
}

impl Runtime {
    pub fn display_name(&self) -> &'static str {
        match self {
            Runtime::Node => "Node.js",
            Runtime::Bun => "Bun",
        }
    }

    /// Binary probed by runtime detection
    pub fn binary(&self) -> &'static str {
        match self {
            Runtime::Node => "node",
            Runtime::Bun => "bun",
        }
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    pub const ALL: [PackageManager; 4] = [
        PackageManager::Npm,
        PackageManager::Pnpm,
        PackageManager::Yarn,
        PackageManager::Bun,
    ];

    pub fn command(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    Postgres,
    Mongodb,
}

impl DatabaseType {
    pub const ALL: [DatabaseType; 2] = [DatabaseType::Postgres, DatabaseType::Mongodb];

    pub fn key(&self) -> &'static str {
        match self {
            DatabaseType::Postgres => "postgres",
            DatabaseType::Mongodb => "mongodb",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DatabaseType::Postgres => "PostgreSQL",
            DatabaseType::Mongodb => "MongoDB",
        }
    }

    /// ORMs that can drive this database, recommended first
    pub fn orms(&self) -> &'static [Orm] {
        match self {
            DatabaseType::Postgres => &[Orm::Prisma, Orm::Drizzle],
            DatabaseType::Mongodb => &[Orm::Mongoose],
        }
    }

    pub fn default_orm(&self) -> Orm {
        self.orms()[0]
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Orm {
    Prisma,
    Drizzle,
    Mongoose,
}

impl Orm {
    pub fn key(&self) -> &'static str {
        match self {
            Orm::Prisma => "prisma",
            Orm::Drizzle => "drizzle",
            Orm::Mongoose => "mongoose",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Orm::Prisma => "Prisma",
            Orm::Drizzle => "Drizzle",
            Orm::Mongoose => "Mongoose",
        }
    }

    pub fn database_type(&self) -> DatabaseType {
        match self {
            Orm::Prisma | Orm::Drizzle => DatabaseType::Postgres,
            Orm::Mongoose => DatabaseType::Mongodb,
        }
    }

    /// Reject ORM/database pairs that cannot work together
    pub fn ensure_matches(&self, db: DatabaseType) -> Result<(), Error> {
        if self.database_type() == db {
            Ok(())
        } else {
            Err(Error::OrmMismatch {
                orm: self.display_name().to_string(),
                expected: self.database_type().display_name().to_string(),
            })
        }
    }
}

impl fmt::Display for Orm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orm_database_mapping() {
        assert!(Orm::Prisma.ensure_matches(DatabaseType::Postgres).is_ok());
        assert!(Orm::Drizzle.ensure_matches(DatabaseType::Postgres).is_ok());
        assert!(Orm::Mongoose.ensure_matches(DatabaseType::Mongodb).is_ok());

        let err = Orm::Mongoose
            .ensure_matches(DatabaseType::Postgres)
            .unwrap_err();
        assert_eq!(err.to_string(), "Mongoose can only be used with MongoDB");

        let err = Orm::Drizzle.ensure_matches(DatabaseType::Mongodb).unwrap_err();
        assert_eq!(err.to_string(), "Drizzle can only be used with PostgreSQL");
    }

    #[test]
    fn test_default_orm_is_recommended() {
        assert_eq!(DatabaseType::Postgres.default_orm(), Orm::Prisma);
        assert_eq!(DatabaseType::Mongodb.default_orm(), Orm::Mongoose);
    }

    #[test]
    fn test_framework_keys_round_trip() {
        for fw in Framework::ALL {
            assert_eq!(Framework::from_key(fw.key()), Some(fw));
        }
        assert_eq!(Framework::from_key("koa"), None);
        assert!(!Framework::Fastify.is_fully_supported());
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&PackageManager::Pnpm).unwrap();
        assert_eq!(json, "\"pnpm\"");
        let db: DatabaseType = serde_json::from_str("\"mongodb\"").unwrap();
        assert_eq!(db, DatabaseType::Mongodb);
    }
}
