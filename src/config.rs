//! JSON configuration file and side-argument resolution

use std::path::{Path, PathBuf};

use anyhow::Result;
use glob::Pattern;
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::error::SchemaCompareError;
use crate::model::{compile_pattern, SchemaNameReplacement, SchemaNormalizer};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "dbsc-config.json";

/// Separator between schema names in a side argument or schema group.
const SCHEMA_SEPARATOR: char = '+';

/// Settings read from the configuration file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Group name to `+`-joined schema list
    pub schema_groups: IndexMap<String, String>,
    pub schema_name_replacements: Vec<SchemaNameReplacement>,
    /// Globs over `kind:schema.name` for objects a project folder may lack
    pub ignored_objects_in_repo: Vec<String>,
}

impl Config {
    /// Load a configuration file. A missing file yields the default configuration.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No configuration file at {}", path.display());
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(path).map_err(|e| SchemaCompareError::ConfigReadError {
                path: path.to_path_buf(),
                source: e,
            })?;
        Ok(Self::parse(&content, path)?)
    }

    /// Parse configuration text, dropping `//` comment lines first.
    pub fn parse(content: &str, path: &Path) -> Result<Self, SchemaCompareError> {
        let json: String = content
            .lines()
            .filter(|line| !line.trim_start().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&json).map_err(|e| SchemaCompareError::ConfigParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn normalizer(&self) -> SchemaNormalizer {
        SchemaNormalizer::new(self.schema_name_replacements.clone())
    }

    pub fn ignore_patterns(&self) -> Result<Vec<Pattern>, SchemaCompareError> {
        self.ignored_objects_in_repo
            .iter()
            .map(|p| compile_pattern(p))
            .collect()
    }

    /// Expand a group name, or split the argument itself as a schema list.
    pub fn schema_list(&self, arg: &str) -> Vec<String> {
        let list = self.schema_groups.get(arg).map(String::as_str).unwrap_or(arg);
        list.split(SCHEMA_SEPARATOR)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Interpret one side argument. An existing path is a project folder.
    pub fn resolve_side(&self, arg: &str) -> SideSpec {
        let path = Path::new(arg);
        if path.exists() {
            SideSpec::Folder(path.to_path_buf())
        } else {
            SideSpec::Schemas(self.schema_list(arg))
        }
    }
}

/// Where one side of a comparison comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideSpec {
    /// Notebook project folder
    Folder(PathBuf),
    /// Schemas read from the catalog
    Schemas(Vec<String>),
}

impl SideSpec {
    pub fn is_folder(&self) -> bool {
        matches!(self, SideSpec::Folder(_))
    }

    /// Column heading: the folder path or the `+`-joined schema names.
    pub fn label(&self) -> String {
        match self {
            SideSpec::Folder(path) => path.display().to_string(),
            SideSpec::Schemas(schemas) => schemas.join("+"),
        }
    }
}
