//! Schema maps, schema-name normalization and object selection

use std::collections::{BTreeMap, BTreeSet, HashSet};

use glob::Pattern;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::elements::{ObjectDefinition, ObjectIdentity, SchemaObject};
use crate::error::SchemaCompareError;

/// One configured substring replacement applied to raw schema names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaNameReplacement {
    pub substring: String,
    pub replacement: String,
}

/// Ordered list of substring replacements.
///
/// Applied to every schema name before an identity is formed or a selection is
/// tested, and to view/function bodies before they are compared.
#[derive(Debug, Clone, Default)]
pub struct SchemaNormalizer {
    replacements: Vec<SchemaNameReplacement>,
}

impl SchemaNormalizer {
    pub fn new(replacements: Vec<SchemaNameReplacement>) -> Self {
        Self { replacements }
    }

    pub fn apply(&self, text: &str) -> String {
        self.replacements
            .iter()
            .filter(|r| !r.substring.is_empty())
            .fold(text.to_string(), |acc, r| {
                acc.replace(&r.substring, &r.replacement)
            })
    }
}

/// Which objects a collector keeps.
#[derive(Debug, Clone)]
pub enum Selection {
    /// Keep everything (dump mode)
    All,
    /// Keep objects in the normalized `schemas` whose bare name matches `pattern`
    Filtered {
        schemas: HashSet<String>,
        pattern: Pattern,
    },
}

impl Selection {
    /// Build a filtered selection, normalizing the selected schema names.
    pub fn new<I, S>(
        schemas: I,
        pattern: &str,
        normalizer: &SchemaNormalizer,
    ) -> Result<Self, SchemaCompareError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Selection::Filtered {
            schemas: schemas
                .into_iter()
                .map(|s| normalizer.apply(s.as_ref()))
                .collect(),
            pattern: compile_pattern(pattern)?,
        })
    }

    /// Test an object; `schema` must already be normalized.
    pub fn accepts(&self, schema: &str, name: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Filtered { schemas, pattern } => {
                schemas.contains(schema) && pattern.matches(name)
            }
        }
    }
}

/// Compile a glob pattern, mapping failures onto the crate error.
pub fn compile_pattern(pattern: &str) -> Result<Pattern, SchemaCompareError> {
    Pattern::new(pattern).map_err(|e| SchemaCompareError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// All object definitions collected for one side of a comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaMap {
    objects: BTreeMap<ObjectIdentity, ObjectDefinition>,
}

impl SchemaMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object. A later definition for the same identity replaces the
    /// earlier one.
    pub fn insert(&mut self, object: SchemaObject) {
        if self.objects.contains_key(&object.identity) {
            warn!(
                "Duplicate definition for {}, keeping the last one",
                object.identity
            );
        }
        self.objects.insert(object.identity, object.definition);
    }

    pub fn get(&self, identity: &ObjectIdentity) -> Option<&ObjectDefinition> {
        self.objects.get(identity)
    }

    pub fn contains(&self, identity: &ObjectIdentity) -> bool {
        self.objects.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Objects in identity order.
    pub fn iter(&self) -> impl Iterator<Item = (&ObjectIdentity, &ObjectDefinition)> {
        self.objects.iter()
    }

    pub fn identities(&self) -> impl Iterator<Item = &ObjectIdentity> {
        self.objects.keys()
    }

    /// Distinct schema names present in the map.
    pub fn schemas(&self) -> BTreeSet<&str> {
        self.objects.keys().map(|id| id.schema.as_str()).collect()
    }
}

impl FromIterator<SchemaObject> for SchemaMap {
    fn from_iter<T: IntoIterator<Item = SchemaObject>>(iter: T) -> Self {
        let mut map = SchemaMap::new();
        for object in iter {
            map.insert(object);
        }
        map
    }
}
