//! Short schema labels for report output

use std::collections::{BTreeSet, HashMap};

use crate::model::ObjectIdentity;

/// Strip the leading characters shared by every schema name.
///
/// Characters are removed one at a time while all names still start with the same
/// one. A single schema therefore shortens to an empty label.
pub fn short_schema_labels<'a, I>(schemas: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = &'a str>,
{
    let names: BTreeSet<&str> = schemas.into_iter().collect();
    let mut skip = 0usize;

    if let Some(first) = names.iter().next() {
        for (offset, c) in first.char_indices() {
            let shared = names
                .iter()
                .all(|name| name.get(offset..).is_some_and(|rest| rest.starts_with(c)));
            if !shared {
                break;
            }
            skip = offset + c.len_utf8();
        }
    }

    names
        .into_iter()
        .map(|name| (name.to_string(), name[skip..].to_string()))
        .collect()
}

/// `kind:short.name`, or `kind:name` when the short label is empty.
pub fn short_identity(identity: &ObjectIdentity, labels: &HashMap<String, String>) -> String {
    let short = labels
        .get(&identity.schema)
        .map(String::as_str)
        .unwrap_or(&identity.schema);
    if short.is_empty() {
        format!("{}:{}", identity.kind.code(), identity.name)
    } else {
        format!("{}:{}.{}", identity.kind.code(), short, identity.name)
    }
}
