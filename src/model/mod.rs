//! Schema object model

mod dump;
mod elements;
mod schema_map;

pub use dump::dump_json;
pub use elements::*;
pub use schema_map::{
    compile_pattern, SchemaMap, SchemaNameReplacement, SchemaNormalizer, Selection,
};
