//! Progress reporting at collection and comparison checkpoints

use tracing::{debug, info};

use crate::model::Side;

/// Where in the pipeline a progress event was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Checkpoint {
    /// A schema's object lists were fetched from the catalog
    SchemaList,
    /// One object definition was read and parsed
    ObjectRead,
    /// One object identity was compared
    ObjectCompared,
}

/// Receives progress events. Owns whatever state it needs; nothing is global.
pub trait ProgressReporter {
    /// `index` is 1-based within `total`; `item` names the schema or object.
    fn checkpoint(&mut self, checkpoint: Checkpoint, side: Option<Side>, index: usize, total: usize, item: &str);

    /// Called once after the comparison or dump completes.
    fn finish(&mut self) {}
}

/// Emits `debug!` events and keeps per-checkpoint counts.
#[derive(Debug, Default)]
pub struct TracingProgress {
    schema_lists: usize,
    objects_read: usize,
    objects_compared: usize,
}

impl TracingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, checkpoint: Checkpoint) -> usize {
        match checkpoint {
            Checkpoint::SchemaList => self.schema_lists,
            Checkpoint::ObjectRead => self.objects_read,
            Checkpoint::ObjectCompared => self.objects_compared,
        }
    }
}

impl ProgressReporter for TracingProgress {
    fn checkpoint(&mut self, checkpoint: Checkpoint, side: Option<Side>, index: usize, total: usize, item: &str) {
        match checkpoint {
            Checkpoint::SchemaList => self.schema_lists += 1,
            Checkpoint::ObjectRead => self.objects_read += 1,
            Checkpoint::ObjectCompared => self.objects_compared += 1,
        }
        let percent = if total == 0 { 100 } else { index * 100 / total };
        match side {
            Some(side) => debug!("[{side}] {checkpoint:?} {index}/{total} ({percent}%) {item}"),
            None => debug!("{checkpoint:?} {index}/{total} ({percent}%) {item}"),
        }
    }

    fn finish(&mut self) {
        info!(
            "Progress: {} schema lists, {} objects read, {} objects compared",
            self.schema_lists, self.objects_read, self.objects_compared
        );
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn checkpoint(&mut self, _: Checkpoint, _: Option<Side>, _: usize, _: usize, _: &str) {}
}
