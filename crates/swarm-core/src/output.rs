//! Graph Logger
//!
//! Append-only JSONL logging of per-tick graph snapshots.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use swarm_events::GraphSnapshot;

use crate::engine::RelationGraphEngine;

/// Captures the engine's current positions and both graphs.
pub fn snapshot_of(engine: &RelationGraphEngine, tick: u64, arrangement: [f64; 2]) -> GraphSnapshot {
    let mut snapshot = GraphSnapshot::new(tick, engine.dim(), engine.agents());
    snapshot.observation = engine.observation().to_adjacency();
    snapshot.communication = engine.communication().to_adjacency();
    snapshot.arrangement_vector = arrangement;
    snapshot
}

/// Writes graph snapshots to a JSONL file
pub struct GraphLogger {
    writer: Option<BufWriter<File>>,
    snapshot_count: u64,
}

impl GraphLogger {
    /// Create a new logger writing to the specified path
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            snapshot_count: 0,
        })
    }

    /// Create a logger that discards snapshots (for testing)
    pub fn null() -> Self {
        Self {
            writer: None,
            snapshot_count: 0,
        }
    }

    pub fn snapshot_count(&self) -> u64 {
        self.snapshot_count
    }

    /// Log a snapshot as one line
    pub fn log(&mut self, snapshot: &GraphSnapshot) -> std::io::Result<()> {
        self.snapshot_count += 1;
        if let Some(ref mut writer) = self.writer {
            let json = snapshot.to_jsonl()?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for GraphLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("Failed to flush graph logger: {}", e);
        }
    }
}
