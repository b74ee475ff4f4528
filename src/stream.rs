//! Line-by-line event stream driver.
//!
//! Each input line makes a full round trip (parse, validate, preprocess,
//! title resolution, inference, merge) before the next line is read.
//! Documents are emitted only once the input is drained, one per title in
//! first-occurrence order.

use crate::preprocess::preprocess;
use crate::schema::SchemaNode;
use crate::store::SchemaStore;
use crate::title::resolve_title;
use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Write;
use thiserror::Error;
use tracing::debug;

/// Reasons an input line is skipped without contributing to any schema.
///
/// None of these is fatal: the stream always runs to end-of-input and emits
/// whatever accumulated.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("line is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("event is not a JSON object")]
    NotAnObject,

    #[error("event is missing `event_source` or `event_type`")]
    MissingEventFields,
}

/// Drives the pipeline for one stream and owns the per-title store.
#[derive(Debug, Default)]
pub struct StreamProcessor {
    store: SchemaStore,
}

impl StreamProcessor {
    pub fn new() -> Self {
        StreamProcessor::default()
    }

    /// Consume one input line.
    ///
    /// Errors are recoverable; the caller logs them and moves on.
    pub fn process_line(&mut self, line: &str) -> Result<(), EventError> {
        let value: Value = serde_json::from_str(line)?;
        let event = match value {
            Value::Object(obj) => obj,
            _ => return Err(EventError::NotAnObject),
        };
        if !event.contains_key("event_source") || !event.contains_key("event_type") {
            return Err(EventError::MissingEventFields);
        }

        let event = preprocess(&event);
        // Preprocessing can swallow `event_source`/`event_type` when their
        // values were embedded JSON object strings.
        let title = resolve_title(&event).ok_or(EventError::MissingEventFields)?;

        debug!("Merging event into schema group `{}`", title);
        self.store
            .observe(title, SchemaNode::of_value(&Value::Object(event)));
        Ok(())
    }

    /// Number of distinct titles observed so far.
    pub fn schema_count(&self) -> usize {
        self.store.len()
    }

    /// Emit one compact schema document per title, in first-occurrence
    /// order, one per line.
    pub fn write_schemas<W: Write>(&self, writer: &mut W) -> Result<()> {
        for (title, node) in self.store.snapshot() {
            let document = node.to_document(title);
            serde_json::to_writer(&mut *writer, &document)
                .context("Failed to serialize schema document")?;
            writeln!(writer).context("Failed to write schema document")?;
        }
        Ok(())
    }
}
