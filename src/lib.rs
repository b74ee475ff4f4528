//! # Kiln - Per-category JSON Schema inference for event streams
//!
//! Reads newline-delimited JSON events, groups them by a computed category
//! title, and incrementally infers one structural schema per category: the
//! least-general description consistent with every event observed so far,
//! with required/optional key tracking and type unions for values whose
//! kind varies across events.
//!
//! ## Modules
//!
//! - **schema**: schema nodes, single-value inference, and pairwise merge
//! - **preprocess**: volatile-key stabilization and embedded-JSON expansion
//! - **title**: category name computation
//! - **store**: per-title accumulated schemas in first-occurrence order
//! - **stream**: the line-by-line driver and its error taxonomy
//!
//! ## Quick Start
//!
//! ```rust
//! use kiln::generate_schemas;
//!
//! # fn main() -> anyhow::Result<()> {
//! let input = concat!(
//!     r#"{"event_source": "browser", "event_type": "page_close", "ip": "0.0.0.0"}"#, "\n",
//!     r#"{"event_source": "browser", "event_type": "page_close"}"#, "\n",
//! );
//!
//! let mut output = Vec::new();
//! generate_schemas(input.as_bytes(), &mut output)?;
//!
//! // One document per line: a PageCloseBrowserEventModel schema in which
//! // `ip` has been demoted to optional.
//! assert_eq!(String::from_utf8(output)?.lines().count(), 1);
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use tracing::warn;

pub mod preprocess;
pub mod schema;
pub mod store;
pub mod stream;
pub mod title;

// Re-export commonly used types for convenience
pub use schema::{SchemaDocument, SchemaNode};
pub use store::SchemaStore;
pub use stream::{EventError, StreamProcessor};

/// Main entry point: infer per-title schemas from a JSON-Lines stream.
///
/// Lines that are not valid events are logged and skipped. Documents are
/// emitted only after the input is fully drained, one per title in
/// first-occurrence order.
pub fn generate_schemas<R: BufRead, W: Write>(reader: R, writer: &mut W) -> Result<()> {
    let mut processor = StreamProcessor::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read line")?;
        if let Err(err) = processor.process_line(&line) {
            warn!("Line {}: {}", line_num + 1, err);
        }
    }

    processor.write_schemas(writer)
}
