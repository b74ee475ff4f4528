//! Event category naming.
//!
//! Every event is filed under a computed title, and one schema accumulates
//! per title. Server-side events whose `context.path` echoes their
//! `event_type` all collapse into a single catch-all group; everything else
//! gets a camel-cased name derived from its type and source.

use serde_json::{Map, Value};

/// Compute the schema-group title for a preprocessed event.
///
/// Returns `None` when `event_source` or `event_type` is absent, which can
/// happen after preprocessing if the field's value was itself an embedded
/// JSON object string and moved under a `_JSON` key.
pub fn resolve_title(event: &Map<String, Value>) -> Option<String> {
    let event_source = event.get("event_source")?;
    let event_type = event.get("event_type")?;

    if event_source.as_str() == Some("server") {
        if let Some(Value::Object(context)) = event.get("context") {
            if context.get("path") == Some(event_type) {
                return Some("ServerEventModel".to_string());
            }
        }
    }

    // `page_close` from `browser` becomes PageCloseBrowserEventModel.
    let raw = format!(
        "{}.{}.event.model",
        field_text(event_type),
        field_text(event_source)
    );
    let title = raw
        .replace('_', ".")
        .split('.')
        .map(capitalize_first)
        .collect();
    Some(title)
}

/// Render a title field: strings verbatim, anything else as compact JSON.
fn field_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Uppercase the first character, leaving the rest of the segment's casing
/// untouched.
fn capitalize_first(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn title_of(event: Value) -> Option<String> {
        match event {
            Value::Object(map) => resolve_title(&map),
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn test_default_rule() {
        let title = title_of(json!({"event_source": "foo", "event_type": "bar"}));
        assert_eq!(title.as_deref(), Some("BarFooEventModel"));
    }

    #[test]
    fn test_underscores_split_segments() {
        let title = title_of(json!({"event_source": "browser", "event_type": "page_close"}));
        assert_eq!(title.as_deref(), Some("PageCloseBrowserEventModel"));
    }

    #[test]
    fn test_segment_tail_casing_is_preserved() {
        let title = title_of(json!({"event_source": "browser", "event_type": "seq_GOTO"}));
        assert_eq!(title.as_deref(), Some("SeqGOTOBrowserEventModel"));
    }

    #[test]
    fn test_server_event_with_matching_path() {
        let title = title_of(json!({
            "event_source": "server",
            "event_type": "bar",
            "context": {"path": "bar"}
        }));
        assert_eq!(title.as_deref(), Some("ServerEventModel"));
    }

    #[test]
    fn test_server_event_with_mismatched_path() {
        let title = title_of(json!({
            "event_source": "server",
            "event_type": "bar",
            "context": {"path": "not_bar"}
        }));
        assert_eq!(title.as_deref(), Some("BarServerEventModel"));
    }

    #[test]
    fn test_server_event_with_non_map_context() {
        let title = title_of(json!({
            "event_source": "server",
            "event_type": "bar",
            "context": "bar"
        }));
        assert_eq!(title.as_deref(), Some("BarServerEventModel"));
    }

    #[test]
    fn test_path_comparison_uses_value_equality() {
        let title = title_of(json!({
            "event_source": "server",
            "event_type": 7,
            "context": {"path": 7}
        }));
        assert_eq!(title.as_deref(), Some("ServerEventModel"));
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(title_of(json!({"event_type": "bar"})), None);
        assert_eq!(title_of(json!({"event_source": "foo"})), None);
    }
}
