use a2ui_client::{MessageDecoder, MessageProcessor, ProcessReport, Snapshot};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("failed to read {source_name}: {source}")]
    Read {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("surface '{0}' does not exist after replay")]
    UnknownSurface(String),

    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Applies a whole message log.
///
/// A log starting with `[` is one JSON array; anything else is read as
/// newline-delimited JSON.
pub fn replay(processor: &mut MessageProcessor, input: &str) -> ProcessReport {
    if input.trim_start().starts_with('[') {
        return processor.process_json(input);
    }
    let mut decoder = MessageDecoder::new();
    let mut results = decoder.push(input);
    results.extend(decoder.finish());
    processor.process_results(results)
}

/// Renders the snapshot as a JSON object keyed by surface id.
///
/// Each surface maps to its resolved render tree (`null` while not
/// rendering), or to its raw state when `raw` is set.
pub fn render(
    snapshot: &Snapshot,
    surface_filter: Option<&str>,
    raw: bool,
) -> Result<Value, ReplayError> {
    if let Some(id) = surface_filter {
        if snapshot.get(id).is_none() {
            return Err(ReplayError::UnknownSurface(id.to_string()));
        }
    }

    let mut output = Map::new();
    for surface in snapshot.iter() {
        if surface_filter.is_some_and(|id| surface.id() != id) {
            continue;
        }
        let value = if raw {
            serde_json::to_value(surface)?
        } else {
            serde_json::to_value(surface.resolve_tree())?
        };
        output.insert(surface.id().to_string(), value);
    }
    Ok(Value::Object(output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    const LOG: &str = r#"
{"surfaceUpdate": {"surfaceId": "main", "components": [{"id": "root", "component": {"Text": {"text": {"literalString": "Hi"}, "usageHint": "h1"}}}]}}
{"beginRendering": {"surfaceId": "main", "root": "root"}}
{"surfaceUpdate": {"surfaceId": "side", "components": []}}
"#;

    #[test]
    fn test_replay_ndjson_and_render_trees() {
        let mut processor = MessageProcessor::new();
        let report = replay(&mut processor, LOG);
        assert_eq!(report.applied, 3);

        let output = render(&processor.refresh(), None, false).unwrap();
        assert_eq!(
            output,
            json!({
                "main": {"id": "root", "type": "Text", "text": "Hi", "usageHint": "h1"},
                "side": null
            })
        );
    }

    #[test]
    fn test_replay_array_with_filter() {
        let mut processor = MessageProcessor::new();
        replay(
            &mut processor,
            r#"[{"surfaceUpdate": {"surfaceId": "a", "components": []}},
                {"surfaceUpdate": {"surfaceId": "b", "components": []}}]"#,
        );
        let output = render(&processor.refresh(), Some("b"), true).unwrap();
        let object = output.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object["b"]["isRendering"], json!(false));

        assert_matches!(
            render(&processor.refresh(), Some("zzz"), false),
            Err(ReplayError::UnknownSurface(id)) if id == "zzz"
        );
    }
}
