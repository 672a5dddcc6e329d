#[cfg(test)]
mod tests {
    use a2ui_core::error::DecodeError;
    use a2ui_core::types::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn test_message_stream_decodes_in_order() {
        let values = json!([
            {"surfaceUpdate": {"surfaceId": "main", "components": [
                {"id": "root", "component": {"Column": {"children": ["title", "divider", "approve"]}}},
                {"id": "title", "component": {"Text": {"text": {"path": "/request/title"}, "usageHint": "h3"}}},
                {"id": "divider", "component": {"Divider": {"axis": "horizontal"}}},
                {"id": "approve", "component": {"Button": {
                    "child": "approve-text",
                    "primary": true,
                    "action": {"name": "approve", "context": {"requestId": {"path": "/request/id"}}}
                }}},
                {"id": "approve-text", "component": {"Text": {"text": {"literalString": "Approve"}}}}
            ]}},
            {"dataModelUpdate": {"surfaceId": "main", "contents": [
                {"key": "request", "valueMap": [
                    {"key": "id", "valueString": "REQ-42"},
                    {"key": "title", "valueString": "Expense report"},
                    {"key": "amount", "valueInt": 1200}
                ]}
            ]}},
            {"beginRendering": {"surfaceId": "main", "root": "root"}}
        ]);

        let messages: Vec<Message> = values
            .as_array()
            .unwrap()
            .iter()
            .cloned()
            .map(Message::from_value)
            .collect::<Result<_, _>>()
            .unwrap();

        let kinds: Vec<MessageKind> = messages.iter().map(Message::kind).collect();
        assert_eq!(
            kinds,
            vec![
                MessageKind::SurfaceUpdate,
                MessageKind::DataModelUpdate,
                MessageKind::BeginRendering
            ]
        );
        assert!(messages.iter().all(|m| m.surface_id() == "main"));

        let Message::SurfaceUpdate(update) = &messages[0] else {
            panic!("expected surfaceUpdate");
        };
        let approve = &update.components[3].component;
        let action = approve.action().unwrap();
        assert_eq!(action.context.entries()[0].key, "requestId");
        assert_eq!(
            action.context.entries()[0].value.data_path().map(DataPath::as_str),
            Some("/request/id")
        );
    }

    #[test]
    fn test_message_serialization_is_stable() {
        let message = Message::data_model_update(
            "main",
            [ScopeUpdate::new("form")
                .with_value("name", "John Doe")
                .with_value("age", 25)
                .with_value("newsletter", false)],
        );

        let json = serde_json::to_string(&message).unwrap();
        let deserialized = Message::from_json(&json).unwrap();
        assert_eq!(message, deserialized);
    }

    #[test]
    fn test_component_with_bad_bound_value_fails_whole_message() {
        let err = Message::from_value(json!({
            "surfaceUpdate": {"surfaceId": "main", "components": [
                {"id": "ok", "component": {"Divider": {}}},
                {"id": "bad", "component": {"Text": {"text": {}}}}
            ]}
        }))
        .unwrap_err();
        assert_matches!(err, DecodeError::Json(_));
        assert!(err.to_string().contains("neither a literal nor a path"));
    }

    #[test]
    fn test_literal_number_must_be_integer() {
        let result = serde_json::from_value::<BoundValue>(json!({"literalNumber": 1.5}));
        assert!(result.is_err());

        let value: BoundValue = serde_json::from_value(json!({"literalNumber": 7})).unwrap();
        assert_eq!(value.literal_value(), Some(&Scalar::Int(7)));
    }

    #[test]
    fn test_client_message_round_trip() {
        let message = ClientMessage::from(
            UserAction::new("approve", "main", "approve")
                .with_context("requestId", Some(Scalar::from("REQ-42"))),
        );
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["userAction"]["context"][0]["value"], "REQ-42");
        let back: ClientMessage = serde_json::from_value(json).unwrap();
        assert_eq!(back, message);
    }
}
