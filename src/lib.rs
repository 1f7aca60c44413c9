//! Radial layout engine for live agent session graphs.
//!
//! Sessions (some spawned by others) and their timestamped events are placed
//! around a fixed origin: root sessions on a ring, spawned sessions fanned out
//! next to their parent, each session's events radiating outward behind it.
//!
//! [`layout::layout_sessions`] is the pure entry point; [`layout_json`] and the
//! wasm bindings wrap it for a JSON-speaking frontend.

pub mod error;
pub mod layout;
pub mod model;
pub mod output;
mod wasm;

pub use error::{LayoutError, Result};
pub use layout::{layout_sessions, LayoutConfig, LayoutResult};
pub use model::{EventItem, EventKind, LayoutInput, LayoutRequest, Session, SessionKind};
pub use output::LayoutOutput;

/// Parse a [`LayoutRequest`], run the layout and serialize the [`LayoutOutput`].
pub fn layout_json(input: &str) -> Result<String> {
    let request: LayoutRequest = serde_json::from_str(input).map_err(LayoutError::InvalidInput)?;
    request.config.validate()?;
    let result = layout_sessions(&request.input, &request.config);
    serde_json::to_string(&LayoutOutput::from(&result)).map_err(LayoutError::Serialize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_layout_json_round_trip_shape() {
        let input = r#"{
            "sessions": [
                {"key": "main", "lastActivityAt": "2024-01-01T00:00:10Z"},
                {"key": "sub", "spawnedBy": "main", "kind": "scheduled"}
            ],
            "items": [
                {"id": "a1", "sessionKey": "main", "kind": "action", "timestamp": "2024-01-01T00:00:01Z"},
                {"id": "e1", "sessionKey": "sub", "kind": "exec", "timestamp": "2024-01-01T00:00:02Z"},
                {"id": "lost", "sessionKey": "nowhere", "kind": "action", "timestamp": "2024-01-01T00:00:03Z"}
            ]
        }"#;
        let out: Value = serde_json::from_str(&layout_json(input).unwrap()).unwrap();

        let nodes = out["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 6);
        assert_eq!(nodes[0]["id"], "origin");
        assert_eq!(nodes[0]["type"], "origin");

        let main = nodes.iter().find(|n| n["id"] == "session:main").unwrap();
        assert_eq!(main["type"], "session");
        assert_eq!(main["depth"], 0);
        assert_eq!(main["width"], 280.0);
        assert!(main["position"]["y"].as_f64().unwrap() < 0.0);

        let sub = nodes.iter().find(|n| n["id"] == "session:sub").unwrap();
        assert_eq!(sub["parent"], "main");
        assert_eq!(sub["kind"], "scheduled");

        let lost = nodes.iter().find(|n| n["id"] == "item:lost").unwrap();
        assert_eq!(lost["orphan"], true);

        assert!(out.get("error").is_none());
        assert!(out["bounds"]["w"].as_f64().unwrap() > 0.0);
        assert_eq!(out["edges"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_layout_json_applies_partial_config() {
        let input = r#"{"sessions": [{"key": "a"}], "config": {"baseRadius": 250}}"#;
        let out: Value = serde_json::from_str(&layout_json(input).unwrap()).unwrap();
        let a = out["nodes"].as_array().unwrap().iter().find(|n| n["id"] == "session:a").unwrap().clone();
        let y = a["position"]["y"].as_f64().unwrap();
        assert!((y + 250.0).abs() < 1e-6);
    }

    #[test]
    fn test_layout_json_rejects_malformed_input() {
        assert!(matches!(layout_json("{not json"), Err(LayoutError::InvalidInput(_))));
        assert!(matches!(
            layout_json(r#"{"items": [{"kind": "action"}]}"#),
            Err(LayoutError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_layout_json_rejects_invalid_config() {
        let err = layout_json(r#"{"config": {"offsetStep": -1}}"#).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidConfig { field: "offsetStep", .. }));
        assert!(err.to_string().contains("offsetStep"));
    }

    #[test]
    fn test_layout_json_rejects_unbounded_retry_budget() {
        let input = r#"{
            "sessions": [{"key": "a"}, {"key": "b"}],
            "config": {"baseRadius": 0, "radiusStep": 1e-9, "maxRadiusAdjustment": 1e9}
        }"#;
        let err = layout_json(input).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidConfig { field: "maxRadiusAdjustment", .. }));
    }

    #[test]
    fn test_error_output_shape() {
        let err = layout_json("[]").unwrap_err();
        let out: Value = serde_json::to_value(LayoutOutput::from_error(&err)).unwrap();
        assert_eq!(out["error"]["kind"], "input");
        assert!(out.get("nodes").is_none());
    }
}
