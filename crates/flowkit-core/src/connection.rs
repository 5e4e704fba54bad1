use crate::ElementId;
use crate::node::Edge;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Decides whether a dragged connection may become an edge.
pub type ValidConnectionFunc = Arc<dyn Fn(&Connection) -> bool + Send + Sync>;

/// A prospective edge produced by dragging from one handle to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Connection {
    pub source: ElementId,
    pub target: ElementId,
    #[serde(default)]
    pub source_handle: Option<ElementId>,
    #[serde(default)]
    pub target_handle: Option<ElementId>,
}

impl Connection {
    pub fn new(source: impl Into<ElementId>, target: impl Into<ElementId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    /// Every connection is accepted when no validator is installed.
    pub fn is_valid(&self, validator: Option<&ValidConnectionFunc>) -> bool {
        validator.is_none_or(|f| f(self))
    }

    /// Edge for this connection, id'd `flowkit__edge-{source}{sourceHandle}-{target}{targetHandle}`.
    pub fn to_edge(&self) -> Edge {
        fn handle(h: &Option<ElementId>) -> &str {
            h.as_ref().map(|h| h.0.as_str()).unwrap_or("")
        }
        let id = format!(
            "flowkit__edge-{}{}-{}{}",
            self.source,
            handle(&self.source_handle),
            self.target,
            handle(&self.target_handle)
        );
        Edge {
            id: ElementId(id),
            source: self.source.clone(),
            target: self.target.clone(),
            source_handle: self.source_handle.clone(),
            target_handle: self.target_handle.clone(),
            ..Default::default()
        }
    }

    /// Validate and convert in one step; `None` when the validator rejects it.
    pub fn accept(&self, validator: Option<&ValidConnectionFunc>) -> Option<Edge> {
        self.is_valid(validator).then(|| self.to_edge())
    }
}

/// Whether connections must go source -> target handle (`strict`) or may join any two handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMode {
    #[default]
    Strict,
    Loose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConnectionLineType {
    #[default]
    #[serde(rename = "default")]
    Bezier,
    #[serde(rename = "straight")]
    Straight,
    #[serde(rename = "step")]
    Step,
    #[serde(rename = "smoothstep")]
    SmoothStep,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_line_type_wire_names() {
        let parsed: ConnectionLineType = serde_json::from_str("\"default\"").unwrap();
        assert_eq!(parsed, ConnectionLineType::Bezier);
        assert_eq!(
            serde_json::to_string(&ConnectionLineType::SmoothStep).unwrap(),
            "\"smoothstep\""
        );
        assert!(serde_json::from_str::<ConnectionLineType>("\"bezier\"").is_err());
    }

    #[test]
    fn test_validator_decides_acceptance() {
        let no_self_loops: ValidConnectionFunc = Arc::new(|c: &Connection| c.source != c.target);
        let loop_back = Connection::new("a", "a");
        let forward = Connection {
            source_handle: Some("out".into()),
            ..Connection::new("a", "b")
        };

        assert!(loop_back.is_valid(None));
        assert!(loop_back.accept(Some(&no_self_loops)).is_none());

        let edge = forward.accept(Some(&no_self_loops)).unwrap();
        assert_eq!(edge.id.0, "flowkit__edge-aout-b");
        assert_eq!(edge.source_handle, Some("out".into()));
        assert_eq!(edge.target.0, "b");
    }

    #[test]
    fn test_connection_optional_handles() {
        let conn: Connection = serde_json::from_str(r#"{"source":"a","target":"b"}"#).unwrap();
        assert_eq!(conn.source.0, "a");
        assert!(conn.source_handle.is_none());
    }
}
