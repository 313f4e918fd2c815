//! Interchange envelope: `{ "isAbsolute": bool, "data": <root node> }`

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::node::{Mode, Node, ROOT_ID};

/// Decimal places kept by [`Document::export`].
pub const EXPORT_DECIMALS: i32 = 3;

/// A whole tree plus the mode its probabilities are expressed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub is_absolute: bool,
    pub data: Node,
}

/// Result of a successful import.
///
/// `mode` is `None` when the document carried no boolean `isAbsolute`; the
/// caller keeps its current mode in that case.
#[derive(Debug, Clone, PartialEq)]
pub struct Imported {
    pub root: Node,
    pub mode: Option<Mode>,
}

impl Document {
    pub fn new(root: Node, mode: Mode) -> Self {
        Self {
            is_absolute: mode.is_absolute(),
            data: root,
        }
    }

    pub fn mode(&self) -> Mode {
        Mode::from_is_absolute(self.is_absolute)
    }

    /// Deep copy of `root` with every probability rounded to [`EXPORT_DECIMALS`].
    pub fn export(root: &Node, mode: Mode) -> Self {
        Self::new(round_probabilities(root), mode)
    }

    pub fn to_json(&self) -> Result<String, DomainError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate and decode an interchange document.
    ///
    /// Rejects anything that is not an object with a `data` node whose id is
    /// `"root"`. Empty `children` lists are turned into leaves.
    pub fn import(json: &str) -> Result<Imported, DomainError> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Object(mut envelope) = value else {
            return Err(DomainError::invalid_document("expected a JSON object"));
        };

        let data = match envelope.remove("data") {
            Some(Value::Null) | None => {
                return Err(DomainError::invalid_document("missing data"));
            }
            Some(data) => data,
        };
        match data.get("id").and_then(Value::as_str) {
            Some(ROOT_ID) => {}
            Some(other) => {
                return Err(DomainError::invalid_document(format!(
                    "data.id must be \"{ROOT_ID}\", got \"{other}\""
                )));
            }
            None => {
                return Err(DomainError::invalid_document(format!(
                    "data.id must be \"{ROOT_ID}\""
                )));
            }
        }

        let root: Node = serde_json::from_value(data)
            .map_err(|e| DomainError::invalid_document(format!("malformed node: {e}")))?;
        let mode = envelope
            .get("isAbsolute")
            .and_then(Value::as_bool)
            .map(Mode::from_is_absolute);
        debug!("imported {} nodes, mode {:?}", root.node_count(), mode);

        Ok(Imported {
            root: root.prune_empty_children(),
            mode,
        })
    }
}

pub fn round_probability(value: f64) -> f64 {
    let factor = 10f64.powi(EXPORT_DECIMALS);
    (value * factor).round() / factor
}

fn round_probabilities(node: &Node) -> Node {
    let mut copy = node.clone();
    copy.probability = round_probability(node.probability);
    copy.children = node
        .children
        .as_ref()
        .map(|children| children.iter().map(round_probabilities).collect());
    copy
}
