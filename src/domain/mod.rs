//! Domain layer: the belief tree and its algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).
//! Every operation is a pure function from one tree snapshot to the next.

pub mod document;
pub mod error;
pub mod mode;
pub mod mutation;
pub mod node;
pub mod normalize;

pub use document::{round_probability, Document, Imported};
pub use error::DomainError;
pub use mode::switch_mode;
pub use mutation::{add_child, find, remove_node, rename, reweight, set_locked, sort, toggle, update};
pub use node::{Mode, Node, CERTAINTY, ROOT_ID};
pub use normalize::{is_normalized, normalize, violations, Violation, SUM_TOLERANCE};
