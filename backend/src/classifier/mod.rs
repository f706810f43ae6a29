//! Opaque multiclass classifier shared by both prediction targets.
//!
//! A compact gradient-boosted tree learner: deterministic fitting (no RNG),
//! flat index-linked node storage, and serde-serializable models so trained
//! classifiers round-trip through the artifact store unchanged. Callers see
//! only the fit / predict_proba capability; boosting internals are not part
//! of any contract.

mod boost;
mod tree;

pub use boost::{ClassifierError, GbdtClassifier, TrainParams};
pub use tree::{Node, Tree};
