//! The assessment node — a single-writer shell around the core.
//!
//! The execution model of the core is a single global sequential ledger:
//! every state transition is applied one at a time, fully ordered. This
//! crate reproduces that contract in an async environment by funnelling all
//! commands through one mpsc channel into one task that owns the
//! [`AssessmentService`](assay_assessment::AssessmentService). Concurrent
//! callers contend only on submission order.

pub mod actor;
pub mod logging;

pub use actor::{AssessmentNode, NodeError, NodeHandle};
pub use logging::{init_logging, LogFormat};
