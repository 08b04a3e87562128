//! Abstract storage traits for the Assay assessment protocol.
//!
//! Every storage backend (durable or in-memory for testing) implements
//! these traits. The rest of the codebase depends only on the traits.
//!
//! Values are opaque `Vec<u8>` so the store does not depend on the engine
//! crates (which would create circular dependencies). Each engine
//! serializes and deserializes its own record types.

pub mod assessment;
pub mod error;
pub mod stake;

pub use assessment::AssessmentStore;
pub use error::StoreError;
pub use stake::StakeStore;
