//! Adoption of externally sourced errors into a field tree.
//!
//! A remote validation response arrives as a flat list of errors that says
//! nothing about which field each error belongs to. [`AdoptionEngine`]
//! walks the tree from a start field, lets every visited field's adopters
//! claim errors, and stores each accepted error through the host's error
//! storage. Errors no field claimed are handled by a per-call leftover
//! policy: stored on the start field, dropped, or routed through a
//! fallback adopter.
//!
//! The tree itself is an external collaborator reached through the
//! contracts in `formwork-field`:
//!
//! ```ignore
//! let mut engine = AdoptionEngine::<MyTree>::default();
//! let adopted = engine.adopt(
//!     &mut tree,
//!     &response.errors,
//!     root,
//!     AdoptOptions::builder().recursive(true).build(),
//! )?;
//! ```

pub mod engine;
pub mod error;
pub mod options;

pub use engine::AdoptionEngine;
pub use error::AdoptError;
pub use options::AdoptOptions;

// Re-export the host contracts so depending on `formwork-errors` alone is
// enough to implement a host.
pub use formwork_field::{ErrorAdopter, ErrorSink, FieldId, FieldTree, NoErrorStorage};
