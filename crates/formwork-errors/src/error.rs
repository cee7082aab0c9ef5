//! Error types for the formwork-errors crate

use formwork_field::NoErrorStorage;
use thiserror::Error;

/// Errors that abort an [`adopt`](crate::AdoptionEngine::adopt) call.
///
/// The call fails on the first associator error; associations performed
/// earlier in the same call stay in place. There are no rollback
/// semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AdoptError {
    /// The associator needed native error storage the field does not have.
    #[error(transparent)]
    NoErrorStorage(#[from] NoErrorStorage),
}
