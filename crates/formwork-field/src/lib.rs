//! Contracts between a host field tree and the error adoption engine.
//!
//! A field tree is the hierarchical data-entry structure owned by the host
//! application. The engine in `formwork-errors` never creates or rewires
//! fields; it reads a field's adopters and children through [`FieldTree`]
//! and stores accepted errors through [`ErrorSink`].

use thiserror::Error;

/// Identifier of a field in a host field tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(pub usize);

/// A per-field matcher that decides whether an external error belongs to
/// the field.
///
/// Returning `Some` claims the error and yields the client error to store;
/// returning `None` declines it. Each field carries an ordered list of
/// these, replaceable by the owner of the tree at any time.
pub type ErrorAdopter<E, C> = Box<dyn Fn(&E) -> Option<C>>;

/// Read access the adoption engine needs from a host field tree.
pub trait FieldTree {
    /// Error received from an external source, e.g. a remote validation
    /// response. Opaque to the engine, which compares these by position
    /// in the batch rather than by value.
    type External;

    /// Error representation the tree stores on its fields.
    type Client;

    /// The ordered adopters attached to a field, empty when none were set.
    ///
    /// A field's adopter list is independent of its children's lists.
    fn adopters(&self, field: FieldId) -> &[ErrorAdopter<Self::External, Self::Client>];

    /// Child fields in order, or `None` for a leaf field.
    fn children(&self, field: FieldId) -> Option<&[FieldId]>;
}

/// Native error storage of a host field tree.
///
/// Implementing this trait declares the storage capability at composition
/// time. Hosts that equip only some of their fields with storage return
/// [`NoErrorStorage`] for the rest.
pub trait ErrorSink: FieldTree {
    /// Stores an error on a field.
    ///
    /// The host is expected to notify the field's subscribers of the
    /// change.
    fn add_error(&mut self, field: FieldId, error: Self::Client) -> Result<(), NoErrorStorage>;
}

/// A field was asked to store an error but was never equipped with error
/// storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("field {field:?} has no error storage")]
pub struct NoErrorStorage {
    pub field: FieldId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_error_storage_names_the_field() {
        let error = NoErrorStorage { field: FieldId(3) };
        assert_eq!(error.to_string(), "field FieldId(3) has no error storage");
    }
}
