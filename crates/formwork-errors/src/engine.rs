//! The error adoption engine.

use ahash::HashSet;
use tracing::{debug, trace};

use formwork_field::{ErrorSink, FieldId, FieldTree};

use crate::error::AdoptError;
use crate::options::AdoptOptions;

/// Writes one accepted error into one field's storage.
type Associator<T> =
    Box<dyn FnMut(&mut T, FieldId, <T as FieldTree>::Client) -> Result<(), AdoptError>>;

/// Associates externally sourced errors with the fields they belong to.
///
/// The engine is configured once with a converter, applied to errors that
/// end up stored on the start field unclaimed, and an associator that
/// performs the actual store. Everything else is decided per call by
/// [`AdoptOptions`].
///
/// An [`adopt`](Self::adopt) call is a single synchronous pass; the engine
/// retains no state between calls. Calling `adopt` again from inside an
/// associator is unsupported.
pub struct AdoptionEngine<T: FieldTree> {
    converter: Box<dyn Fn(&T::External) -> T::Client>,
    associator: Associator<T>,
}

impl<T: ErrorSink> AdoptionEngine<T> {
    /// Creates an engine that stores accepted errors through the host's
    /// native error storage.
    pub fn new(converter: impl Fn(&T::External) -> T::Client + 'static) -> Self {
        Self::with_associator(converter, |tree: &mut T, field, error| {
            tree.add_error(field, error).map_err(AdoptError::from)
        })
    }
}

impl<T: FieldTree> AdoptionEngine<T> {
    /// Creates an engine that stores accepted errors through a custom
    /// associator instead of the host's native error storage.
    pub fn with_associator(
        converter: impl Fn(&T::External) -> T::Client + 'static,
        associator: impl FnMut(&mut T, FieldId, T::Client) -> Result<(), AdoptError> + 'static,
    ) -> Self {
        Self {
            converter: Box::new(converter),
            associator: Box::new(associator),
        }
    }

    /// Matches `errors` against the adopters of `at` and, when
    /// `options.recursive` is set, of all its descendants.
    ///
    /// Fields are visited depth-first in pre-order, children in order. At
    /// each field the first adopter in list order that returns `Some`
    /// claims the error for that field; one claim is one associator call.
    /// A claim does not reserve the error: another field visited later may
    /// claim it again and receives its own associator call. Errors no
    /// field claimed are handled by the leftover policy of `options`.
    ///
    /// Returns the distinct input errors that were stored on at least one
    /// field, in input order. An empty `errors` slice returns an empty
    /// list without touching the tree.
    ///
    /// # Errors
    ///
    /// Fails with the first error the associator reports, typically
    /// [`NoErrorStorage`](formwork_field::NoErrorStorage). Errors already
    /// stored by the same call stay in place.
    pub fn adopt<'e>(
        &mut self,
        tree: &mut T,
        errors: &'e [T::External],
        at: FieldId,
        options: AdoptOptions<T::External, T::Client>,
    ) -> Result<Vec<&'e T::External>, AdoptError> {
        if errors.is_empty() {
            return Ok(Vec::new());
        }

        let mut claimed = HashSet::default();
        self.adopt_at(tree, at, errors, options.recursive, &mut claimed)?;

        if claimed.len() != errors.len() {
            self.adopt_leftovers(tree, at, errors, &options, &mut claimed)?;
        }

        Ok(errors
            .iter()
            .enumerate()
            .filter(|(index, _)| claimed.contains(index))
            .map(|(_, error)| error)
            .collect())
    }

    /// One step of the depth-first walk.
    ///
    /// `claimed` holds input positions of errors some field already
    /// claimed; it is shared across the whole walk and decides the
    /// leftover set afterwards.
    fn adopt_at(
        &mut self,
        tree: &mut T,
        field: FieldId,
        errors: &[T::External],
        recursive: bool,
        claimed: &mut HashSet<usize>,
    ) -> Result<(), AdoptError> {
        let mut accepted = Vec::new();
        let adopters = tree.adopters(field);
        if !adopters.is_empty() {
            for (index, error) in errors.iter().enumerate() {
                // First adopter in list order wins; the rest are not
                // consulted for this error.
                if let Some(client) = adopters.iter().find_map(|adopter| adopter(error)) {
                    trace!(field = field.0, index, "adopter claimed error");
                    accepted.push((index, client));
                }
            }
        }

        if !accepted.is_empty() {
            debug!(
                field = field.0,
                count = accepted.len(),
                "field adopted external errors"
            );
        }
        for (index, client) in accepted {
            (self.associator)(tree, field, client)?;
            claimed.insert(index);
        }

        if recursive && let Some(children) = tree.children(field) {
            let children = children.to_vec();
            for child in children {
                self.adopt_at(tree, child, errors, true, claimed)?;
            }
        }

        Ok(())
    }

    /// Applies the leftover policy to errors no field claimed.
    fn adopt_leftovers(
        &mut self,
        tree: &mut T,
        at: FieldId,
        errors: &[T::External],
        options: &AdoptOptions<T::External, T::Client>,
        claimed: &mut HashSet<usize>,
    ) -> Result<(), AdoptError> {
        if options.fallback_adopter.is_none() && options.ignore_unadopted {
            debug!(
                dropped = errors.len() - claimed.len(),
                "dropped unadopted errors"
            );
            return Ok(());
        }

        for (index, error) in errors.iter().enumerate() {
            if claimed.contains(&index) {
                continue;
            }
            let client = match &options.fallback_adopter {
                Some(fallback) => match fallback(error) {
                    Some(client) => client,
                    None => continue,
                },
                None => (self.converter)(error),
            };
            (self.associator)(tree, at, client)?;
            claimed.insert(index);
        }

        Ok(())
    }
}

impl<T> Default for AdoptionEngine<T>
where
    T: ErrorSink,
    T::External: Clone + Into<T::Client>,
{
    fn default() -> Self {
        Self::new(|error: &T::External| error.clone().into())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use formwork_field::ErrorAdopter;

    use super::*;

    /// A single field with no children and no native storage; associations
    /// are recorded by the test associator instead.
    struct OneField {
        adopters: Vec<ErrorAdopter<&'static str, &'static str>>,
    }

    impl FieldTree for OneField {
        type External = &'static str;
        type Client = &'static str;

        fn adopters(&self, _field: FieldId) -> &[ErrorAdopter<&'static str, &'static str>] {
            &self.adopters
        }

        fn children(&self, _field: FieldId) -> Option<&[FieldId]> {
            None
        }
    }

    fn recording_engine() -> (AdoptionEngine<OneField>, Rc<RefCell<Vec<&'static str>>>) {
        let stored = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&stored);
        let engine = AdoptionEngine::with_associator(
            |error: &&'static str| *error,
            move |_tree, _field, error| {
                sink.borrow_mut().push(error);
                Ok(())
            },
        );
        (engine, stored)
    }

    #[test]
    fn first_adopter_in_list_order_wins() {
        let mut tree = OneField {
            adopters: vec![
                Box::new(|error| Some(*error)),
                Box::new(|_| Some("second")),
            ],
        };
        let (mut engine, stored) = recording_engine();

        let adopted = engine
            .adopt(&mut tree, &["boom"], FieldId(0), AdoptOptions::default())
            .unwrap();

        assert_eq!(*stored.borrow(), ["boom"]);
        assert_eq!(adopted, [&"boom"]);
    }

    #[test]
    fn adopted_errors_keep_input_order() {
        // "bbb" is claimed by the adopter, "aaa" only by the leftover
        // policy, so it is stored later but still listed first.
        let mut tree = OneField {
            adopters: vec![Box::new(|error| (*error == "bbb").then_some("bbb"))],
        };
        let (mut engine, stored) = recording_engine();

        let errors = ["aaa", "bbb"];
        let adopted = engine
            .adopt(&mut tree, &errors, FieldId(0), AdoptOptions::default())
            .unwrap();

        assert_eq!(*stored.borrow(), ["bbb", "aaa"]);
        assert_eq!(adopted, [&"aaa", &"bbb"]);
    }

    #[test]
    fn empty_input_calls_nothing() {
        let mut tree = OneField {
            adopters: vec![Box::new(|error| Some(*error))],
        };
        let (mut engine, stored) = recording_engine();

        let adopted = engine
            .adopt(&mut tree, &[], FieldId(0), AdoptOptions::default())
            .unwrap();

        assert!(adopted.is_empty());
        assert!(stored.borrow().is_empty());
    }
}
