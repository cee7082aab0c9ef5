//! Per-call options of the adoption engine.

use core::fmt;

use formwork_field::ErrorAdopter;

/// Options of a single [`adopt`](crate::AdoptionEngine::adopt) call.
///
/// Use the builder pattern to construct:
/// ```ignore
/// let options = AdoptOptions::builder()
///     .recursive(true)
///     .ignore_unadopted(true)
///     .build();
/// ```
///
/// `AdoptOptions::default()` is equivalent to an empty builder: not
/// recursive, leftovers stored on the start field, no fallback adopter.
#[derive(bon::Builder)]
pub struct AdoptOptions<E, C> {
    /// Walk the start field's descendants as well.
    #[builder(default)]
    pub recursive: bool,

    /// Drop errors no field claimed instead of storing them on the start
    /// field. Only consulted when no `fallback_adopter` is given.
    #[builder(default)]
    pub ignore_unadopted: bool,

    /// Adopter consulted once per unclaimed error after the walk; its
    /// `Some` outputs are stored on the start field and its `None`
    /// results are dropped. When given, it governs leftover handling
    /// entirely.
    pub fallback_adopter: Option<ErrorAdopter<E, C>>,
}

impl<E, C> Default for AdoptOptions<E, C> {
    fn default() -> Self {
        Self {
            recursive: false,
            ignore_unadopted: false,
            fallback_adopter: None,
        }
    }
}

impl<E, C> fmt::Debug for AdoptOptions<E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdoptOptions")
            .field("recursive", &self.recursive)
            .field("ignore_unadopted", &self.ignore_unadopted)
            .field(
                "fallback_adopter",
                &self.fallback_adopter.as_ref().map(|_| ".."),
            )
            .finish()
    }
}
