//! Filter engine: named predicates that reduce a job's entries to the
//! visible set.
//!
//! Each tool registers its own predicates (see [`crate::Record::predicates`]).
//! A [`FilterState`] assigns values to predicates by name; predicates
//! without a value, or with a value that switches them off, admit every
//! entry. Active predicates combine by logical AND, so evaluation order
//! never changes the result.
//!
//! # Example
//!
//! ```
//! use docket::entry::{EntityType, Party};
//! use docket::filter::{names, FilterEngine, FilterState};
//!
//! let entries = vec![
//!     Party::new("1", "Jane Doe").with_entity_type(EntityType::Individual),
//!     Party::new("2", "Doe Family Trust")
//!         .with_entity_type(EntityType::Trust)
//!         .flagged("Illegible address"),
//! ];
//!
//! let engine = FilterEngine::<Party>::new();
//! let filters = FilterState::new().with_flag(names::HIDE_FLAGGED, true);
//! let visible = engine.visible(&entries, &filters);
//!
//! assert_eq!(visible.len(), 1);
//! assert_eq!(visible[0].entry_number, "1");
//! ```

mod engine;
mod predicate;
mod state;

pub use engine::{FilterEngine, VisibleCache};
pub use predicate::{Predicate, PredicateKind};
pub use state::{FilterState, FilterValue};

/// Predicate names shared by the built-in tools.
pub mod names {
    /// Hide entries extraction flagged for review.
    pub const HIDE_FLAGGED: &str = "hideFlagged";
    /// Keep only individuals.
    pub const INDIVIDUALS_ONLY: &str = "individualsOnly";
    /// Keep only the selected entity types.
    pub const ENTITY_TYPES: &str = "entityTypes";
    /// Hide owners whose key marks the address as unknown.
    pub const HIDE_UNKNOWN_ADDRESS: &str = "hideUnknownAddress";
    /// Keep only owners under one legal description.
    pub const SELECTED_SECTION: &str = "selectedSection";
    /// Keep only the selected products.
    pub const PRODUCTS: &str = "products";
    /// Keep only lines for one property.
    pub const SELECTED_PROPERTY: &str = "selectedProperty";
}
