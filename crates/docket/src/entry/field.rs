//! Enumerated field sets for entry schemas.

use std::fmt::Debug;
use std::hash::Hash;

/// A named field of a tool's entry schema.
///
/// Implemented by the field enums generated with [`schema_fields!`].
pub trait SchemaField: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Every field of the schema.
    const ALL: &'static [Self];

    /// Wire name of the field (matches the entry's serialized key).
    fn name(self) -> &'static str;

    /// Look up a field by wire name.
    fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

/// Generate a field enum and its [`SchemaField`] implementation.
macro_rules! schema_fields {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $crate::entry::SchemaField for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }
    };
}
