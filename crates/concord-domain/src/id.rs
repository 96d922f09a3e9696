//! UUIDv7-backed identifier newtypes

/// Define a `Copy` identifier wrapping a UUIDv7 `u128`
///
/// `$label` names the identifier in parse errors ("Invalid {label} id").
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u128);

        impl $name {
            /// Generate a new UUIDv7-based identifier
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7().as_u128())
            }

            /// Wrap a raw value read back from storage
            pub fn from_value(value: u128) -> Self {
                Self(value)
            }

            /// Parse an identifier from its hyphenated UUID form
            pub fn from_string(s: &str) -> Result<Self, String> {
                uuid::Uuid::parse_str(s)
                    .map(|u| Self(u.as_u128()))
                    .map_err(|e| format!(concat!("Invalid ", $label, " id: {}"), e))
            }

            /// Raw value, as persisted
            pub fn value(&self) -> u128 {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", uuid::Uuid::from_u128(self.0))
            }
        }
    };
}

pub(crate) use uuid_id;
