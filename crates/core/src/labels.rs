//! Fixed string vocabularies stored as `TEXT` columns and sent as-is on the wire.

/// Define an enum whose variants map one-to-one onto stable string labels.
///
/// The generated type serializes to its label, parses back from it through
/// `FromStr` / `TryFrom<String>`, and exposes the full label list for
/// `CHECK` constraints and error messages.
macro_rules! define_label_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Every label, in declaration order.
            pub const LABELS: &'static [&'static str] = &[$($label),+];

            /// The stable label stored in the database and sent on the wire.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::CoreError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $( $label => Ok($name::$variant), )+
                    other => Err($crate::error::CoreError::Validation(format!(
                        "Invalid {} '{other}'. Must be one of: {}",
                        $kind,
                        Self::LABELS.join(", ")
                    ))),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::error::CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}
