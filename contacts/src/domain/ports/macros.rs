//! Macro for port error enums whose variants all carry a detail message.
//!
//! A variant is declared as `Name("display prefix") => ErrorCode`. The
//! expansion adds the `message` field, a `"{prefix}: {message}"` display, a
//! snake-case constructor taking `impl Into<String>`, and `error_code` so
//! the repository can report the failure without matching on variants.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident($prefix:literal) => $code:ident
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error("{}: {}", $prefix, .message)]
                $variant {
                    /// Detail supplied by the adapter.
                    message: String,
                },
            )+
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = concat!("Build [`", stringify!($name), "::", stringify!($variant), "`].")]
                    #[allow(dead_code, reason = "constructors are generated for every variant")]
                    pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                        Self::$variant {
                            message: message.into(),
                        }
                    }
                }
            )+

            /// Detail supplied by the adapter that raised the error.
            pub fn message(&self) -> &str {
                match self {
                    $( Self::$variant { message } )|+ => message,
                }
            }

            /// Category used when the failure is reported to callers.
            pub fn error_code(&self) -> $crate::domain::ErrorCode {
                match self {
                    $( Self::$variant { .. } => $crate::domain::ErrorCode::$code, )+
                }
            }
        }
    };
}

pub(crate) use define_port_error;
