//! Error helpers shared across the workspace.
//!
//! Most code propagates [`anyhow::Error`]; typed errors that callers may want to match on are
//! declared with [`err_impl!`](crate::err_impl), which builds a [`thiserror`] enum together
//! with snake-case constructors that return `anyhow::Error` directly.

pub use anyhow::{
    anyhow,
    bail,
    ensure,
};
#[doc(hidden)]
pub use paste::paste;
pub use thiserror::Error;

/// Result type for operations that return nothing on success.
pub type EmptyResult = anyhow::Result<()>;

/// Declare an error enum and a constructor for each variant.
///
/// ```ignore
/// err_impl! {GraphError,
///     #[error("edge weight must be a percentage, got {0}")]
///     InvalidEdgeWeight(u32),
/// }
///
/// return Err(GraphError::invalid_edge_weight(150u32));
/// ```
#[macro_export]
macro_rules! err_impl {
    ($errtype:ident,
        $(#[$errinfo:meta] $item:ident($dtype:ty),)+
    ) => {
        #[allow(missing_docs, clippy::missing_docs_in_private_items)]
        #[derive(Debug, $crate::errors::Error)]
        pub enum $errtype {
            $(#[$errinfo] $item($dtype)),+
        }

        impl $errtype {
            $crate::errors::paste! {
                $(
                    #[allow(missing_docs, clippy::missing_docs_in_private_items, dead_code)]
                    pub fn [<$item:snake>](in_: impl Into<$dtype>) -> anyhow::Error {
                        $crate::errors::anyhow!(Self::$item(in_.into()))
                    }
                )+
            }
        }
    };
}
