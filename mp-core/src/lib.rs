#![deny(
    clippy::nursery,
    clippy::pedantic,
    missing_docs,
    clippy::missing_docs_in_private_items,
)]
//! Shared plumbing for the mesh topology generator: error helpers, logging setup, well-known
//! label and annotation keys, and the typed [`Manifest`](k8s::Manifest) that the encoder
//! serializes.

pub mod constants;
pub mod errors;
pub mod k8s;
pub mod logging;

pub mod prelude {
    //! Commonly used imports.
    pub use k8s_openapi::api::apps::v1 as appsv1;
    pub use k8s_openapi::api::core::v1 as corev1;
    pub use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;

    pub use crate::constants::*;
    pub use crate::err_impl;
    pub use crate::errors::*;
    pub use crate::k8s::Manifest;
}
