//! Kubernetes object helpers.
mod manifest;
mod util;

pub use manifest::Manifest;
pub use util::{
    app_labels,
    build_object_meta,
};

#[cfg(test)]
mod tests;
