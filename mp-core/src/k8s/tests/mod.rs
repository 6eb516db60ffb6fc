#![allow(clippy::missing_docs_in_private_items)]
mod manifest_test;

use rstest::*;

use crate::prelude::*;

#[fixture]
fn server_timestamp() -> metav1::Time {
    metav1::Time(k8s_openapi::chrono::Utc::now())
}
