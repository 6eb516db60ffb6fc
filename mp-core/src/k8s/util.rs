//! Small builders for object metadata.
use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;

use crate::constants::APP_LABEL_KEY;

/// Build metadata for a namespaced object.
pub fn build_object_meta(namespace: &str, name: &str) -> metav1::ObjectMeta {
    metav1::ObjectMeta {
        namespace: Some(namespace.into()),
        name: Some(name.into()),
        ..Default::default()
    }
}

/// The selector labels shared by a workload, its pods, and its network-facing service.
pub fn app_labels(name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(APP_LABEL_KEY.into(), name.into())])
}
