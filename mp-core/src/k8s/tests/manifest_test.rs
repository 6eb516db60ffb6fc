use std::collections::BTreeMap;

use assertables::*;
use kube::api::DynamicObject;
use serde_json::json;

use super::*;
use crate::k8s::{
    app_labels,
    build_object_meta,
};

fn parse(doc: &str) -> serde_yaml::Value {
    serde_yaml::from_str(doc).unwrap()
}

#[fixture]
fn test_deployment(server_timestamp: metav1::Time) -> appsv1::Deployment {
    let mut meta = build_object_meta("foo", "srv-000");
    meta.creation_timestamp = Some(server_timestamp.clone());
    appsv1::Deployment {
        metadata: meta,
        spec: Some(appsv1::DeploymentSpec {
            replicas: Some(2),
            selector: metav1::LabelSelector {
                match_labels: Some(app_labels("srv-000")),
                ..Default::default()
            },
            template: corev1::PodTemplateSpec {
                metadata: Some(metav1::ObjectMeta {
                    labels: Some(app_labels("srv-000")),
                    creation_timestamp: Some(server_timestamp),
                    ..Default::default()
                }),
                spec: None,
            },
            ..Default::default()
        }),
        status: Some(appsv1::DeploymentStatus { replicas: Some(2), ..Default::default() }),
    }
}

#[rstest]
fn test_strip_deployment(test_deployment: appsv1::Deployment) {
    let doc = Manifest::from(test_deployment).into_clean_yaml().unwrap();
    let tree = parse(&doc);

    assert_none!(tree.get("status"));
    assert_none!(tree["metadata"].get("creationTimestamp"));
    assert_none!(tree["spec"]["template"]["metadata"].get("creationTimestamp"));
    assert_eq!(tree["kind"], "Deployment");
    assert_eq!(tree["apiVersion"], "apps/v1");
    assert_eq!(tree["spec"]["template"]["metadata"]["labels"]["app"], "srv-000");
}

#[rstest]
fn test_strip_namespace(server_timestamp: metav1::Time) {
    let mut ns = corev1::Namespace {
        metadata: metav1::ObjectMeta {
            name: Some("foo".into()),
            labels: Some(BTreeMap::from([(SIDECAR_INJECTION_LABEL_KEY.into(), "enabled".into())])),
            creation_timestamp: Some(server_timestamp),
            ..Default::default()
        },
        ..Default::default()
    };
    ns.status = Some(corev1::NamespaceStatus { phase: Some("Active".into()), ..Default::default() });

    let tree = parse(&Manifest::from(ns).into_clean_yaml().unwrap());
    assert_none!(tree.get("status"));
    assert_none!(tree["metadata"].get("creationTimestamp"));
    assert_eq!(tree["metadata"]["labels"][SIDECAR_INJECTION_LABEL_KEY], "enabled");
}

#[rstest]
fn test_strip_dynamic_object() {
    let obj: DynamicObject = serde_json::from_value(json!({
        "apiVersion": "example.io/v1",
        "kind": "Widget",
        "metadata": {"name": "w", "namespace": "foo", "creationTimestamp": "2024-01-01T00:00:00Z"},
        "spec": {"template": {"metadata": {"creationTimestamp": null, "labels": {"app": "w"}}}},
        "status": {"ready": true},
    }))
    .unwrap();
    let manifest = Manifest::from(obj);
    assert_eq!(manifest.kind(), "Widget");
    assert_eq!(manifest.name(), Some("w"));

    let tree = parse(&manifest.into_clean_yaml().unwrap());
    assert_none!(tree.get("status"));
    assert_none!(tree["metadata"].get("creationTimestamp"));
    assert_none!(tree["spec"]["template"]["metadata"].get("creationTimestamp"));
    assert_eq!(tree["spec"]["template"]["metadata"]["labels"]["app"], "w");
}

#[rstest]
fn test_clean_yaml_is_stable(test_deployment: appsv1::Deployment) {
    let manifest = Manifest::from(test_deployment);
    assert_eq!(manifest.to_clean_yaml().unwrap(), manifest.to_clean_yaml().unwrap());
}

#[rstest]
fn test_config_map_passes_through() {
    let cm = corev1::ConfigMap {
        metadata: build_object_meta("foo", "shared"),
        data: Some(BTreeMap::from([("key".into(), "value".into())])),
        ..Default::default()
    };
    let manifest = Manifest::from(cm);
    assert_eq!(manifest.kind(), "ConfigMap");

    let tree = parse(&manifest.into_clean_yaml().unwrap());
    assert_eq!(tree["data"]["key"], "value");
    assert_eq!(tree["metadata"]["namespace"], "foo");
}
