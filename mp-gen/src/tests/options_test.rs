use mp_core::k8s::Manifest;
use tracing_test::traced_test;

use super::*;
use crate::encoder::{
    CommonSetupFn,
    ManifestGroup,
    WorkloadGeneratorFn,
};
use crate::formatters::Formatters;
use crate::options::*;
use crate::workload::{
    mesh_label,
    reachable_backends,
};

fn configure(opts: impl IntoIterator<Item = GeneratorOption>) -> GeneratorConfig {
    let mut config = GeneratorConfig::default();
    for opt in opts {
        opt(&mut config);
    }
    config
}

fn render(opts: Vec<GeneratorOption>, graph: &ServiceGraph) -> Vec<serde_yaml::Value> {
    let mut buf = vec![];
    new_generator(opts).unwrap().apply(&mut buf, graph).unwrap();
    documents(&buf)
}

#[rstest]
fn test_defaults() {
    let config = GeneratorConfig::default();
    assert_eq!(config.namespace(), DEFAULT_NAMESPACE);
    assert!(config.create_namespace());
    assert_eq!(config.image(), DEFAULT_IMAGE);
    assert_eq!(config.port(), DEFAULT_PORT);
    assert_eq!(config.formatters().name(1), "srv-001");
    assert_eq!(config.mutator_count(), 0);
    assert_eq!(config.namespace_labels()[mp_core::constants::SIDECAR_INJECTION_LABEL_KEY], "enabled");
}

#[rstest]
fn test_scalar_options_last_write_wins() {
    let config = configure([
        with_namespace("first"),
        with_image("busybox"),
        with_port(81),
        with_namespace("second"),
        with_port(8080),
    ]);
    assert_eq!(config.namespace(), "second");
    assert_eq!(config.image(), "busybox");
    assert_eq!(config.port(), 8080);
}

#[rstest]
fn test_mutators_accumulate() {
    let config = configure([
        with_pod_template_mutators([Some(reachable_backends()), None]),
        with_namespace("foo"),
        with_pod_template_mutators([Some(mesh_label("default")), None, Some(mesh_label("other"))]),
    ]);
    assert_eq!(config.mutator_count(), 3);
}

#[rstest]
fn test_namespace_label_and_formatters() {
    let config = configure([
        with_namespace_label("team", "perf"),
        with_formatters(SimpleFormatters::new("echo")),
    ]);
    assert_eq!(config.namespace_labels().len(), 2);
    assert_eq!(config.namespace_labels()["team"], "perf");
    assert_eq!(config.formatters().url(2, 80), "http://echo-002:80");
}

#[rstest]
#[case::uppercase("Foo")]
#[case::underscore("foo_bar")]
#[case::empty("")]
#[case::leading_dash("-foo")]
#[case::too_long(&"a".repeat(64))]
fn test_invalid_namespace(#[case] namespace: &str) {
    let err = new_generator([with_namespace(namespace)]).err().unwrap();
    assert!(matches!(err.downcast_ref::<ConfigError>(), Some(ConfigError::InvalidNamespace(_))));
}

#[rstest]
fn test_invalid_image_and_port() {
    let err = new_generator([with_image("  ")]).err().unwrap();
    assert!(matches!(err.downcast_ref::<ConfigError>(), Some(ConfigError::EmptyImage(_))));

    let err = new_generator([with_port(0)]).err().unwrap();
    assert!(matches!(err.downcast_ref::<ConfigError>(), Some(ConfigError::InvalidPort(0))));
}

#[rstest]
fn test_namespace_toggle(sample_graph: ServiceGraph) {
    let docs = render(vec![with_namespace("foo"), with_namespace_label("team", "perf")], &sample_graph);
    assert_eq!(docs.len(), 9);
    assert_eq!(docs[0]["kind"], "Namespace");
    assert_eq!(docs[0]["metadata"]["labels"]["team"], "perf");

    let docs = render(vec![with_namespace("foo"), skip_namespace_creation()], &sample_graph);
    assert_eq!(docs.len(), 8);
    assert_eq!(docs[0]["kind"], "Deployment");
}

#[rstest]
fn test_without_common_setup(sample_graph: ServiceGraph) {
    let docs = render(vec![without_common_setup()], &sample_graph);
    assert_eq!(docs.len(), 8);
    assert!(docs.iter().all(|d| d["kind"] != "Namespace"));
}

#[rstest]
fn test_custom_strategies(sample_graph: ServiceGraph) {
    let docs = render(
        vec![
            with_common_setup(CommonSetupFn(|graph: &ServiceGraph| -> anyhow::Result<ManifestGroup> {
                let cm = k8s_openapi::api::core::v1::ConfigMap {
                    metadata: mp_core::k8s::build_object_meta("foo", &format!("shared-{}", graph.len())),
                    ..Default::default()
                };
                Ok(ManifestGroup::from_objects([Manifest::from(cm)]))
            })),
            with_workload_generator(WorkloadGeneratorFn(|svc: &Service| -> anyhow::Result<ManifestGroup> {
                let cm = k8s_openapi::api::core::v1::ConfigMap {
                    metadata: mp_core::k8s::build_object_meta("foo", &format!("cm-{}", svc.idx)),
                    ..Default::default()
                };
                Ok(ManifestGroup::from_objects([Manifest::from(cm)]))
            })),
        ],
        &ServiceGraph { services: sample_graph.services[..2].to_vec() },
    );
    let kinds: Vec<_> = docs.iter().map(|d| d["kind"].as_str().unwrap()).collect();
    assert_eq!(kinds, ["ConfigMap", "ConfigMap", "ConfigMap"]);
    assert_eq!(docs[0]["metadata"]["name"], "shared-2");
    assert_eq!(docs[2]["metadata"]["name"], "cm-1");
}

#[traced_test]
#[test]
fn test_new_generator_logs_configuration() {
    new_generator([with_namespace("foo")]).unwrap();
    assert!(logs_contain("configured manifest generator"));
}
