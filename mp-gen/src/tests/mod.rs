#![allow(clippy::missing_docs_in_private_items)]
mod options_test;

use std::sync::Arc;

use rstest::*;

use crate::formatters::SimpleFormatters;
use crate::graph::{
    Service,
    ServiceGraph,
};
use crate::workload::DeploymentGenerator;

/// The four-node topology `0 -> {1, 2}, 1 -> 2, 2 -> 3`, two replicas each.
#[fixture]
fn sample_graph() -> ServiceGraph {
    ServiceGraph {
        services: vec![
            Service { idx: 0, replicas: 2, edges: vec![1, 2] },
            Service { idx: 1, replicas: 2, edges: vec![2] },
            Service { idx: 2, replicas: 2, edges: vec![3] },
            Service { idx: 3, replicas: 2, edges: vec![] },
        ],
    }
}

#[fixture]
fn deployment_generator() -> DeploymentGenerator {
    DeploymentGenerator {
        namespace: "foo".into(),
        image: "nginx".into(),
        port: 8080,
        formatters: Arc::new(SimpleFormatters::new("srv")),
        mutators: vec![],
    }
}

/// Split a manifest stream into parsed documents.
fn documents(output: &[u8]) -> Vec<serde_yaml::Value> {
    let text = std::str::from_utf8(output).unwrap();
    assert!(text.is_empty() || text.starts_with("---\n"), "stream must start with a separator");
    text.split("---\n")
        .filter(|doc| !doc.is_empty())
        .map(|doc| serde_yaml::from_str(doc).unwrap())
        .collect()
}

fn assert_no_server_fields(doc: &serde_yaml::Value) {
    assert!(doc.get("status").is_none(), "status present in {doc:?}");
    assert!(doc["metadata"].get("creationTimestamp").is_none(), "creationTimestamp present in {doc:?}");
    assert!(
        doc["spec"]["template"]["metadata"].get("creationTimestamp").is_none(),
        "template creationTimestamp present in {doc:?}"
    );
}
