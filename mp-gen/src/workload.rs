//! Default strategies: a namespace for the common setup and a Deployment plus Service per
//! graph node, with pod templates shaped by a chain of mutators.
use std::collections::BTreeMap;
use std::sync::Arc;

use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use mp_core::k8s::{
    app_labels,
    build_object_meta,
};
use mp_core::prelude::*;
use serde::Serialize;

use crate::encoder::{
    CommonSetup,
    ManifestGroup,
    WorkloadGenerator,
};
use crate::formatters::Formatters;
use crate::graph::{
    Service,
    ServiceGraph,
};

/// Name of the single container in every generated pod.
const CONTAINER_NAME: &str = "app";
/// Name of the container port and of the matching service port.
const PORT_NAME: &str = "http";

/// Transforms a pod template before it is embedded in a workload.
///
/// Each mutator receives the template produced by the previous one and returns the template for
/// the next; an error aborts generation of that service.
pub type PodTemplateMutator =
    Arc<dyn Fn(&dyn Formatters, &Service, corev1::PodTemplateSpec) -> anyhow::Result<corev1::PodTemplateSpec> + Send + Sync>;

/// Wrap a closure as a [`PodTemplateMutator`].
pub fn mutator<F>(f: F) -> PodTemplateMutator
where
    F: Fn(&dyn Formatters, &Service, corev1::PodTemplateSpec) -> anyhow::Result<corev1::PodTemplateSpec>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

/// `Some(mutator)` when `predicate` holds, `None` otherwise; option helpers skip `None`.
pub fn mutate_maybe(predicate: bool, mutator: PodTemplateMutator) -> Option<PodTemplateMutator> {
    predicate.then_some(mutator)
}

/// Emits the target namespace, or nothing when namespace creation is disabled.
#[derive(Clone, Debug)]
pub struct NamespaceSetup {
    /// Name of the namespace object.
    pub(crate) namespace: String,
    /// Labels set on the namespace; omitted when empty.
    pub(crate) labels: BTreeMap<String, String>,
    /// When false, the setup emits nothing.
    pub(crate) create_namespace: bool,
}

impl CommonSetup for NamespaceSetup {
    fn generate(&self, _graph: &ServiceGraph) -> anyhow::Result<ManifestGroup> {
        if !self.create_namespace {
            return Ok(ManifestGroup::default());
        }

        let ns = corev1::Namespace {
            metadata: metav1::ObjectMeta {
                name: Some(self.namespace.clone()),
                labels: (!self.labels.is_empty()).then(|| self.labels.clone()),
                ..Default::default()
            },
            ..Default::default()
        };
        Ok(ManifestGroup::from_objects([Manifest::from(ns)]))
    }
}

/// Builds a Deployment and a ClusterIP Service for every graph node.
#[derive(Clone)]
pub struct DeploymentGenerator {
    /// Namespace of every emitted object.
    pub(crate) namespace: String,
    /// Image of the single container.
    pub(crate) image: String,
    /// Container port, also exposed by the service.
    pub(crate) port: u16,
    /// Naming for services and their URLs.
    pub(crate) formatters: Arc<dyn Formatters>,
    /// Applied to each pod template in order.
    pub(crate) mutators: Vec<PodTemplateMutator>,
}

impl DeploymentGenerator {
    /// Pod template before any mutator runs.
    fn base_pod_template(&self, name: &str) -> corev1::PodTemplateSpec {
        corev1::PodTemplateSpec {
            metadata: Some(metav1::ObjectMeta {
                namespace: Some(self.namespace.clone()),
                labels: Some(app_labels(name)),
                ..Default::default()
            }),
            spec: Some(corev1::PodSpec {
                containers: vec![corev1::Container {
                    name: CONTAINER_NAME.into(),
                    image: Some(self.image.clone()),
                    ports: Some(vec![corev1::ContainerPort {
                        name: Some(PORT_NAME.into()),
                        container_port: i32::from(self.port),
                        ..Default::default()
                    }]),
                    ..Default::default()
                }],
                ..Default::default()
            }),
        }
    }
}

impl WorkloadGenerator for DeploymentGenerator {
    fn generate(&self, service: &Service) -> anyhow::Result<ManifestGroup> {
        let name = self.formatters.name(service.idx);
        let replicas = i32::try_from(service.replicas)
            .map_err(|_| anyhow!("replica count {} does not fit in a Deployment", service.replicas))?;

        let mut template = self.base_pod_template(&name);
        for mutate in &self.mutators {
            template = mutate(self.formatters.as_ref(), service, template)?;
        }

        let deployment = appsv1::Deployment {
            metadata: metav1::ObjectMeta {
                labels: Some(app_labels(&name)),
                ..build_object_meta(&self.namespace, &name)
            },
            spec: Some(appsv1::DeploymentSpec {
                replicas: Some(replicas),
                selector: metav1::LabelSelector {
                    match_labels: Some(app_labels(&name)),
                    ..Default::default()
                },
                template,
                ..Default::default()
            }),
            ..Default::default()
        };

        let svc = corev1::Service {
            metadata: metav1::ObjectMeta {
                labels: Some(app_labels(&name)),
                ..build_object_meta(&self.namespace, &name)
            },
            spec: Some(corev1::ServiceSpec {
                type_: Some("ClusterIP".into()),
                selector: Some(app_labels(&name)),
                ports: Some(vec![corev1::ServicePort {
                    name: Some(PORT_NAME.into()),
                    port: i32::from(self.port),
                    target_port: Some(IntOrString::Int(i32::from(self.port))),
                    app_protocol: Some(PORT_NAME.into()),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
            ..Default::default()
        };

        Ok(ManifestGroup::from_objects([Manifest::from(deployment), Manifest::from(svc)]))
    }
}

/// Namespace recorded on the pod template, or `""` when unset.
fn template_namespace(template: &corev1::PodTemplateSpec) -> &str {
    template.metadata.as_ref().and_then(|m| m.namespace.as_deref()).unwrap_or_default()
}

/// The pod template metadata, created empty if missing.
fn template_metadata_mut(template: &mut corev1::PodTemplateSpec) -> &mut metav1::ObjectMeta {
    template.metadata.get_or_insert_with(Default::default)
}

/// Set `SERVICE` (this service's name) and `UPSTREAM_URIS` (the URLs of its edges, in edge
/// order, comma-joined) on the first container, replacing earlier values of either variable.
pub fn inject_service_env(port: u16) -> PodTemplateMutator {
    mutator(move |formatters, svc, mut template| {
        let uris: Vec<_> = svc.edges.iter().map(|&edge| formatters.url(edge, port)).collect();
        let container = template
            .spec
            .as_mut()
            .and_then(|spec| spec.containers.first_mut())
            .ok_or_else(|| anyhow!("pod template for service {} has no containers", svc.idx))?;

        let env = container.env.get_or_insert_with(Vec::new);
        upsert_env(env, "SERVICE", formatters.name(svc.idx));
        upsert_env(env, "UPSTREAM_URIS", uris.join(","));
        Ok(template)
    })
}

/// Replace the variable called `name`, or append it if the container does not set it yet.
fn upsert_env(env: &mut Vec<corev1::EnvVar>, name: &str, value: String) {
    let var = corev1::EnvVar { name: name.into(), value: Some(value), ..Default::default() };
    let Some(existing) = env.iter_mut().find(|existing| existing.name == name) else {
        env.push(var);
        return;
    };
    *existing = var;
}

/// Payload of the reachable-backends annotation.
#[derive(Debug, Default, Serialize)]
struct ReachableBackendRefs {
    /// One entry per edge; an empty list serializes as `{}`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    refs: Vec<ReachableBackendRef>,
}

/// A single backend reference.
#[derive(Debug, Serialize)]
struct ReachableBackendRef {
    /// Always `MeshService`.
    kind: String,
    /// Name of the called service.
    name: String,
    /// Namespace of the called service.
    namespace: String,
}

/// Record every edge as a `MeshService` reference in the reachable-backends annotation.
pub fn reachable_backends() -> PodTemplateMutator {
    mutator(|formatters, svc, mut template| {
        let namespace = template_namespace(&template).to_owned();
        let refs = ReachableBackendRefs {
            refs: svc
                .edges
                .iter()
                .map(|&edge| ReachableBackendRef {
                    kind: MESH_SERVICE_KIND.into(),
                    name: formatters.name(edge),
                    namespace: namespace.clone(),
                })
                .collect(),
        };
        let value = serde_json::to_string(&refs)?;

        template_metadata_mut(&mut template)
            .annotations
            .get_or_insert_with(BTreeMap::new)
            .insert(REACHABLE_BACKENDS_ANNOTATION_KEY.into(), value);
        Ok(template)
    })
}

/// Record every edge as `<name>_<namespace>_svc_<port>` in the reachable-services annotation.
///
/// A service without edges lists itself, so the annotation is never empty.
pub fn reachable_services(port: u16) -> PodTemplateMutator {
    mutator(move |formatters, svc, mut template| {
        let namespace = template_namespace(&template).to_owned();
        let token = |idx: usize| format!("{}_{namespace}_svc_{port}", formatters.name(idx));

        let mut names: Vec<_> = svc.edges.iter().map(|&edge| token(edge)).collect();
        if names.is_empty() {
            names.push(token(svc.idx));
        }

        template_metadata_mut(&mut template)
            .annotations
            .get_or_insert_with(BTreeMap::new)
            .insert(REACHABLE_SERVICES_ANNOTATION_KEY.into(), names.join(","));
        Ok(template)
    })
}

/// Label pods with the mesh they should join.
pub fn mesh_label(mesh: impl Into<String>) -> PodTemplateMutator {
    let mesh = mesh.into();
    mutator(move |_, _, mut template| {
        template_metadata_mut(&mut template)
            .labels
            .get_or_insert_with(BTreeMap::new)
            .insert(MESH_LABEL_KEY.into(), mesh.clone());
        Ok(template)
    })
}
