//! The typed manifest the encoder writes out, and server-field stripping.
use k8s_openapi::api::apps::v1 as appsv1;
use k8s_openapi::api::core::v1 as corev1;
use kube::api::DynamicObject;
use serde::Serialize;
use serde_json::Value;

/// One deployable object, held in typed form until it is written out.
///
/// Custom resources without a typed binding travel as [`DynamicObject`]s.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Manifest {
    /// A `v1/Namespace`.
    Namespace(corev1::Namespace),
    /// A `v1/ConfigMap`.
    ConfigMap(corev1::ConfigMap),
    /// An `apps/v1/Deployment`.
    Deployment(appsv1::Deployment),
    /// A `v1/Service`.
    Service(corev1::Service),
    /// Any other object.
    Dynamic(DynamicObject),
}

/// `From` conversions from each typed object into its [`Manifest`] variant.
macro_rules! manifest_from {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        $(
            impl From<$ty> for Manifest {
                fn from(obj: $ty) -> Self {
                    Self::$variant(obj)
                }
            }
        )+
    };
}

manifest_from!(
    Namespace(corev1::Namespace),
    ConfigMap(corev1::ConfigMap),
    Deployment(appsv1::Deployment),
    Service(corev1::Service),
    Dynamic(DynamicObject),
);

impl Manifest {
    /// The object's kind, as it appears in the serialized document.
    pub fn kind(&self) -> &str {
        match self {
            Self::Namespace(_) => "Namespace",
            Self::ConfigMap(_) => "ConfigMap",
            Self::Deployment(_) => "Deployment",
            Self::Service(_) => "Service",
            Self::Dynamic(obj) => obj.types.as_ref().map_or("", |t| t.kind.as_str()),
        }
    }

    /// The object's name, if one has been assigned.
    pub fn name(&self) -> Option<&str> {
        let meta = match self {
            Self::Namespace(obj) => &obj.metadata,
            Self::ConfigMap(obj) => &obj.metadata,
            Self::Deployment(obj) => &obj.metadata,
            Self::Service(obj) => &obj.metadata,
            Self::Dynamic(obj) => &obj.metadata,
        };
        meta.name.as_deref()
    }

    /// Remove fields the API server owns: `status`, `metadata.creationTimestamp`, and the pod
    /// template's `metadata.creationTimestamp`.
    pub fn strip_server_fields(&mut self) {
        match self {
            Self::Namespace(ns) => {
                ns.status = None;
                ns.metadata.creation_timestamp = None;
            },
            Self::ConfigMap(cm) => {
                cm.metadata.creation_timestamp = None;
            },
            Self::Deployment(depl) => {
                depl.status = None;
                depl.metadata.creation_timestamp = None;
                if let Some(template_meta) = depl.spec.as_mut().and_then(|spec| spec.template.metadata.as_mut()) {
                    template_meta.creation_timestamp = None;
                }
            },
            Self::Service(svc) => {
                svc.status = None;
                svc.metadata.creation_timestamp = None;
            },
            Self::Dynamic(obj) => {
                obj.metadata.creation_timestamp = None;
                if let Some(data) = obj.data.as_object_mut() {
                    data.remove("status");
                }
                if let Some(template_meta) = obj.data.pointer_mut("/spec/template/metadata").and_then(Value::as_object_mut)
                {
                    template_meta.remove("creationTimestamp");
                }
            },
        }
    }

    /// Strip server-owned fields and render the object as a single YAML document (without the
    /// leading separator).
    pub fn into_clean_yaml(mut self) -> anyhow::Result<String> {
        self.strip_server_fields();
        Ok(serde_yaml::to_string(&self)?)
    }

    /// Like [`Manifest::into_clean_yaml`], leaving `self` untouched.
    pub fn to_clean_yaml(&self) -> anyhow::Result<String> {
        self.clone().into_clean_yaml()
    }
}
