//! Well-known label and annotation keys stamped onto generated manifests.

/// Label that selects the pods of one generated workload.
pub const APP_LABEL_KEY: &str = "app";

/// Namespace label asking the mesh control plane to inject sidecars.
pub const SIDECAR_INJECTION_LABEL_KEY: &str = "kuma.io/sidecar-injection";

/// Pod label naming the mesh a workload joins.
pub const MESH_LABEL_KEY: &str = "kuma.io/mesh";

/// Pod annotation holding a JSON list of reachable backend references.
pub const REACHABLE_BACKENDS_ANNOTATION_KEY: &str = "kuma.io/reachable-backends";

/// Pod annotation holding a comma-separated list of reachable service names.
pub const REACHABLE_SERVICES_ANNOTATION_KEY: &str = "kuma.io/transparent-proxying-reachable-services";

/// Kind used for references to mesh services in reachable-backend annotations.
pub const MESH_SERVICE_KIND: &str = "MeshService";

/// Separator written before every YAML document in a manifest stream.
pub const DOCUMENT_SEPARATOR: &[u8] = b"---\n";
