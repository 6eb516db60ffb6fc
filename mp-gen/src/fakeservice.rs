//! Preset for topologies built from the `fake-service` test application, which calls every
//! address listed in `UPSTREAM_URIS` when it receives a request.
use lazy_static::lazy_static;

use crate::formatters::SimpleFormatters;
use crate::options::{
    with_formatters,
    with_image,
    with_port,
    with_pod_template_mutators,
    GeneratorOption,
};
use crate::workload::{
    inject_service_env,
    mesh_label,
    mutate_maybe,
    reachable_backends,
    reachable_services,
};

/// Port fake-service listens on.
pub const FAKE_SERVICE_PORT: u16 = 9090;

/// Registry the fake-service image is pulled from by default.
pub const DEFAULT_REGISTRY: &str = "nicholasjackson";

/// Workload family of fake-service names.
const FAKE_SERVICE_FAMILY: &str = "fake-service";
/// Image tag of fake-service.
const FAKE_SERVICE_TAG: &str = "v0.26.0";

lazy_static! {
    /// Naming scheme of fake-service workloads.
    pub static ref FORMATTERS: SimpleFormatters = SimpleFormatters::new(FAKE_SERVICE_FAMILY);
}

/// Settings of the fake-service preset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FakeServiceOptions {
    /// Registry prefix of the image.
    registry: String,
    /// Annotate pods with `MeshService` backend references.
    reachable_backends: bool,
    /// Annotate pods with reachable service names.
    reachable_services: bool,
    /// Mesh the pods join, if any.
    mesh: Option<String>,
}

impl Default for FakeServiceOptions {
    fn default() -> Self {
        Self {
            registry: DEFAULT_REGISTRY.into(),
            reachable_backends: false,
            reachable_services: false,
            mesh: None,
        }
    }
}

impl FakeServiceOptions {
    /// Full image reference for the configured registry.
    pub fn image(&self) -> String {
        format!("{}/{FAKE_SERVICE_FAMILY}:{FAKE_SERVICE_TAG}", self.registry)
    }
}

/// One fake-service setting.
pub type FakeServiceOption = Box<dyn FnOnce(&mut FakeServiceOptions)>;

/// Pull the image from `registry`; an empty string keeps the default.
pub fn with_registry(registry: impl Into<String>) -> FakeServiceOption {
    let registry = registry.into();
    Box::new(move |o: &mut FakeServiceOptions| {
        if !registry.is_empty() {
            o.registry = registry;
        }
    })
}

/// Annotate pods with `MeshService` references to their upstreams. Takes precedence over
/// [`with_reachable_services`].
pub fn with_reachable_backends() -> FakeServiceOption {
    Box::new(|o: &mut FakeServiceOptions| o.reachable_backends = true)
}

/// Annotate pods with the names of the services they reach.
pub fn with_reachable_services() -> FakeServiceOption {
    Box::new(|o: &mut FakeServiceOptions| o.reachable_services = true)
}

/// Label pods as members of `mesh`.
pub fn with_mesh(mesh: impl Into<String>) -> FakeServiceOption {
    let mesh = mesh.into();
    Box::new(move |o: &mut FakeServiceOptions| o.mesh = Some(mesh))
}

/// Resolve `fns` against the defaults.
pub fn resolve(fns: impl IntoIterator<Item = FakeServiceOption>) -> FakeServiceOptions {
    let mut opts = FakeServiceOptions::default();
    for f in fns {
        f(&mut opts);
    }
    opts
}

/// Generator options that turn every service into a fake-service workload.
///
/// Namespace options are left to the caller; append them to the returned list.
pub fn generator_opts(fns: impl IntoIterator<Item = FakeServiceOption>) -> Vec<GeneratorOption> {
    let opts = resolve(fns);

    vec![
        with_port(FAKE_SERVICE_PORT),
        with_formatters(FORMATTERS.clone()),
        with_image(opts.image()),
        with_pod_template_mutators([
            Some(inject_service_env(FAKE_SERVICE_PORT)),
            mutate_maybe(
                opts.reachable_services && !opts.reachable_backends,
                reachable_services(FAKE_SERVICE_PORT),
            ),
            mutate_maybe(opts.reachable_backends, reachable_backends()),
            opts.mesh.map(mesh_label),
        ]),
    ]
}
