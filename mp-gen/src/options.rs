//! Functional configuration for [`Generator`].
//!
//! A generator is described by a list of [`GeneratorOption`]s applied in order to
//! [`GeneratorConfig::default`]. Scalar settings are last-write-wins; pod template mutators
//! accumulate across options.
use std::collections::BTreeMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use mp_core::prelude::*;
use regex::Regex;
use tracing::info;

use crate::encoder::{
    CommonSetup,
    Generator,
    WorkloadGenerator,
};
use crate::formatters::{
    Formatters,
    SimpleFormatters,
};
use crate::workload::{
    DeploymentGenerator,
    NamespaceSetup,
    PodTemplateMutator,
};

/// Namespace the generated workloads land in unless overridden.
pub const DEFAULT_NAMESPACE: &str = "mesh-topology";

/// Image run by every generated workload unless overridden.
pub const DEFAULT_IMAGE: &str = "nginx";

/// Port the generated workloads listen on unless overridden.
pub const DEFAULT_PORT: u16 = 80;

/// Workload family used to name services unless overridden.
pub const DEFAULT_FAMILY: &str = "srv";

lazy_static! {
    /// A DNS-1123 label, which is what Kubernetes accepts as a namespace name.
    static ref DNS_LABEL_RE: Regex = Regex::new(r"^[a-z0-9]([-a-z0-9]{0,61}[a-z0-9])?$").unwrap();
}

err_impl! {ConfigError,
    #[error("namespace is not a valid DNS-1123 label: {0:?}")]
    InvalidNamespace(String),

    #[error("image reference must not be empty")]
    EmptyImage(String),

    #[error("port must be non-zero")]
    InvalidPort(u16),
}

/// How the common setup phase is chosen.
enum CommonSetupChoice {
    /// The built-in namespace setup.
    Namespace,
    /// A caller-supplied strategy.
    Custom(Box<dyn CommonSetup>),
    /// No common setup phase at all.
    Disabled,
}

/// Everything [`new_generator`] needs to assemble a [`Generator`].
pub struct GeneratorConfig {
    /// Namespace of every generated object.
    namespace: String,
    /// Whether the namespace setup emits the namespace object.
    create_namespace: bool,
    /// Labels on the namespace object.
    namespace_labels: BTreeMap<String, String>,
    /// Container image of the default workload.
    image: String,
    /// Container and service port of the default workload.
    port: u16,
    /// Naming for services and their URLs.
    formatters: Arc<dyn Formatters>,
    /// Pod template mutators, in application order.
    mutators: Vec<PodTemplateMutator>,
    /// Which common setup strategy runs.
    common_setup: CommonSetupChoice,
    /// Replaces the default workload strategy when set.
    workload_generator: Option<Box<dyn WorkloadGenerator>>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.into(),
            create_namespace: true,
            namespace_labels: BTreeMap::from([(SIDECAR_INJECTION_LABEL_KEY.into(), "enabled".into())]),
            image: DEFAULT_IMAGE.into(),
            port: DEFAULT_PORT,
            formatters: Arc::new(SimpleFormatters::new(DEFAULT_FAMILY)),
            mutators: vec![],
            common_setup: CommonSetupChoice::Namespace,
            workload_generator: None,
        }
    }
}

impl GeneratorConfig {
    /// Target namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Whether the common setup emits the namespace object.
    pub const fn create_namespace(&self) -> bool {
        self.create_namespace
    }

    /// Labels put on the namespace object.
    pub fn namespace_labels(&self) -> &BTreeMap<String, String> {
        &self.namespace_labels
    }

    /// Image run by every workload.
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Port every workload listens on.
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Naming scheme for services.
    pub fn formatters(&self) -> &Arc<dyn Formatters> {
        &self.formatters
    }

    /// Number of registered pod template mutators.
    pub fn mutator_count(&self) -> usize {
        self.mutators.len()
    }

    /// Reject settings that would produce invalid manifests.
    fn validate(&self) -> EmptyResult {
        if !DNS_LABEL_RE.is_match(&self.namespace) {
            return Err(ConfigError::invalid_namespace(self.namespace.as_str()));
        }
        if self.image.trim().is_empty() {
            return Err(ConfigError::empty_image(self.image.as_str()));
        }
        if self.port == 0 {
            return Err(ConfigError::invalid_port(self.port));
        }
        Ok(())
    }

    /// Build the strategies this configuration describes.
    fn into_generator(self) -> Generator {
        let common_setup: Option<Box<dyn CommonSetup>> = match self.common_setup {
            CommonSetupChoice::Namespace => Some(Box::new(NamespaceSetup {
                namespace: self.namespace.clone(),
                labels: self.namespace_labels,
                create_namespace: self.create_namespace,
            })),
            CommonSetupChoice::Custom(setup) => Some(setup),
            CommonSetupChoice::Disabled => None,
        };

        let workload_generator: Box<dyn WorkloadGenerator> = match self.workload_generator {
            Some(generator) => generator,
            None => Box::new(DeploymentGenerator {
                namespace: self.namespace,
                image: self.image,
                port: self.port,
                formatters: self.formatters,
                mutators: self.mutators,
            }),
        };

        Generator { common_setup, workload_generator }
    }
}

/// One configuration step.
pub type GeneratorOption = Box<dyn FnOnce(&mut GeneratorConfig) + Send>;

/// Apply `opts` in order to the default configuration, validate the result, and build the
/// generator.
pub fn new_generator(opts: impl IntoIterator<Item = GeneratorOption>) -> anyhow::Result<Generator> {
    let mut config = GeneratorConfig::default();
    for opt in opts {
        opt(&mut config);
    }
    config.validate()?;

    info!(
        namespace = %config.namespace,
        image = %config.image,
        port = config.port,
        mutators = config.mutators.len(),
        "configured manifest generator"
    );
    Ok(config.into_generator())
}

/// Put every generated object in `namespace`.
pub fn with_namespace(namespace: impl Into<String>) -> GeneratorOption {
    let namespace = namespace.into();
    Box::new(move |c: &mut GeneratorConfig| c.namespace = namespace)
}

/// Assume the namespace exists; the default common setup then emits nothing.
pub fn skip_namespace_creation() -> GeneratorOption {
    Box::new(|c: &mut GeneratorConfig| c.create_namespace = false)
}

/// Add (or overwrite) a label on the generated namespace.
pub fn with_namespace_label(key: impl Into<String>, value: impl Into<String>) -> GeneratorOption {
    let (key, value) = (key.into(), value.into());
    Box::new(move |c: &mut GeneratorConfig| {
        c.namespace_labels.insert(key, value);
    })
}

/// Run `image` in every workload.
pub fn with_image(image: impl Into<String>) -> GeneratorOption {
    let image = image.into();
    Box::new(move |c: &mut GeneratorConfig| c.image = image)
}

/// Listen on `port` in every workload.
pub fn with_port(port: u16) -> GeneratorOption {
    Box::new(move |c: &mut GeneratorConfig| c.port = port)
}

/// Name services with `formatters`.
pub fn with_formatters(formatters: impl Formatters + 'static) -> GeneratorOption {
    let formatters: Arc<dyn Formatters> = Arc::new(formatters);
    Box::new(move |c: &mut GeneratorConfig| c.formatters = formatters)
}

/// Append mutators to the pod template chain, skipping `None` entries.
pub fn with_pod_template_mutators(mutators: impl IntoIterator<Item = Option<PodTemplateMutator>>) -> GeneratorOption {
    let mutators: Vec<_> = mutators.into_iter().flatten().collect();
    Box::new(move |c: &mut GeneratorConfig| c.mutators.extend(mutators))
}

/// Replace the default namespace setup with `setup`.
pub fn with_common_setup(setup: impl CommonSetup + 'static) -> GeneratorOption {
    let setup: Box<dyn CommonSetup> = Box::new(setup);
    Box::new(move |c: &mut GeneratorConfig| c.common_setup = CommonSetupChoice::Custom(setup))
}

/// Run no common setup phase at all.
pub fn without_common_setup() -> GeneratorOption {
    Box::new(|c: &mut GeneratorConfig| c.common_setup = CommonSetupChoice::Disabled)
}

/// Replace the default Deployment/Service generator with `generator`.
///
/// Image, port, formatters and mutators only configure the default generator and are ignored
/// once this is set.
pub fn with_workload_generator(generator: impl WorkloadGenerator + 'static) -> GeneratorOption {
    let generator: Box<dyn WorkloadGenerator> = Box::new(generator);
    Box::new(move |c: &mut GeneratorConfig| c.workload_generator = Some(generator))
}
