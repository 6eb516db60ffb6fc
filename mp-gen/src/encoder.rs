//! The manifest pipeline: shared setup objects first, then one group of objects per service,
//! each written out as a cleaned YAML document.
use std::io::Write;

use mp_core::prelude::*;
use tracing::{
    debug,
    instrument,
};

use crate::graph::{
    Service,
    ServiceGraph,
};

/// What a strategy hands back to the encoder: raw bytes written verbatim, followed by objects
/// that are cleaned and serialized one document each.
#[derive(Clone, Debug, Default)]
pub struct ManifestGroup {
    /// Bytes written before any of the objects, unmodified.
    pub raw_prefix: Vec<u8>,
    /// Objects, in output order.
    pub objects: Vec<Manifest>,
}

impl ManifestGroup {
    /// A group with objects and no raw prefix.
    pub fn from_objects(objects: impl IntoIterator<Item = Manifest>) -> Self {
        Self { raw_prefix: vec![], objects: objects.into_iter().collect() }
    }

    /// Replace the raw prefix.
    #[must_use]
    pub fn with_raw_prefix(mut self, raw_prefix: impl Into<Vec<u8>>) -> Self {
        self.raw_prefix = raw_prefix.into();
        self
    }
}

/// Produces cluster-wide objects once per graph (namespaces, shared configuration).
#[cfg_attr(test, mockall::automock)]
pub trait CommonSetup: Send + Sync {
    /// Build the shared objects for `graph`.
    fn generate(&self, graph: &ServiceGraph) -> anyhow::Result<ManifestGroup>;
}

/// Produces the objects that make up one service's workload.
#[cfg_attr(test, mockall::automock)]
pub trait WorkloadGenerator: Send + Sync {
    /// Build the objects for `service`.
    fn generate(&self, service: &Service) -> anyhow::Result<ManifestGroup>;
}

/// Adapts a closure into a [`CommonSetup`].
pub struct CommonSetupFn<F>(
    /// The wrapped closure.
    pub F,
);

impl<F> CommonSetup for CommonSetupFn<F>
where
    F: Fn(&ServiceGraph) -> anyhow::Result<ManifestGroup> + Send + Sync,
{
    fn generate(&self, graph: &ServiceGraph) -> anyhow::Result<ManifestGroup> {
        (self.0)(graph)
    }
}

/// Adapts a closure into a [`WorkloadGenerator`].
pub struct WorkloadGeneratorFn<F>(
    /// The wrapped closure.
    pub F,
);

impl<F> WorkloadGenerator for WorkloadGeneratorFn<F>
where
    F: Fn(&Service) -> anyhow::Result<ManifestGroup> + Send + Sync,
{
    fn generate(&self, service: &Service) -> anyhow::Result<ManifestGroup> {
        (self.0)(service)
    }
}

/// A failure while generating or encoding one service, tagged with the service's index.
///
/// The cause is available through [`std::error::Error::source`].
#[derive(Debug, Error)]
#[error("failed generating service: {idx} with error: {source}")]
pub struct ServiceGeneratorError {
    /// Index of the failing service.
    idx: usize,
    /// What went wrong.
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl ServiceGeneratorError {
    /// Tag `err` with the index of the service it came from.
    fn wrap(idx: usize, err: anyhow::Error) -> anyhow::Error {
        anyhow!(Self { idx, source: err.into() })
    }

    /// Index of the service that failed.
    pub const fn idx(&self) -> usize {
        self.idx
    }
}

/// Renders a [`ServiceGraph`] into a stream of manifests.
///
/// Usually built with [`new_generator`](crate::options::new_generator), but both strategies can
/// be supplied directly.
pub struct Generator {
    /// Runs once, before any service; skipped when `None`.
    pub common_setup: Option<Box<dyn CommonSetup>>,
    /// Runs once per service, in graph order.
    pub workload_generator: Box<dyn WorkloadGenerator>,
}

impl Generator {
    /// Write the manifests for `graph` to `writer`.
    ///
    /// Documents come out in a fixed order: the common setup's objects, then each service's
    /// objects in graph order. Failures in the common setup are returned as-is; failures while
    /// building or serializing a service are wrapped in a [`ServiceGeneratorError`]. Errors from
    /// `writer` pass through untouched. On any error the output written so far is incomplete
    /// and should be discarded.
    #[instrument(skip_all, fields(services = graph.len()))]
    pub fn apply<W: Write + ?Sized>(&self, writer: &mut W, graph: &ServiceGraph) -> EmptyResult {
        if let Some(common_setup) = &self.common_setup {
            let group = common_setup.generate(graph)?;
            debug!(objects = group.objects.len(), "writing common setup");
            writer.write_all(&group.raw_prefix)?;
            for obj in group.objects {
                let doc = obj.into_clean_yaml()?;
                write_document(writer, &doc)?;
            }
        }

        for svc in &graph.services {
            let group = self
                .workload_generator
                .generate(svc)
                .map_err(|err| ServiceGeneratorError::wrap(svc.idx, err))?;
            debug!(idx = svc.idx, objects = group.objects.len(), "writing service");
            writer.write_all(&group.raw_prefix)?;
            for obj in group.objects {
                let doc = obj.into_clean_yaml().map_err(|err| ServiceGeneratorError::wrap(svc.idx, err))?;
                write_document(writer, &doc)?;
            }
        }

        Ok(())
    }
}

/// Write one separator followed by one already-serialized document.
fn write_document<W: Write + ?Sized>(writer: &mut W, doc: &str) -> EmptyResult {
    writer.write_all(DOCUMENT_SEPARATOR)?;
    writer.write_all(doc.as_bytes())?;
    Ok(())
}
