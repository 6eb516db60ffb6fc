#![deny(
    clippy::nursery,
    clippy::pedantic,
    missing_docs,
    clippy::missing_docs_in_private_items,
)]
#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]
//! # mp-gen – synthetic service topologies rendered as Kubernetes manifests
//!
//! 1. [`generate_random_service_graph`] builds a [`ServiceGraph`] from a seed and size
//!    parameters. The same inputs always produce the same graph.
//! 2. [`new_generator`] assembles a [`Generator`] from [options](crate::options): a common
//!    setup strategy (by default, the target namespace) and a workload strategy (by default, a
//!    Deployment and a Service per node whose pod template passes through a chain of
//!    [mutators](crate::workload::PodTemplateMutator)).
//! 3. [`Generator::apply`] writes the common objects, then every service's objects in graph
//!    order, as `---`-separated YAML documents with server-owned fields removed.
//!
//! ```no_run
//! use mp_gen::{fakeservice, generate_random_service_graph, new_generator, options};
//!
//! let graph = generate_random_service_graph(872_835_240, 50, 50, 2, 2)?;
//! let mut opts = fakeservice::generator_opts([fakeservice::with_reachable_services()]);
//! opts.push(options::with_namespace("mesh-perf"));
//! new_generator(opts)?.apply(&mut std::io::stdout(), &graph)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod encoder;
pub mod fakeservice;
pub mod formatters;
pub mod graph;
pub mod options;
pub mod random;
pub mod workload;
pub mod yaml;

pub use encoder::{
    CommonSetup,
    CommonSetupFn,
    Generator,
    ManifestGroup,
    ServiceGeneratorError,
    WorkloadGenerator,
    WorkloadGeneratorFn,
};
pub use formatters::{
    Formatters,
    SimpleFormatters,
};
pub use graph::{
    GraphError,
    Service,
    ServiceGraph,
};
pub use options::{
    new_generator,
    GeneratorOption,
};
pub use random::generate_random_service_graph;

#[cfg(test)]
mod tests;
