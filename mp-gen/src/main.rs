#![deny(
    clippy::nursery,
    clippy::pedantic,
    missing_docs,
    clippy::missing_docs_in_private_items,
)]
//! Command-line entry point: generate (or load) a service topology and write it out, either as
//! Kubernetes manifests or as the graph itself.
use std::fs::File;
use std::io::{
    self,
    BufWriter,
    Write,
};
use std::path::PathBuf;

use anyhow::{
    Context,
    Result,
};
use clap::{
    Parser,
    ValueEnum,
};
use mp_gen::{
    fakeservice,
    generate_random_service_graph,
    new_generator,
    options,
    yaml,
    GeneratorOption,
    ServiceGraph,
};
use tracing::info;

/// What to write to the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Kubernetes manifests, one YAML document per object.
    Manifests,
    /// The service graph as YAML.
    Graph,
}

/// Which reachability annotation fake-service pods carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Reachability {
    /// No annotation.
    None,
    /// `MeshService` references to every upstream.
    Backends,
    /// Names of every reachable service.
    Services,
}

/// Generate a synthetic service mesh topology and render it as Kubernetes manifests
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Seed for the random topology; the same seed and sizes always give the same graph.
    #[arg(long, default_value_t = 872_835_240, allow_negative_numbers = true)]
    seed: i64,

    /// Number of services in the generated topology.
    #[arg(short, long, default_value_t = 10)]
    num_services: usize,

    /// Percent chance (0-100) that a service calls any given later service.
    #[arg(short, long, default_value_t = 50, value_parser = clap::value_parser!(u32).range(0..=100))]
    edge_weight: u32,

    /// Smallest replica count drawn for a service.
    #[arg(long, default_value_t = 1)]
    min_replicas: u32,

    /// Largest replica count drawn for a service.
    #[arg(long, default_value_t = 1)]
    max_replicas: u32,

    /// Read the topology from a graph YAML file instead of generating one.
    #[arg(short, long)]
    graph_file: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Manifests)]
    format: OutputFormat,

    /// Namespace for the generated workloads.
    #[arg(long)]
    namespace: Option<String>,

    /// Don't emit a Namespace object.
    #[arg(long)]
    skip_namespace: bool,

    /// Image for generic workloads (ignored with --fake-service).
    #[arg(long)]
    image: Option<String>,

    /// Port for generic workloads (ignored with --fake-service).
    #[arg(long)]
    port: Option<u16>,

    /// Render services as fake-service workloads that call their upstreams.
    #[arg(long)]
    fake_service: bool,

    /// Registry for the fake-service image.
    #[arg(long, default_value = "")]
    registry: String,

    /// Reachability annotation for fake-service pods.
    #[arg(long, value_enum, default_value_t = Reachability::None)]
    reachable: Reachability,

    /// Mesh label for fake-service pods.
    #[arg(long)]
    mesh: Option<String>,

    /// Write to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Logging verbosity level (`trace`, `debug`, `info`, `warn`, `error`).
    #[arg(short, long, default_value = "warn")]
    verbosity: String,
}

impl Cli {
    /// Read the graph from `--graph-file`, or generate one from the size flags.
    fn load_graph(&self) -> Result<ServiceGraph> {
        if let Some(path) = &self.graph_file {
            info!("Loading service graph from {}", path.display());
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            return yaml::read_graph(file);
        }

        generate_random_service_graph(
            self.seed,
            self.num_services,
            self.edge_weight,
            self.min_replicas,
            self.max_replicas,
        )
    }

    /// Translate the manifest flags into generator options, in application order.
    fn generator_opts(&self) -> Vec<GeneratorOption> {
        let mut opts = if self.fake_service {
            let mut fns = vec![fakeservice::with_registry(self.registry.as_str())];
            match self.reachable {
                Reachability::None => (),
                Reachability::Backends => fns.push(fakeservice::with_reachable_backends()),
                Reachability::Services => fns.push(fakeservice::with_reachable_services()),
            }
            if let Some(mesh) = &self.mesh {
                fns.push(fakeservice::with_mesh(mesh.as_str()));
            }
            fakeservice::generator_opts(fns)
        } else {
            let mut opts = vec![];
            if let Some(image) = &self.image {
                opts.push(options::with_image(image.as_str()));
            }
            if let Some(port) = self.port {
                opts.push(options::with_port(port));
            }
            opts
        };

        if let Some(namespace) = &self.namespace {
            opts.push(options::with_namespace(namespace.as_str()));
        }
        if self.skip_namespace {
            opts.push(options::skip_namespace_creation());
        }
        opts
    }
}

/// Parse flags, set up logging, and write the requested output.
fn main() -> Result<()> {
    let args = Cli::parse();
    mp_core::logging::setup(&args.verbosity);

    let graph = args.load_graph()?;
    info!(services = graph.len(), edges = graph.edge_count(), "service graph ready");

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    match args.format {
        OutputFormat::Graph => yaml::write_graph(&mut writer, &graph)?,
        OutputFormat::Manifests => new_generator(args.generator_opts())?.apply(&mut writer, &graph)?,
    }
    writer.flush()?;
    Ok(())
}
