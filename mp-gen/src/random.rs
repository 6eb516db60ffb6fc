//! Deterministic random topologies.
use rand::rngs::StdRng;
use rand::{
    Rng,
    SeedableRng,
};
use tracing::{
    debug,
    instrument,
};

use crate::graph::{
    GraphError,
    Service,
    ServiceGraph,
};

/// Upper bound on the number of services a single service calls.
///
/// Keeps the edge count linear in the number of services so that graphs with thousands of
/// nodes still render to a manageable manifest stream.
pub const MAX_EDGES_PER_SERVICE: usize = 16;

/// Build a random service graph.
///
/// Every decision is drawn from one `StdRng` seeded with `seed`, in index order: node `i`
/// draws its replica count from `min_replicas..=max_replicas`, then walks the candidates
/// `i + 1, i + 2, ..` and keeps each one with a `max_edge_weight` percent chance, until it has
/// [`MAX_EDGES_PER_SERVICE`] edges or runs out of candidates. Edges therefore only ever point
/// forward, which makes the graph acyclic and free of self-loops.
///
/// The same arguments always produce the same graph.
#[instrument]
pub fn generate_random_service_graph(
    seed: i64,
    num_services: usize,
    max_edge_weight: u32,
    min_replicas: u32,
    max_replicas: u32,
) -> anyhow::Result<ServiceGraph> {
    if max_edge_weight > 100 {
        return Err(GraphError::invalid_edge_weight(max_edge_weight));
    }
    if min_replicas == 0 || min_replicas > max_replicas || i32::try_from(max_replicas).is_err() {
        return Err(GraphError::invalid_replica_range(format!("{min_replicas}..={max_replicas}")));
    }

    #[allow(clippy::cast_sign_loss)]
    let mut rng = StdRng::seed_from_u64(seed as u64);
    let mut services = Vec::with_capacity(num_services);

    for idx in 0..num_services {
        let replicas = rng.gen_range(min_replicas..=max_replicas);

        let mut edges = vec![];
        for candidate in (idx + 1)..num_services {
            if edges.len() == MAX_EDGES_PER_SERVICE {
                break;
            }
            if rng.gen_range(0..100) < max_edge_weight {
                edges.push(candidate);
            }
        }

        services.push(Service { idx, replicas, edges });
    }

    let graph = ServiceGraph { services };
    debug!(services = graph.len(), edges = graph.edge_count(), "generated service graph");
    Ok(graph)
}
