//! The service topology model.
use mp_core::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

err_impl! {GraphError,
    #[error("edge weight must be a percentage in 0..=100, got {0}")]
    InvalidEdgeWeight(u32),

    #[error("service {0} needs at least one replica")]
    ZeroReplicas(usize),

    #[error("invalid replica range: {0}")]
    InvalidReplicaRange(String),

    #[error("service at position {0} has a mismatched index")]
    MisplacedService(usize),

    #[error("edge out of range: {0}")]
    EdgeOutOfRange(String),
}

/// One logical node of the topology.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Stable identity; equal to the service's position in [`ServiceGraph::services`].
    pub idx: usize,
    /// Desired instance count of the service's workload.
    pub replicas: u32,
    /// Indices of the services this one calls, in call order.
    #[serde(default)]
    pub edges: Vec<usize>,
}

/// An ordered set of services and their dependency edges.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceGraph {
    /// The services, in canonical order.
    pub services: Vec<Service>,
}

impl ServiceGraph {
    /// Number of services in the graph.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether the graph has no services.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Total number of edges across all services.
    pub fn edge_count(&self) -> usize {
        self.services.iter().map(|s| s.edges.len()).sum()
    }

    /// Check the structural invariants: every service sits at its own index, has at least one
    /// replica, and only points at services inside the graph.
    ///
    /// Graphs from the random generator always pass; this is for graphs built by hand or read
    /// from a file.
    pub fn validate(&self) -> EmptyResult {
        let n = self.len();
        for (pos, svc) in self.services.iter().enumerate() {
            if svc.idx != pos {
                return Err(GraphError::misplaced_service(pos));
            }
            if svc.replicas == 0 {
                return Err(GraphError::zero_replicas(svc.idx));
            }
            if let Some(edge) = svc.edges.iter().find(|&&e| e >= n) {
                return Err(GraphError::edge_out_of_range(format!("{} -> {edge} (graph has {n} services)", svc.idx)));
            }
        }
        Ok(())
    }
}
