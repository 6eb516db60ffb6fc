//! The service graph itself as YAML, for inspecting a topology or replaying it later.
use std::io::{
    Read,
    Write,
};

use anyhow::Context;
use mp_core::errors::EmptyResult;

use crate::graph::ServiceGraph;

/// Serialize `graph` to `writer`.
pub fn write_graph<W: Write>(writer: W, graph: &ServiceGraph) -> EmptyResult {
    serde_yaml::to_writer(writer, graph).context("serializing service graph")?;
    Ok(())
}

/// Read a graph written by [`write_graph`] (or by hand) and check its invariants.
pub fn read_graph<R: Read>(reader: R) -> anyhow::Result<ServiceGraph> {
    let graph: ServiceGraph = serde_yaml::from_reader(reader).context("parsing service graph")?;
    graph.validate()?;
    Ok(graph)
}
