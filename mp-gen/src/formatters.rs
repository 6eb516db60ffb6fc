//! Naming and addressing for generated services.
use std::fmt;

/// Maps a service index to the name its objects carry and the URL other services use to call
/// it.
///
/// Implementations must be pure and injective: distinct indices get distinct names.
pub trait Formatters: fmt::Debug + Send + Sync {
    /// The object name for service `idx`.
    fn name(&self, idx: usize) -> String;

    /// The address of service `idx` on `port`; consistent with [`Formatters::name`].
    fn url(&self, idx: usize, port: u16) -> String;
}

/// `<family>-<idx>` names with the index zero-padded to three digits, reached over plain HTTP
/// at the service's own name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleFormatters {
    /// Name prefix shared by every service.
    family: String,
}

impl SimpleFormatters {
    /// Formatters for the workload family `family`, e.g. `fake-service`.
    pub fn new(family: impl Into<String>) -> Self {
        Self { family: family.into() }
    }

    /// The workload family these formatters name.
    pub fn family(&self) -> &str {
        &self.family
    }
}

impl Formatters for SimpleFormatters {
    fn name(&self, idx: usize) -> String {
        format!("{}-{idx:03}", self.family)
    }

    fn url(&self, idx: usize, port: u16) -> String {
        format!("http://{}:{port}", self.name(idx))
    }
}
