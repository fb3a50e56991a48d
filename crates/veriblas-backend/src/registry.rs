//! Runtime registry of reference implementations.
//!
//! Which references exist is a build-time question answered by feature
//! flags; which of those a run uses is answered here at startup. The
//! driver iterates whatever is registered rather than assuming a fixed
//! count.

use std::sync::Arc;

use tracing::{info, warn};
use veriblas_common::Scalar;

use crate::{BlasBackend, HostBackend};

/// Identifier-keyed set of reference backends for one element type.
pub struct ReferenceRegistry<T: Scalar> {
    entries: Vec<(&'static str, Arc<dyn BlasBackend<T>>)>,
}

impl<T: Scalar> Default for ReferenceRegistry<T> {
    fn default() -> Self {
        ReferenceRegistry::new()
    }
}

impl<T: Scalar> ReferenceRegistry<T> {
    pub fn new() -> Self {
        ReferenceRegistry { entries: Vec::new() }
    }

    /// Registry populated with every reference compiled into this
    /// build: the naive host implementation, plus the ndarray one when
    /// the `ref-ndarray` feature is enabled.
    pub fn with_available() -> Self {
        let mut registry = ReferenceRegistry::new();
        registry.register("host", Arc::new(HostBackend));
        #[cfg(feature = "ref-ndarray")]
        registry.register("ndarray", Arc::new(crate::NdarrayBackend));
        registry
    }

    /// Adds a reference under `id`. Backends that report themselves
    /// unavailable in this environment are skipped, not errors.
    pub fn register(&mut self, id: &'static str, backend: Arc<dyn BlasBackend<T>>) {
        if !backend.is_available() {
            warn!(reference = id, "skipping unavailable reference implementation");
            return;
        }
        if let Some(entry) = self.entries.iter_mut().find(|(known, _)| *known == id) {
            warn!(reference = id, "replacing previously registered reference");
            entry.1 = backend;
            return;
        }
        info!(reference = id, "registered reference implementation");
        self.entries.push((id, backend));
    }

    pub fn get(&self, id: &str) -> Option<&dyn BlasBackend<T>> {
        self.entries.iter().find(|(known, _)| *known == id).map(|(_, b)| b.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &dyn BlasBackend<T>)> {
        self.entries.iter().map(|(id, backend)| (*id, backend.as_ref()))
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
