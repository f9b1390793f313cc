//! Node registry: one externally visible handle per node name

use crate::node::NodeHandle;
use crate::options::MeshOptions;
use crate::session::SessionFactory;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared registry mapping node names to lazily created session handles
///
/// Handles are created on first use and live until closed. Under a creation
/// race more than one candidate handle may be constructed for the same name;
/// publication is an atomic insert-if-absent, so exactly one of them becomes
/// visible and the losers are dropped before ever starting.
pub struct NodeRegistry {
    options: MeshOptions,
    factory: Arc<dyn SessionFactory>,
    nodes: DashMap<String, Arc<NodeHandle>>,
}

impl NodeRegistry {
    pub fn new(options: MeshOptions, factory: Arc<dyn SessionFactory>) -> Self {
        Self {
            options,
            factory,
            nodes: DashMap::new(),
        }
    }

    /// Return the handle for `name`, creating and publishing it if absent.
    ///
    /// Safe for concurrent use: every caller for a given name observes the
    /// same handle.
    pub fn load_or_create(&self, name: &str) -> Arc<NodeHandle> {
        if let Some(handle) = self.nodes.get(name) {
            return handle.clone();
        }

        let config = self.options.resolve(name);
        let candidate = Arc::new(NodeHandle::new(name, self.factory.create(&config)));
        match self.nodes.entry(name.to_string()) {
            Entry::Occupied(existing) => {
                // Lost the publication race; drop the candidate unstarted
                debug!(node = %name, "discarding redundant node handle");
                existing.get().clone()
            }
            Entry::Vacant(slot) => {
                debug!(node = %name, hostname = %config.hostname, "created node handle");
                slot.insert(candidate.clone());
                candidate
            }
        }
    }

    /// Handle for `name` if one has been created
    pub fn get(&self, name: &str) -> Option<Arc<NodeHandle>> {
        self.nodes.get(name).map(|handle| handle.clone())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Close every handle. Individual close failures are logged and do not
    /// stop the remaining handles from closing.
    pub async fn close_all(&self) {
        let handles: Vec<Arc<NodeHandle>> =
            self.nodes.iter().map(|entry| entry.value().clone()).collect();
        for handle in handles {
            if let Err(err) = handle.close().await {
                warn!(node = %handle.name(), error = %err, "failed to close node session");
            }
        }
    }
}
