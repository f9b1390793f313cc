//! Per-node configuration resolution
//!
//! Each accessor consults the node's override first and falls back to the
//! global default. An empty-string override counts as unset. `hostname` is
//! the exception: its fallback is the node name itself, never a global
//! value. Resolution is pure; an unknown node name simply resolves to the
//! global defaults.

use crate::options::{MeshOptions, NodeOptions};

/// Fully merged configuration for one node, immutable once computed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNodeConfig {
    pub node: String,
    pub hostname: String,
    pub auth_key: String,
    pub control_url: String,
    pub ephemeral: bool,
    pub web_ui: bool,
}

impl MeshOptions {
    fn node(&self, name: &str) -> Option<&NodeOptions> {
        self.nodes.get(name)
    }

    pub fn auth_key(&self, name: &str) -> &str {
        match self.node(name).and_then(|node| node.auth_key.as_deref()) {
            Some(key) if !key.is_empty() => key,
            _ => &self.auth_key,
        }
    }

    pub fn control_url(&self, name: &str) -> &str {
        match self.node(name).and_then(|node| node.control_url.as_deref()) {
            Some(url) if !url.is_empty() => url,
            _ => &self.control_url,
        }
    }

    pub fn ephemeral(&self, name: &str) -> bool {
        self.node(name)
            .and_then(|node| node.ephemeral)
            .unwrap_or(self.ephemeral)
    }

    pub fn web_ui(&self, name: &str) -> bool {
        self.node(name)
            .and_then(|node| node.web_ui)
            .unwrap_or(self.web_ui)
    }

    /// Hostname for a node; falls back to the node name, not to any global
    pub fn hostname<'a>(&'a self, name: &'a str) -> &'a str {
        match self.node(name).and_then(|node| node.hostname.as_deref()) {
            Some(hostname) if !hostname.is_empty() => hostname,
            _ => name,
        }
    }

    /// Materialize the full configuration for `name`
    pub fn resolve(&self, name: &str) -> ResolvedNodeConfig {
        ResolvedNodeConfig {
            node: name.to_string(),
            hostname: self.hostname(name).to_string(),
            auth_key: self.auth_key(name).to_string(),
            control_url: self.control_url(name).to_string(),
            ephemeral: self.ephemeral(name),
            web_ui: self.web_ui(name),
        }
    }
}
