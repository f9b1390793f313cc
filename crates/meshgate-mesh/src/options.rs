//! Mesh configuration schema
//!
//! `MeshOptions` is the framework-level section: global session defaults plus
//! per-node overrides keyed by node name. `MeshOutboundOptions` configures one
//! outbound adapter instance and references a node by name.

use meshgate_adapter::Network;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Global mesh session defaults and per-node overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeshOptions {
    /// Default authentication key for nodes without an override
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub auth_key: String,

    /// Default control-plane URL for nodes without an override
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub control_url: String,

    /// Whether sessions register as ephemeral by default
    #[serde(default)]
    pub ephemeral: bool,

    /// Whether sessions expose the web UI by default
    #[serde(default)]
    pub web_ui: bool,

    /// Per-node overrides, keyed by node name
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub nodes: HashMap<String, NodeOptions>,
}

/// Overrides for a single named node; unset fields fall through to the
/// global defaults, `hostname` falls through to the node name itself
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ephemeral: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_ui: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

/// Options for one mesh outbound adapter instance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeshOutboundOptions {
    /// Name of the node this outbound dials through
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub node: String,

    /// Networks served; empty means both tcp and udp
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub network: Vec<Network>,

    #[serde(flatten)]
    pub dialer: DialerOptions,

    #[serde(flatten)]
    pub server: ServerOptions,
}

/// Generic dialer options shared by outbound adapters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialerOptions {
    /// Per-connection timeout for literal-address dials, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout_sec: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_interface: Option<String>,
}

impl DialerOptions {
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_sec.map(Duration::from_secs)
    }
}

/// Generic server options shared by outbound adapters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_port: Option<u16>,
}
