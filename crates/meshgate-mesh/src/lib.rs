//! Mesh-node session management for meshgate
//!
//! Resolves layered per-node configuration, owns the long-lived session
//! handle for each node name, and exposes the dial/listen capability those
//! sessions provide. The mesh implementation itself is external and plugs in
//! through the [`session::SessionFactory`] seam.

pub mod error;
pub mod node;
pub mod options;
pub mod registry;
pub mod resolve;
pub mod session;

pub use error::NodeError;
pub use node::{NodeHandle, NodeState};
pub use options::{DialerOptions, MeshOptions, MeshOutboundOptions, NodeOptions, ServerOptions};
pub use registry::NodeRegistry;
pub use resolve::ResolvedNodeConfig;
pub use session::{MeshSession, SessionError, SessionFactory};
