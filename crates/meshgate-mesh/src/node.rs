//! Long-lived node handle wrapping one mesh session

use crate::error::NodeError;
use crate::session::MeshSession;
use async_trait::async_trait;
use meshgate_adapter::{Conn, Context, Destination, Dialer, Network, PacketConn};
use std::io;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Lifecycle state of a node handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Config resolved and session allocated, not yet started
    Created,
    /// Session established, usable for dial/listen
    Started,
    /// Terminal; further dial/listen operations fail
    Closed,
}

/// Handle for one named node, shared by every outbound bound to that name
///
/// Owned by the `NodeRegistry`; outbounds hold non-owning `Arc` references.
/// Because the handle is shared, closing it affects every outbound bound to
/// the same node name.
pub struct NodeHandle {
    name: String,
    session: Arc<dyn MeshSession>,
    state: RwLock<NodeState>,
}

impl NodeHandle {
    pub fn new(name: impl Into<String>, session: Arc<dyn MeshSession>) -> Self {
        Self {
            name: name.into(),
            session,
            state: RwLock::new(NodeState::Created),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn state(&self) -> NodeState {
        *self.state.read().await
    }

    /// Establish the underlying session. Idempotent: already started is a
    /// successful no-op, and the session's own `start` runs at most once.
    pub async fn start(&self) -> Result<(), NodeError> {
        let mut state = self.state.write().await;
        match *state {
            NodeState::Started => Ok(()),
            NodeState::Closed => Err(NodeError::Closed(self.name.clone())),
            NodeState::Created => {
                debug!(node = %self.name, "starting mesh session");
                self.session.start().await?;
                *state = NodeState::Started;
                Ok(())
            }
        }
    }

    /// Close the underlying session from any state. Idempotent: the second
    /// call is a no-op and the session's own `close` runs at most once.
    pub async fn close(&self) -> Result<(), NodeError> {
        let mut state = self.state.write().await;
        if *state == NodeState::Closed {
            return Ok(());
        }
        *state = NodeState::Closed;
        debug!(node = %self.name, "closing mesh session");
        self.session.close().await?;
        Ok(())
    }
}

#[async_trait]
impl Dialer for NodeHandle {
    async fn dial(
        &self,
        _ctx: &Context,
        network: Network,
        destination: &Destination,
    ) -> io::Result<Conn> {
        if *self.state.read().await == NodeState::Closed {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                format!("node {} is closed", self.name),
            ));
        }
        debug!(node = %self.name, network = %network, destination = %destination, "session dial");
        self.session.dial(network, &destination.to_string()).await
    }

    async fn listen_packet(
        &self,
        _ctx: &Context,
        destination: &Destination,
    ) -> io::Result<Box<dyn PacketConn>> {
        if *self.state.read().await == NodeState::Closed {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                format!("node {} is closed", self.name),
            ));
        }
        debug!(node = %self.name, destination = %destination, "session listen packet");
        self.session.listen_packet(&destination.to_string()).await
    }
}
