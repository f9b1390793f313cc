//! Router collaborator interface
//!
//! The router owns the routing table and default name resolution. Outbound
//! adapters only consume the resolution side: turning a domain name into an
//! ordered list of candidate addresses.

use crate::context::Context;
use async_trait::async_trait;
use std::io;
use std::net::IpAddr;
use thiserror::Error;

/// Name resolution errors surfaced by the router
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("domain not found: {0}")]
    NotFound(String),

    #[error("resolver IO error: {0}")]
    Io(#[from] io::Error),

    #[error("resolver error: {0}")]
    Other(String),
}

/// Routing and default-resolution service provided by the framework
#[async_trait]
pub trait Router: Send + Sync {
    /// Resolve `domain` into candidate addresses using the default strategy.
    ///
    /// The returned order is the order dial attempts are made in.
    async fn lookup_default(&self, ctx: &Context, domain: &str)
        -> Result<Vec<IpAddr>, ResolveError>;
}
