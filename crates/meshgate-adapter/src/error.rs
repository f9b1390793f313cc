//! Adapter-facing error types

use crate::router::ResolveError;
use std::fmt;
use std::io;
use std::net::IpAddr;
use thiserror::Error;

/// Adapter construction and lifecycle errors
#[derive(Debug, Error)]
pub enum AdapterError {
    /// A required shared service was not registered on the context.
    /// This is a configuration error and fails adapter construction.
    #[error("missing {0} service in context")]
    MissingService(&'static str),

    #[error("lifecycle error: {0}")]
    Lifecycle(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl AdapterError {
    pub fn lifecycle(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        AdapterError::Lifecycle(Box::new(err))
    }
}

/// Dial and packet-listen errors
#[derive(Debug, Error)]
pub enum DialError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("no addresses resolved for {0}")]
    NoAddresses(String),

    #[error(transparent)]
    AllAttemptsFailed(#[from] SerialAttemptsError),

    #[error("connection cancelled")]
    Cancelled,
}

/// Aggregated failure of a serial attempt loop
///
/// Keeps every candidate address together with the error it produced, in
/// attempt order. Only surfaced when no candidate succeeded.
#[derive(Debug)]
pub struct SerialAttemptsError {
    pub attempts: Vec<(IpAddr, io::Error)>,
}

impl fmt::Display for SerialAttemptsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "all {} connection attempts failed", self.attempts.len())?;
        for (addr, err) in &self.attempts {
            write!(f, "; {}: {}", addr, err)?;
        }
        Ok(())
    }
}

impl std::error::Error for SerialAttemptsError {}
