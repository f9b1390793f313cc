//! Node lifecycle errors

use crate::session::SessionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("node {0} is closed")]
    Closed(String),

    #[error(transparent)]
    Session(#[from] SessionError),
}
