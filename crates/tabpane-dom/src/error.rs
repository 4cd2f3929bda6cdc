//! Host error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomError {
    #[error("Unknown node: {0}")]
    UnknownNode(usize),

    #[error("Host call failed: {0}")]
    Host(String),
}
