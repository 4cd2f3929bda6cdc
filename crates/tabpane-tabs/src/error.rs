//! Tab error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabError {
    #[error("Host error: {0}")]
    Dom(#[from] tabpane_dom::DomError),

    #[error("Tab button has no key: {0}")]
    MissingKey(String),
}
