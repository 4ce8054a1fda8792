use thiserror::Error;

use crate::{ComponentId, ComponentKind};

pub type Result<T> = std::result::Result<T, FleetError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FleetError {
    #[error("machine index {0} not found")]
    MachineNotFound(usize),
    #[error("component {0} not found")]
    ComponentNotFound(ComponentId),
    /// The catalog has no entry for a kind. Validated catalogs never hit this.
    #[error("fault catalog has no entry for {0}")]
    UnknownKind(ComponentKind),
    #[error("invalid content: {0}")]
    InvalidContent(String),
}
