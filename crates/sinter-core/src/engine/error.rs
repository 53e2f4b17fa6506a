use thiserror::Error;

use crate::core::io::checkpoint::CheckpointError;
use crate::core::models::ids::{BondTypeId, ParticleId};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Bond type {0} has no registered coefficients")]
    UninitializedType(BondTypeId),

    #[error("Particle {0:?} referenced by a bond is missing from the system")]
    ParticleNotFound(ParticleId),

    #[error("Bond index {index} is out of range for a store of {len} bonds")]
    BondIndexOutOfRange { index: usize, len: usize },

    #[error("Invalid timestep {0}: must be positive and finite")]
    InvalidTimestep(f64),

    #[error("Checkpoint error: {source}")]
    Checkpoint {
        #[from]
        source: CheckpointError,
    },
}
