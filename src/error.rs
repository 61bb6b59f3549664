//! Error types for the fusion pipeline.
//!
//! Missing keypoints and degenerate geometry are never errors; the stages fall back to safe
//! defaults. Only structural contract violations from upstream collaborators end up here.

use thiserror::Error;

use crate::types::PersonId;

/// Result type for fusion operations.
pub type FusionResult<T> = Result<T, FusionError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FusionError {
    #[error("duplicate person id {0} in one scene")]
    DuplicatePersonId(PersonId),

    #[error("person {person} looks at unknown person {target}")]
    UnknownGazeTarget { person: PersonId, target: PersonId },

    #[error("person {0} is recorded as looking at itself")]
    SelfGaze(PersonId),

    #[error("person {id} has malformed bounding box {bbox:?}")]
    InvalidBoundingBox { id: PersonId, bbox: [i32; 4] },

    #[error("person {0} is missing from the registry")]
    UnknownPerson(PersonId),
}

impl FusionError {
    /// True for violations of the upstream collaborator contract.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            FusionError::DuplicatePersonId(_)
                | FusionError::UnknownGazeTarget { .. }
                | FusionError::SelfGaze(_)
                | FusionError::InvalidBoundingBox { .. }
        )
    }
}
