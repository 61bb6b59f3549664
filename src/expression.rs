use crate::{config::ExpressionConfig, registry::Person};

const UPPER_LIP: usize = 13;
const LOWER_LIP: usize = 14;
const MOUTH_LEFT_CORNER: usize = 61;
const MOUTH_RIGHT_CORNER: usize = 291;

/// Mouth-openness estimate from face-mesh lip landmarks.
#[derive(Clone, Debug, Default)]
pub struct MouthEstimator {
    cfg: ExpressionConfig,
}

impl MouthEstimator {
    pub fn new(cfg: ExpressionConfig) -> Self {
        Self { cfg }
    }

    /// Explicit flag from the face collaborator first, then the mesh estimate, else closed.
    pub fn resolve(&self, person: &Person) -> bool {
        if let Some(flag) = person.reported_mouth_open() {
            return flag;
        }

        person
            .face
            .as_ref()
            .and_then(|face| face.landmarks.as_deref())
            .map(|mesh| self.is_open(mesh))
            .unwrap_or(false)
    }

    pub fn is_open(&self, mesh: &[(f32, f32)]) -> bool {
        mouth_ratio(mesh).is_some_and(|ratio| ratio > self.cfg.mouth_open_ratio)
    }
}

/// Lip gap over mouth width, `None` when the lip landmarks are missing or the width collapses.
pub fn mouth_ratio(mesh: &[(f32, f32)]) -> Option<f32> {
    let upper = mesh.get(UPPER_LIP)?;
    let lower = mesh.get(LOWER_LIP)?;
    let left = mesh.get(MOUTH_LEFT_CORNER)?;
    let right = mesh.get(MOUTH_RIGHT_CORNER)?;

    let vertical = (upper.1 - lower.1).abs();
    let horizontal = ((left.0 - right.0).powi(2) + (left.1 - right.1).powi(2)).sqrt();

    if horizontal > 0.0 {
        Some(vertical / horizontal)
    } else {
        None
    }
}
