//! Gaze-target resolution.
//!
//! Each person's head direction is approximated by the vector from the midpoint of the eyes to
//! the nose. A person is looking at whoever sits closest to that direction, as long as they fall
//! inside the field-of-view cone. The resulting relation is directed: mutual, one-way and cyclic
//! links are all valid outcomes.
//!
//! Ties between candidates at exactly the same angle go to the person met first in registry
//! (detection) order. Detection order is not stable across images, so neither is the winner of
//! such a tie.

use std::collections::HashMap;

use crate::{
    config::GazeConfig,
    registry::{Person, PersonRegistry},
    types::{BodyPoint, PersonId},
};

#[derive(Clone, Debug, Default)]
pub struct GazeResolver {
    cfg: GazeConfig,
}

impl GazeResolver {
    pub fn new(cfg: GazeConfig) -> Self {
        Self { cfg }
    }

    /// Resolves every person's gaze target. Every person of the registry gets an entry.
    pub fn resolve(&self, registry: &PersonRegistry) -> HashMap<PersonId, Option<PersonId>> {
        let cone = self.cfg.cone_half_angle();
        let centers: Vec<(PersonId, [f32; 2])> = registry
            .iter()
            .map(|person| {
                let (x, y) = person.center();
                (person.id, [x, y])
            })
            .collect();

        let targets: HashMap<PersonId, Option<PersonId>> = centers
            .iter()
            .zip(registry.iter())
            .map(|(&(id, center), person)| {
                let target = gaze_vector(person)
                    .and_then(|gaze| best_target(id, center, gaze, &centers, cone));
                (id, target)
            })
            .collect();

        log::debug!(
            "gaze stage: {} of {} people resolved a target",
            targets.values().filter(|t| t.is_some()).count(),
            targets.len()
        );

        targets
    }
}

/// Gaze targets for the whole set with the default 30 degree cone.
pub fn resolve_gaze(registry: &PersonRegistry) -> HashMap<PersonId, Option<PersonId>> {
    GazeResolver::default().resolve(registry)
}

/// Unit eye-center-to-nose vector, `None` if a keypoint is missing or the vector is degenerate.
pub fn gaze_vector(person: &Person) -> Option<[f32; 2]> {
    let nose = person.keypoint(BodyPoint::Nose)?;
    let left_eye = person.keypoint(BodyPoint::LeftEye)?;
    let right_eye = person.keypoint(BodyPoint::RightEye)?;

    let eye_center = [
        (left_eye.0 + right_eye.0) / 2.0,
        (left_eye.1 + right_eye.1) / 2.0,
    ];
    normalize(sub([nose.0, nose.1], eye_center))
}

fn best_target(
    looker: PersonId,
    origin: [f32; 2],
    gaze: [f32; 2],
    centers: &[(PersonId, [f32; 2])],
    cone: f32,
) -> Option<PersonId> {
    let mut best: Option<(PersonId, f32)> = None;

    for &(candidate, center) in centers {
        if candidate == looker {
            continue;
        }
        let Some(direction) = normalize(sub(center, origin)) else {
            continue;
        };

        let angle = dot(gaze, direction).clamp(-1.0, 1.0).acos();
        if angle >= cone {
            continue;
        }
        // Strict comparison keeps the earlier candidate on exact ties.
        if best.is_none_or(|(_, best_angle)| angle < best_angle) {
            best = Some((candidate, angle));
        }
    }

    best.map(|(id, _)| id)
}

fn sub(a: [f32; 2], b: [f32; 2]) -> [f32; 2] {
    [a[0] - b[0], a[1] - b[1]]
}

fn dot(a: [f32; 2], b: [f32; 2]) -> f32 {
    a[0] * b[0] + a[1] * b[1]
}

fn normalize(v: [f32; 2]) -> Option<[f32; 2]> {
    let len = (v[0] * v[0] + v[1] * v[1]).sqrt();
    if len <= f32::EPSILON {
        None
    } else {
        Some([v[0] / len, v[1] / len])
    }
}
