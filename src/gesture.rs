use std::collections::HashMap;

use crate::{
    config::GestureConfig,
    registry::{Person, PersonRegistry},
    types::{BodyPoint, PersonId},
};

/// Raised-hand heuristic over the upper-body keypoints.
#[derive(Clone, Debug, Default)]
pub struct GestureEstimator {
    cfg: GestureConfig,
}

struct TorsoLines {
    shoulder: f32,
    hip: f32,
    left_wrist: f32,
    right_wrist: f32,
}

impl GestureEstimator {
    pub fn new(cfg: GestureConfig) -> Self {
        Self { cfg }
    }

    pub fn estimate(&self, person: &Person) -> bool {
        let Some(torso) = torso_lines(person) else {
            return false;
        };

        // Image y grows downwards, so "above" means a smaller y.
        let hip_threshold = torso.hip - (torso.hip - torso.shoulder) * self.cfg.hip_bias;

        torso.left_wrist < torso.shoulder
            || torso.right_wrist < torso.shoulder
            || torso.left_wrist < hip_threshold
    }

    pub fn estimate_all(&self, registry: &PersonRegistry) -> HashMap<PersonId, bool> {
        let flags: HashMap<PersonId, bool> = registry
            .iter()
            .map(|person| (person.id, self.estimate(person)))
            .collect();

        log::debug!(
            "gesture stage: {} of {} people gesturing",
            flags.values().filter(|&&g| g).count(),
            flags.len()
        );

        flags
    }
}

/// Gesture flag with the default torso bias.
pub fn estimate_gesture(person: &Person) -> bool {
    GestureEstimator::default().estimate(person)
}

fn torso_lines(person: &Person) -> Option<TorsoLines> {
    let y = |point: BodyPoint| person.keypoint(point).map(|(_, y)| y);

    let left_shoulder = y(BodyPoint::LeftShoulder)?;
    let right_shoulder = y(BodyPoint::RightShoulder)?;
    let left_wrist = y(BodyPoint::LeftWrist)?;
    let right_wrist = y(BodyPoint::RightWrist)?;
    let left_hip = y(BodyPoint::LeftHip)?;
    let right_hip = y(BodyPoint::RightHip)?;

    Some(TorsoLines {
        shoulder: (left_shoulder + right_shoulder) / 2.0,
        hip: (left_hip + right_hip) / 2.0,
        left_wrist,
        right_wrist,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Shoulders at y=100, hips at y=300: hip threshold sits at y=260.
    fn upper_body(left_wrist_y: i32, right_wrist_y: i32) -> Person {
        Person::new(0, [0, 0, 200, 400])
            .with_keypoint(BodyPoint::LeftShoulder, 60, 100)
            .with_keypoint(BodyPoint::RightShoulder, 140, 100)
            .with_keypoint(BodyPoint::LeftHip, 70, 300)
            .with_keypoint(BodyPoint::RightHip, 130, 300)
            .with_keypoint(BodyPoint::LeftWrist, 50, left_wrist_y)
            .with_keypoint(BodyPoint::RightWrist, 150, right_wrist_y)
    }

    #[test]
    fn no_keypoints_is_not_gesturing() {
        assert!(!estimate_gesture(&Person::new(0, [0, 0, 10, 10])));
    }

    #[test]
    fn any_missing_required_keypoint_is_not_gesturing() {
        // Both wrists raised, but the right hip is missing.
        let person = Person::new(0, [0, 0, 200, 400])
            .with_keypoint(BodyPoint::LeftShoulder, 60, 100)
            .with_keypoint(BodyPoint::RightShoulder, 140, 100)
            .with_keypoint(BodyPoint::LeftHip, 70, 300)
            .with_keypoint(BodyPoint::LeftWrist, 50, 20)
            .with_keypoint(BodyPoint::RightWrist, 150, 20);
        assert!(!estimate_gesture(&person));
    }

    #[test]
    fn both_wrists_above_shoulders() {
        assert!(estimate_gesture(&upper_body(50, 60)));
    }

    #[test]
    fn right_wrist_alone_above_shoulders() {
        assert!(estimate_gesture(&upper_body(350, 99)));
    }

    #[test]
    fn hands_resting_below_hips() {
        assert!(!estimate_gesture(&upper_body(350, 340)));
    }

    #[test]
    fn left_wrist_above_hip_threshold() {
        assert!(estimate_gesture(&upper_body(259, 340)));
    }

    #[test]
    fn right_wrist_is_not_checked_against_hip_threshold() {
        assert!(!estimate_gesture(&upper_body(340, 259)));
    }

    #[test]
    fn equal_heights_are_not_gesturing() {
        assert!(!estimate_gesture(&upper_body(260, 100)));
    }

    #[test]
    fn bias_is_configurable() {
        let estimator = GestureEstimator::new(GestureConfig { hip_bias: 0.5 });
        // Threshold moves up to y=200.
        assert!(!estimator.estimate(&upper_body(250, 340)));
        assert!(estimator.estimate(&upper_body(199, 340)));
    }
}
