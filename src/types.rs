use std::time::Instant;

use serde::{Deserialize, Serialize};

pub type PersonId = i64;

/// In-memory still image handed to the detection collaborators.
#[derive(Clone, Debug)]
pub struct Frame {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub timestamp: Instant,
}

impl Frame {
    pub fn new(rgba: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            rgba,
            width,
            height,
            timestamp: Instant::now(),
        }
    }
}

/// Anatomical keypoint indices produced by the pose collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyPoint {
    Nose,
    LeftEye,
    RightEye,
    LeftShoulder,
    RightShoulder,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
}

impl BodyPoint {
    pub fn index(&self) -> u32 {
        match self {
            BodyPoint::Nose => 0,
            BodyPoint::LeftEye => 1,
            BodyPoint::RightEye => 2,
            BodyPoint::LeftShoulder => 5,
            BodyPoint::RightShoulder => 6,
            BodyPoint::LeftWrist => 9,
            BodyPoint::RightWrist => 10,
            BodyPoint::LeftHip => 11,
            BodyPoint::RightHip => 12,
        }
    }

    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(BodyPoint::Nose),
            1 => Some(BodyPoint::LeftEye),
            2 => Some(BodyPoint::RightEye),
            5 => Some(BodyPoint::LeftShoulder),
            6 => Some(BodyPoint::RightShoulder),
            9 => Some(BodyPoint::LeftWrist),
            10 => Some(BodyPoint::RightWrist),
            11 => Some(BodyPoint::LeftHip),
            12 => Some(BodyPoint::RightHip),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BodyPoint::Nose => "nose",
            BodyPoint::LeftEye => "left eye",
            BodyPoint::RightEye => "right eye",
            BodyPoint::LeftShoulder => "left shoulder",
            BodyPoint::RightShoulder => "right shoulder",
            BodyPoint::LeftWrist => "left wrist",
            BodyPoint::RightWrist => "right wrist",
            BodyPoint::LeftHip => "left hip",
            BodyPoint::RightHip => "right hip",
        }
    }
}

/// One `{point_id, x, y}` entry as emitted by the pose collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keypoint {
    pub point_id: u32,
    pub x: i32,
    pub y: i32,
}

impl Keypoint {
    pub fn new(point: BodyPoint, x: i32, y: i32) -> Self {
        Self {
            point_id: point.index(),
            x,
            y,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x as f32, self.y as f32)
    }
}

/// Face attached to a person by the face collaborator.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceObservation {
    pub face_bbox: [i32; 4],
    /// Face-mesh landmarks normalized to the face box, indexed by mesh point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmarks: Option<Vec<(f32, f32)>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mouth_open: Option<bool>,
}

/// Raw person record as delivered by the pose (and optionally face) collaborators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersonDetection {
    pub id: PersonId,
    pub bbox: [i32; 4],
    #[serde(default)]
    pub keypoints: Vec<Keypoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mouth_open: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face: Option<FaceObservation>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocialRole {
    Speaking,
    Listening,
    #[default]
    Undetermined,
}

impl SocialRole {
    pub fn label(&self) -> &'static str {
        match self {
            SocialRole::Speaking => "Speaking",
            SocialRole::Listening => "Listening",
            SocialRole::Undetermined => "Undetermined",
        }
    }
}

/// Features derived for one person, filled stage by stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Features {
    pub mouth_open: bool,
    pub gesturing: bool,
    pub looking_at: Option<PersonId>,
    pub role: SocialRole,
}

/// Final per-person output record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersonReport {
    pub id: PersonId,
    pub bbox: [i32; 4],
    #[serde(default)]
    pub keypoints: Vec<Keypoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face: Option<FaceObservation>,
    pub mouth_open: bool,
    pub gesturing: bool,
    #[serde(default)]
    pub looking_at: Option<PersonId>,
    pub role: SocialRole,
}

impl PersonReport {
    pub fn display_text(&self) -> String {
        match self.looking_at {
            Some(target) => format!(
                "person {} -> {} (looking at {}, gesturing: {}, mouth open: {})",
                self.id,
                self.role.label(),
                target,
                self.gesturing,
                self.mouth_open
            ),
            None => format!(
                "person {} -> {} (no gaze target, gesturing: {}, mouth open: {})",
                self.id,
                self.role.label(),
                self.gesturing,
                self.mouth_open
            ),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneReport {
    pub people: Vec<PersonReport>,
}

impl SceneReport {
    pub fn speakers(&self) -> impl Iterator<Item = &PersonReport> {
        self.people
            .iter()
            .filter(|p| p.role == SocialRole::Speaking)
    }
}
