use std::{collections::VecDeque, path::PathBuf};

use anyhow::{Result, anyhow};

use crate::{
    scene,
    types::{FaceObservation, Frame, PersonDetection},
};

/// Person + pose detector owned by the caller and handed to each pipeline run.
pub trait PoseDetector: Send + 'static {
    fn detect_people(&mut self, frame: &Frame) -> Result<Vec<PersonDetection>>;
}

/// Face / expression analyzer owned by the caller and handed to each pipeline run.
pub trait FaceAnalyzer: Send + 'static {
    fn analyze_face(
        &mut self,
        frame: &Frame,
        person: &PersonDetection,
    ) -> Result<Option<FaceObservation>>;
}

/// Face analyzer for setups without a face model; every mouth counts as closed.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFaceAnalyzer;

impl FaceAnalyzer for NoFaceAnalyzer {
    fn analyze_face(
        &mut self,
        _frame: &Frame,
        _person: &PersonDetection,
    ) -> Result<Option<FaceObservation>> {
        Ok(None)
    }
}

/// Replays detections captured offline, one scene per frame, in order.
#[derive(Clone, Debug, Default)]
pub struct RecordedDetections {
    scenes: VecDeque<Vec<PersonDetection>>,
}

impl RecordedDetections {
    pub fn new(scenes: impl IntoIterator<Item = Vec<PersonDetection>>) -> Self {
        Self {
            scenes: scenes.into_iter().collect(),
        }
    }

    pub fn from_files(paths: &[PathBuf]) -> Result<Self> {
        let scenes = paths
            .iter()
            .map(|path| scene::load_scene(path))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(scenes))
    }

    pub fn remaining(&self) -> usize {
        self.scenes.len()
    }
}

impl PoseDetector for RecordedDetections {
    fn detect_people(&mut self, _frame: &Frame) -> Result<Vec<PersonDetection>> {
        self.scenes
            .pop_front()
            .ok_or_else(|| anyhow!("no recorded scene left to replay"))
    }
}
