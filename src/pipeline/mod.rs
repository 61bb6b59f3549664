pub mod engine;
pub mod worker;

use std::collections::HashMap;

use anyhow::Context;

use crate::{
    config::FusionConfig,
    error::FusionResult,
    expression::MouthEstimator,
    gaze::GazeResolver,
    gesture::GestureEstimator,
    registry::PersonRegistry,
    social,
    types::{Frame, PersonDetection, PersonId, SceneReport},
};

// Re-exports for convenience
pub use engine::{FaceAnalyzer, NoFaceAnalyzer, PoseDetector, RecordedDetections};
pub use worker::{AnalyzedFrame, FrameJob, analyze_batch, start_analyzer};

/// Runs mouth, gesture, gaze and role stages over one scene.
///
/// The pipeline holds configuration only. Every call builds its own registry, so one pipeline
/// can serve concurrent runs as long as each run brings its own detectors.
#[derive(Clone, Debug, Default)]
pub struct SocialPipeline {
    mouth: MouthEstimator,
    gesture: GestureEstimator,
    gaze: GazeResolver,
}

impl SocialPipeline {
    pub fn new(cfg: &FusionConfig) -> Self {
        Self {
            mouth: MouthEstimator::new(cfg.expression.clone()),
            gesture: GestureEstimator::new(cfg.gesture.clone()),
            gaze: GazeResolver::new(cfg.gaze.clone()),
        }
    }

    /// Detects people and faces with the caller's detectors, then analyzes the scene.
    pub fn run<P, F>(
        &self,
        pose: &mut P,
        faces: &mut F,
        frame: &Frame,
    ) -> anyhow::Result<SceneReport>
    where
        P: PoseDetector,
        F: FaceAnalyzer,
    {
        let mut detections = pose
            .detect_people(frame)
            .context("person detection failed")?;

        for detection in detections.iter_mut().filter(|d| d.face.is_none()) {
            detection.face = faces
                .analyze_face(frame, detection)
                .with_context(|| format!("face analysis failed for person {}", detection.id))?;
        }

        let report = self.analyze(detections)?;
        Ok(report)
    }

    /// Analyzes detections already produced by the upstream collaborators.
    pub fn analyze(&self, detections: Vec<PersonDetection>) -> FusionResult<SceneReport> {
        let mut registry = PersonRegistry::from_detections(detections)?;
        self.annotate(&mut registry)?;

        let report = registry.into_report();
        log::info!(
            "analyzed scene with {} people, {} speaking",
            report.people.len(),
            report.speakers().count()
        );
        Ok(report)
    }

    /// Fills every feature of the registry; each stage completes before the next reads it.
    pub fn annotate(&self, registry: &mut PersonRegistry) -> FusionResult<()> {
        let mouths: HashMap<PersonId, bool> = registry
            .iter()
            .map(|person| (person.id, self.mouth.resolve(person)))
            .collect();
        registry.apply(&mouths, |features, &open| features.mouth_open = open)?;

        let gestures = self.gesture.estimate_all(registry);
        registry.apply(&gestures, |features, &gesturing| features.gesturing = gesturing)?;

        let targets = self.gaze.resolve(registry);
        registry.apply(&targets, |features, &target| features.looking_at = target)?;

        let roles = social::classify(registry)?;
        registry.apply(&roles, |features, &role| features.role = role)?;

        Ok(())
    }
}
