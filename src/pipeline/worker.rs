use std::thread;

use crossbeam_channel::{Receiver, Sender};
use rayon::prelude::*;

use super::{FaceAnalyzer, PoseDetector, SocialPipeline};
use crate::{
    error::FusionResult,
    types::{Frame, PersonDetection, SceneReport},
};

pub struct FrameJob {
    pub frame_id: u64,
    pub frame: Frame,
}

pub struct AnalyzedFrame {
    pub frame_id: u64,
    pub outcome: anyhow::Result<SceneReport>,
}

/// Analyzes independent scenes in parallel. Results keep the input order.
pub fn analyze_batch(
    pipeline: &SocialPipeline,
    scenes: Vec<Vec<PersonDetection>>,
) -> Vec<FusionResult<SceneReport>> {
    scenes
        .into_par_iter()
        .map(|detections| pipeline.analyze(detections))
        .collect()
}

/// Spawns a worker that analyzes every received frame with detectors it owns.
///
/// Still images are never dropped, unlike a live camera feed. The worker stops once the job
/// sender is dropped or the report receiver goes away.
pub fn start_analyzer<P, F>(
    pipeline: SocialPipeline,
    mut pose: P,
    mut faces: F,
    job_rx: Receiver<FrameJob>,
    report_tx: Sender<AnalyzedFrame>,
) -> thread::JoinHandle<()>
where
    P: PoseDetector,
    F: FaceAnalyzer,
{
    thread::spawn(move || {
        log::info!("social analyzer worker started");

        while let Ok(job) = job_rx.recv() {
            log::debug!(
                "frame {} waited {:?} before analysis",
                job.frame_id,
                job.frame.timestamp.elapsed()
            );

            let outcome = pipeline.run(&mut pose, &mut faces, &job.frame);
            if let Err(err) = &outcome {
                log::warn!("scene analysis failed for frame {}: {err:?}", job.frame_id);
            }

            let analyzed = AnalyzedFrame {
                frame_id: job.frame_id,
                outcome,
            };
            if report_tx.send(analyzed).is_err() {
                log::debug!("report receiver dropped, stopping analyzer");
                break;
            }
        }

        log::info!("social analyzer worker stopped");
    })
}
