use anyhow::{Context, Result};
use crossbeam_channel::bounded;
use social_vision::{
    FusionConfig, PersonDetection, SocialPipeline,
    pipeline::{FrameJob, NoFaceAnalyzer, PoseDetector, start_analyzer},
    types::{BodyPoint, Frame, Keypoint},
};

/// Stand-in for a real pose model: a presenter with raised hands and an audience facing them.
struct StagedMeeting {
    audience: usize,
}

impl PoseDetector for StagedMeeting {
    fn detect_people(&mut self, frame: &Frame) -> Result<Vec<PersonDetection>> {
        let floor = frame.height as i32;
        let mut people = vec![presenter(floor)];
        for seat in 0..self.audience {
            people.push(listener(seat as i64 + 1, 300 + seat as i32 * 150, floor));
        }
        Ok(people)
    }
}

fn presenter(floor: i32) -> PersonDetection {
    PersonDetection {
        id: 0,
        bbox: [50, floor - 400, 150, floor],
        keypoints: vec![
            Keypoint::new(BodyPoint::Nose, 110, floor - 350),
            Keypoint::new(BodyPoint::LeftEye, 95, floor - 350),
            Keypoint::new(BodyPoint::RightEye, 105, floor - 350),
            Keypoint::new(BodyPoint::LeftShoulder, 70, floor - 300),
            Keypoint::new(BodyPoint::RightShoulder, 130, floor - 300),
            Keypoint::new(BodyPoint::LeftWrist, 60, floor - 330),
            Keypoint::new(BodyPoint::RightWrist, 140, floor - 200),
            Keypoint::new(BodyPoint::LeftHip, 80, floor - 150),
            Keypoint::new(BodyPoint::RightHip, 120, floor - 150),
        ],
        mouth_open: None,
        face: None,
    }
}

fn listener(id: i64, cx: i32, floor: i32) -> PersonDetection {
    PersonDetection {
        id,
        bbox: [cx - 50, floor - 400, cx + 50, floor],
        keypoints: vec![
            Keypoint::new(BodyPoint::Nose, cx - 10, floor - 350),
            Keypoint::new(BodyPoint::LeftEye, cx - 5, floor - 350),
            Keypoint::new(BodyPoint::RightEye, cx + 5, floor - 350),
        ],
        mouth_open: None,
        face: None,
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let config_path = std::env::args().nth(1).map(std::path::PathBuf::from);
    let config = FusionConfig::load_or_default(config_path.as_deref())?;

    let (job_tx, job_rx) = bounded(4);
    let (report_tx, report_rx) = bounded(4);
    let worker = start_analyzer(
        SocialPipeline::new(&config),
        StagedMeeting { audience: 3 },
        NoFaceAnalyzer,
        job_rx,
        report_tx,
    );

    job_tx
        .send(FrameJob {
            frame_id: 0,
            frame: Frame::new(vec![0; 1280 * 720 * 4], 1280, 720),
        })
        .context("analyzer worker is gone")?;
    drop(job_tx);

    for analyzed in report_rx.iter() {
        let report = analyzed.outcome?;
        println!("frame {}:", analyzed.frame_id);
        for person in &report.people {
            println!("  {}", person.display_text());
        }
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    let _ = worker.join();
    Ok(())
}
