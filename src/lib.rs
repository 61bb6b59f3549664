//! Speaking / listening role inference for the people of a single still image.
//!
//! People, faces and facial landmarks come from external detectors. This crate fuses the
//! signals they expose (raised hands, open mouth, head direction) into a social role per person.

pub mod config;
pub mod error;
pub mod expression;
pub mod gaze;
pub mod gesture;
pub mod pipeline;
pub mod registry;
pub mod scene;
pub mod social;
pub mod types;

pub use config::FusionConfig;
pub use error::{FusionError, FusionResult};
pub use gaze::resolve_gaze;
pub use gesture::estimate_gesture;
pub use pipeline::SocialPipeline;
pub use registry::{Person, PersonRegistry};
pub use social::classify;
pub use types::{PersonDetection, PersonReport, SceneReport, SocialRole};
