pub use crate::{
    error::{BatchError, ToolError},
    job::{JobKind, JobSpec},
    orchestrator::Orchestrator,
    report::{BatchReport, ItemOutcome},
    scene::{discover_scenes, MediaItem},
    transcoder::{DryRun, Ffmpeg, Transcoder},
};

pub mod error;
pub mod job;
pub mod manifest;
pub mod orchestrator;
pub mod report;
pub mod scene;
pub mod transcoder;
