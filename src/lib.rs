pub mod annotate;
pub mod cli;
pub mod config;
pub mod error;
pub mod frame;
pub mod logger;
pub mod picker;
pub mod session;
pub mod tracking;
pub mod transcode;
pub mod ui;
pub mod util;
pub mod video;

pub use annotate::{AnnotationStyle, Annotator, Stroke};
pub use cli::CommandLineArguments;
pub use config::Config;
pub use error::SessionError;
pub use frame::{BoundingBox, Frame, Region};
pub use session::{SessionLoop, SessionReport, SessionSettings, SessionState, StopReason};
pub use tracking::{
    ObjectId, TrackOutcome, TrackResult, TrackedObject, Tracker, TrackerFactory, TrackerKind,
    TrackerPool,
};
pub use transcode::{TranscodeError, Transcoder};
pub use ui::{Interaction, KeyBindings, Signal};
pub use video::{EncoderSettings, VideoInfo, VideoSink, VideoSource};
