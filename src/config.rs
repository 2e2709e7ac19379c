use crate::annotate::AnnotationStyle;
use crate::session::SessionSettings;
use crate::tracking::TrackerKind;
use crate::transcode::Transcoder;
use crate::ui::KeyBindings;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub results_dir: PathBuf,
    pub recording_name: String,
    pub transcoded_name: String,
    pub tracker: TrackerKind,
    /// Frame rate of the recording, independent of the playback speed.
    pub output_fps: f64,
    pub video_extension: String,
    pub window_name: String,
    pub keys: KeyBindings,
    pub annotation: AnnotationStyle,
    pub transcoder: Transcoder,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("results"),
            recording_name: "tracked_cars.mp4".to_owned(),
            transcoded_name: "tracked_cars_h264.mp4".to_owned(),
            tracker: TrackerKind::Csrt,
            output_fps: 10.0,
            video_extension: "mp4".to_owned(),
            window_name: "MultiTracker".to_owned(),
            keys: KeyBindings::default(),
            annotation: AnnotationStyle::default(),
            transcoder: Transcoder::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open config {}", path.display()))?;
        let reader = std::io::BufReader::new(file);
        let config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Rejects settings the encoder cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.output_fps.is_finite() && self.output_fps > 0.0) {
            anyhow::bail!(
                "Output fps must be a positive number, got {}",
                self.output_fps
            );
        }
        Ok(())
    }

    pub fn recording_path(&self) -> PathBuf {
        self.results_dir.join(&self.recording_name)
    }

    pub fn transcoded_path(&self) -> PathBuf {
        self.results_dir.join(&self.transcoded_name)
    }

    pub fn create_results_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.results_dir).with_context(|| {
            format!(
                "Failed to create results folder {}",
                self.results_dir.display()
            )
        })
    }

    pub fn session_settings(&self, source: &Path) -> SessionSettings {
        SessionSettings {
            source: source.to_owned(),
            recording: self.recording_path(),
            fps: self.output_fps,
            style: self.annotation.clone(),
        }
    }
}
