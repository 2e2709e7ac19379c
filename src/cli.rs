use crate::tracking::TrackerKind;
use clap::Parser;
use std::path::PathBuf;

/// Interactive multi-object tracking on recorded videos
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineArguments {
    /// Open this video instead of asking for one
    #[arg(short, long)]
    pub video: Option<PathBuf>,
    /// Directory to list videos from
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,
    /// Path to configuration json
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Write the effective configuration to this path
    #[arg(long)]
    pub save_config: Option<PathBuf>,
    /// Tracking algorithm
    #[arg(long, value_enum)]
    pub tracker: Option<TrackerKind>,
    /// Output folder for the recorded videos
    #[arg(long)]
    pub results_dir: Option<PathBuf>,
    /// Frame rate of the recorded video
    #[arg(long)]
    pub fps: Option<f64>,
    /// Skip re-encoding the recording
    #[arg(long)]
    pub no_transcode: bool,
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value_t = log::LevelFilter::Info)]
    pub log_level: log::LevelFilter,
}

impl CommandLineArguments {
    pub fn apply(&self, config: &mut crate::config::Config) {
        if let Some(tracker) = self.tracker {
            config.tracker = tracker;
        }
        if let Some(results_dir) = &self.results_dir {
            config.results_dir = results_dir.clone();
        }
        if let Some(fps) = self.fps {
            config.output_fps = fps;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn overrides_config() {
        let args = CommandLineArguments::parse_from([
            "multitrack",
            "--tracker",
            "kcf",
            "--fps",
            "30",
            "--results-dir",
            "out",
            "--log-level",
            "debug",
        ]);
        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(config.tracker, TrackerKind::Kcf);
        assert_eq!(config.output_fps, 30.0);
        assert_eq!(config.results_dir, PathBuf::from("out"));
        assert_eq!(args.log_level, log::LevelFilter::Debug);
        assert!(!args.no_transcode);
        assert_eq!(args.dir, PathBuf::from("."));
    }

    #[test]
    fn invalid_fps_fails_validation() {
        for fps in ["NaN", "0", "-1"] {
            let flag = format!("--fps={fps}");
            let args = CommandLineArguments::parse_from(["multitrack", flag.as_str()]);
            let mut config = Config::default();
            args.apply(&mut config);
            assert!(config.validate().is_err(), "--fps {fps} accepted");
        }
    }
}
