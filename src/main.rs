use anyhow::Result;
use clap::Parser;
use multitrack::logger::Logger;
use multitrack::tracking::OpenCvTrackerFactory;
use multitrack::ui::HighguiInteraction;
use multitrack::util::framenumber_to_hhmmss;
use multitrack::video::{VideoDecoder, VideoEncoder};
use multitrack::{picker, CommandLineArguments, Config, SessionLoop, StopReason};
use std::path::PathBuf;

fn main() -> Result<()> {
    let args = CommandLineArguments::parse();
    Logger::init(args.log_level)?;

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    args.apply(&mut config);
    config.validate()?;
    if let Some(path) = &args.save_config {
        config.save(path)?;
        log::info!("Saved configuration to {}", path.display());
    }
    config.create_results_dir()?;

    let video = match &args.video {
        Some(video) => video.clone(),
        None => select_video(&args.dir, &config.video_extension)?,
    };
    log::info!("Using video file: {}", video.display());

    let source = VideoDecoder::open(&video)?;
    let ui = HighguiInteraction::new(&config.window_name, config.keys);
    let factory = Box::new(OpenCvTrackerFactory::new(config.tracker));
    log::info!("Tracking with {}", config.tracker);
    let session = SessionLoop::new(
        source,
        ui,
        factory,
        VideoEncoder::new,
        config.session_settings(&video),
    );
    let report = session.run()?;

    if report.stop_reason == StopReason::NoRegionsSelected {
        return Ok(());
    }
    log::info!(
        "Processed {} frames ({} of footage at {} fps), {} object(s) tracked, {} lost at the end",
        report.frames_written,
        framenumber_to_hhmmss(report.frames_written, config.output_fps),
        config.output_fps,
        report.tracked_objects,
        report.lost_objects
    );

    if args.no_transcode {
        return Ok(());
    }
    if let Some(recording) = &report.recording {
        let output = config.transcoded_path();
        match config.transcoder.run(recording, &output) {
            Ok(()) => log::info!("Video conversion successful: {}", output.display()),
            Err(e) => log::error!("Error during video conversion: {}", e),
        }
    }
    Ok(())
}

fn select_video(dir: &std::path::Path, extension: &str) -> Result<PathBuf> {
    let candidates = picker::list_candidates(dir, extension)?;
    let stdin = std::io::stdin();
    picker::choose(&candidates, stdin.lock(), std::io::stdout())
}
