use crate::annotate::{AnnotationStyle, Annotator};
use crate::error::SessionError;
use crate::frame::{Frame, Region};
use crate::tracking::{TrackOutcome, TrackerFactory, TrackerPool};
use crate::ui::{Interaction, Signal};
use crate::video::{EncoderSettings, VideoSink, VideoSource};
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    NoRegionsSelected,
    EndOfStream,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// First frame not read yet.
    Initial,
    Running,
    PausedForSelection,
    Stopped(StopReason),
}

impl SessionState {
    pub fn is_stopped(&self) -> bool {
        matches!(self, SessionState::Stopped(_))
    }
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Only used for diagnostics.
    pub source: PathBuf,
    pub recording: PathBuf,
    pub fps: f64,
    pub style: AnnotationStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub stop_reason: StopReason,
    pub frames_written: u64,
    pub tracked_objects: usize,
    pub lost_objects: usize,
    /// `None` if no output was opened.
    pub recording: Option<PathBuf>,
}

struct Tick {
    raw: Frame,
    annotated: Frame,
}

/// Drives one interactive tracking session:
/// read frame -> advance trackers -> render -> show -> write -> poll input.
pub struct SessionLoop<S, U, K, F>
where
    S: VideoSource,
    U: Interaction,
    K: VideoSink,
    F: FnMut(&EncoderSettings) -> Result<K>,
{
    source: S,
    ui: U,
    open_sink: F,
    sink: Option<K>,
    pool: TrackerPool,
    annotator: Annotator,
    settings: SessionSettings,
    state: SessionState,
    frame_size: (u32, u32),
    frames_written: u64,
    // the first frame is shown and written before any tracker update
    pending: Option<Frame>,
    last_tick: Option<Tick>,
}

impl<S, U, K, F> SessionLoop<S, U, K, F>
where
    S: VideoSource,
    U: Interaction,
    K: VideoSink,
    F: FnMut(&EncoderSettings) -> Result<K>,
{
    pub fn new(
        source: S,
        ui: U,
        factory: Box<dyn TrackerFactory>,
        open_sink: F,
        settings: SessionSettings,
    ) -> Self {
        Self {
            source,
            ui,
            open_sink,
            sink: None,
            pool: TrackerPool::new(factory),
            annotator: Annotator::new(settings.style.clone()),
            settings,
            state: SessionState::Initial,
            frame_size: (0, 0),
            frames_written: 0,
            pending: None,
            last_tick: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn pool(&self) -> &TrackerPool {
        &self.pool
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Performs a single state transition.
    pub fn step(&mut self) -> Result<SessionState> {
        self.state = match self.state {
            SessionState::Initial => self.start()?,
            SessionState::Running => self.tick()?,
            SessionState::PausedForSelection => self.select_additional()?,
            stopped @ SessionState::Stopped(_) => stopped,
        };
        Ok(self.state)
    }

    pub fn run(mut self) -> Result<SessionReport> {
        while !self.state.is_stopped() {
            if let Err(e) = self.step() {
                if let Some(sink) = self.sink.as_mut() {
                    crate::log_error!(sink.close());
                }
                return Err(e);
            }
        }
        if let Some(sink) = self.sink.as_mut() {
            sink.close()?;
        }
        let stop_reason = match self.state {
            SessionState::Stopped(reason) => reason,
            _ => unreachable!("session loop exited while running"),
        };
        Ok(SessionReport {
            stop_reason,
            frames_written: self.frames_written,
            tracked_objects: self.pool.len(),
            lost_objects: self.pool.lost_count(),
            recording: self.sink.as_ref().map(|_| self.settings.recording.clone()),
        })
    }

    fn start(&mut self) -> Result<SessionState> {
        let first = self
            .source
            .next_frame()?
            .ok_or_else(|| SessionError::SourceUnreadable {
                path: self.settings.source.clone(),
                reason: "no frames".to_owned(),
            })?;

        for bbox in self.ui.select_many(&first)? {
            let region = match Region::try_from(bbox) {
                Ok(region) => region,
                Err(e) => {
                    log::warn!("Ignoring selection: {}", e);
                    continue;
                }
            };
            if let Err(e) = self.pool.add_region(&first, region) {
                log::warn!("Could not start tracker at {}: {:#}", region, e);
            }
        }
        if self.pool.is_empty() {
            log::info!("No initial trackers selected. Exiting.");
            return Ok(SessionState::Stopped(StopReason::NoRegionsSelected));
        }
        log::info!("{} initial tracker(s) selected.", self.pool.len());

        self.frame_size = first.size();
        let encoder_settings = EncoderSettings {
            path: self.settings.recording.clone(),
            fps: self.settings.fps,
            width: first.width(),
            height: first.height(),
        };
        let sink = (self.open_sink)(&encoder_settings).with_context(|| {
            format!(
                "Failed to open output {}",
                self.settings.recording.display()
            )
        })?;
        self.sink = Some(sink);
        self.pending = Some(first);
        Ok(SessionState::Running)
    }

    fn tick(&mut self) -> Result<SessionState> {
        let frame = match self.pending.take() {
            Some(frame) => frame,
            None => match self.source.next_frame()? {
                Some(frame) => {
                    self.check_size(&frame)?;
                    let results = self.pool.advance_all(&frame);
                    let lost = results
                        .iter()
                        .filter(|r| r.outcome == TrackOutcome::Lost)
                        .count();
                    log::debug!(
                        "Frame {}: {} tracked, {} lost",
                        self.frames_written,
                        results.len() - lost,
                        lost
                    );
                    frame
                }
                None => return Ok(SessionState::Stopped(StopReason::EndOfStream)),
            },
        };

        let annotated = self.annotator.render(&frame, self.pool.objects());
        self.ui.show(&annotated)?;
        self.sink
            .as_mut()
            .context("Output not opened")?
            .write(&annotated)?;
        self.frames_written += 1;
        metrics::increment_counter!("count.frames_written");

        let signal = self.ui.poll_signal()?;
        self.last_tick = Some(Tick {
            raw: frame,
            annotated,
        });
        Ok(match signal {
            Signal::Quit => {
                log::info!("Exiting program.");
                SessionState::Stopped(StopReason::Quit)
            }
            Signal::AddObject => {
                log::info!("Paused. Select a new object to track and press ENTER or ESC.");
                SessionState::PausedForSelection
            }
            Signal::None => SessionState::Running,
        })
    }

    fn select_additional(&mut self) -> Result<SessionState> {
        let tick = self
            .last_tick
            .as_ref()
            .context("Paused before any frame was shown")?;
        match self.ui.select_one(&tick.annotated)? {
            None => log::warn!("No tracker was selected. Resuming playback."),
            Some(bbox) => match Region::try_from(bbox) {
                Ok(region) => match self.pool.add_region(&tick.raw, region) {
                    Ok(id) => log::info!("New tracker {} added successfully.", id),
                    Err(e) => log::warn!("Could not start tracker at {}: {:#}", region, e),
                },
                Err(e) => log::warn!("{}. Resuming playback.", e),
            },
        }
        Ok(SessionState::Running)
    }

    fn check_size(&self, frame: &Frame) -> Result<()> {
        if frame.size() != self.frame_size {
            return Err(SessionError::FrameSize {
                expected: self.frame_size,
                actual: frame.size(),
            }
            .into());
        }
        Ok(())
    }
}
