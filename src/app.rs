use std::{ops::ControlFlow, time::Duration};

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, bounded, never, select};

use crate::{
    console::ConsoleInput,
    mapping::{ColorImageFormat, DepthImageFormat},
    pipeline::{self, FrameOutcome, SkipReason},
    sensor::Sensor,
    surface::Surface,
    types::AllFramesReady,
};

pub const COLOR_FORMAT: ColorImageFormat = ColorImageFormat::RgbResolution640x480Fps30;
pub const DEPTH_FORMAT: DepthImageFormat = DepthImageFormat::Resolution320x240Fps30;
pub const WINDOW_WIDTH: u32 = 640 + 320;
pub const WINDOW_HEIGHT: u32 = 480 + 100;
pub const WINDOW_TITLE: &str = "Kinect Skeleton Viewer";

const IDLE_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub enum AppMessage {
    FrameReady(AllFramesReady),
    Console(ConsoleInput),
    SensorDisconnected,
    Idle,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub rendered: u64,
    pub skipped_minimized: u64,
    pub skipped_no_color: u64,
    pub skipped_bad_color: u64,
    pub skeletons_drawn: u64,
}

impl FrameStats {
    fn record(&mut self, outcome: FrameOutcome) {
        match outcome {
            FrameOutcome::Rendered {
                skeletons_drawn, ..
            } => {
                self.rendered += 1;
                self.skeletons_drawn += skeletons_drawn as u64;
            }
            FrameOutcome::Skipped(SkipReason::Minimized) => self.skipped_minimized += 1,
            FrameOutcome::Skipped(SkipReason::NoColorFrame) => self.skipped_no_color += 1,
            FrameOutcome::Skipped(SkipReason::BadColorFrame) => self.skipped_bad_color += 1,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Exit {
    NoSensor,
    Shutdown(FrameStats),
}

/// Owns the active sensor and the display surface for the life of the viewer.
pub struct App<S: Surface> {
    sensor: Box<dyn Sensor>,
    surface: S,
    stats: FrameStats,
}

impl<S: Surface> App<S> {
    pub fn new(sensor: Box<dyn Sensor>, surface: S) -> Self {
        Self {
            sensor,
            surface,
            stats: FrameStats::default(),
        }
    }

    #[cfg(test)]
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn start(&mut self) -> Result<Receiver<AllFramesReady>> {
        let (frames_tx, frames_rx) = bounded(1);

        log::debug!("starting sensor {}", self.sensor.unique_id());
        self.sensor
            .start(frames_tx)
            .with_context(|| format!("failed to start sensor {}", self.sensor.unique_id()))?;
        log::debug!("started sensor {}", self.sensor.unique_id());

        Ok(frames_rx)
    }

    pub fn handle(&mut self, message: AppMessage) -> Result<ControlFlow<()>> {
        match message {
            AppMessage::FrameReady(frames) => {
                let outcome = pipeline::process_frames(&mut self.surface, frames);
                self.stats.record(outcome);
                match outcome {
                    FrameOutcome::Skipped(SkipReason::Minimized) => self.surface.pump_events()?,
                    _ => self.surface.present()?,
                }
            }
            AppMessage::Console(ConsoleInput::Escape | ConsoleInput::Interrupt) => {
                log::info!("Exiting...");
                return Ok(ControlFlow::Break(()));
            }
            AppMessage::Console(ConsoleInput::Key) => {}
            AppMessage::Console(ConsoleInput::Closed) => {
                log::info!("console input closed, close the window to exit");
            }
            AppMessage::SensorDisconnected => {
                log::warn!("sensor {} stopped delivering frames", self.sensor.unique_id());
                return Ok(ControlFlow::Break(()));
            }
            AppMessage::Idle => self.surface.present()?,
        }

        if !self.surface.is_open() {
            log::info!("window closed, exiting...");
            return Ok(ControlFlow::Break(()));
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Runs the message loop until the user asks to exit.
    pub fn run(
        &mut self,
        frames_rx: Receiver<AllFramesReady>,
        keys_rx: Receiver<ConsoleInput>,
    ) -> Result<()> {
        let mut keys_rx = keys_rx;

        loop {
            let message = select! {
                recv(frames_rx) -> frames => match frames {
                    Ok(frames) => AppMessage::FrameReady(frames),
                    Err(_) => AppMessage::SensorDisconnected,
                },
                recv(keys_rx) -> key => AppMessage::Console(key.unwrap_or(ConsoleInput::Closed)),
                default(IDLE_INTERVAL) => AppMessage::Idle,
            };

            if matches!(message, AppMessage::Console(ConsoleInput::Closed)) {
                keys_rx = never();
            }

            if self.handle(message)?.is_break() {
                return Ok(());
            }
        }
    }

    /// Stops the sensor, then closes the surface.
    pub fn shutdown(mut self) -> FrameStats {
        log::debug!("stopping sensor {}", self.sensor.unique_id());
        self.sensor.stop();
        log::debug!("stopped sensor {}", self.sensor.unique_id());

        log::debug!("closing surface");
        drop(self.surface);
        log::debug!("closed surface");

        self.stats
    }
}

/// Enables the streams the viewer draws from.
pub fn configure_streams(sensor: &mut dyn Sensor) {
    log::debug!("enabling skeleton stream");
    sensor.enable_skeleton_stream();
    log::debug!("enabling color stream ({COLOR_FORMAT:?})");
    sensor.enable_color_stream(COLOR_FORMAT);
    log::debug!("enabling depth stream ({DEPTH_FORMAT:?})");
    sensor.enable_depth_stream(DEPTH_FORMAT);
}

/// Picks the first sensor, opens the console and the surface, and runs until exit.
///
/// Returns [`Exit::NoSensor`] before opening either when `sensors` is empty.
/// The console guard lives until the sensor and surface are torn down.
pub fn run_viewer<S, G, C, F>(
    sensors: Vec<Box<dyn Sensor>>,
    open_console: C,
    make_surface: F,
) -> Result<Exit>
where
    S: Surface,
    C: FnOnce() -> Result<(G, Receiver<ConsoleInput>)>,
    F: FnOnce() -> Result<S>,
{
    let Some(mut sensor) = sensors.into_iter().next() else {
        return Ok(Exit::NoSensor);
    };
    log::debug!("using sensor with unique id {}", sensor.unique_id());

    configure_streams(sensor.as_mut());
    let (console, keys_rx) = open_console()?;
    let surface = make_surface()?;

    let mut app = App::new(sensor, surface);
    let frames_rx = app.start()?;
    let result = app.run(frames_rx, keys_rx);
    let stats = app.shutdown();
    drop(console);
    result?;

    log::info!(
        "rendered {} frames, drew {} skeletons, skipped {}/{}/{} (minimized/no color/malformed)",
        stats.rendered,
        stats.skeletons_drawn,
        stats.skipped_minimized,
        stats.skipped_no_color,
        stats.skipped_bad_color
    );
    Ok(Exit::Shutdown(stats))
}
