mod app;
mod console;
mod mapping;
mod pipeline;
mod sensor;
mod skeleton;
mod surface;
mod types;

use std::{io::Write, process::ExitCode};

use anyhow::Result;
use app::Exit;
use console::Console;
use sensor::SensorBackend;

const NO_SENSOR_EXIT_CODE: u8 = 1;

fn main() -> ExitCode {
    init_logging();

    match run() {
        Ok(code) => code,
        Err(err) => {
            log::error!("{err:?}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    // The console reader keeps the terminal in raw mode, so lines need an explicit carriage return.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            write!(
                buf,
                "[{} {:<5} {}] {}\r\n",
                buf.timestamp(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

fn run() -> Result<ExitCode> {
    log::info!("Running kinect-skeleton-viewer v{}", env!("CARGO_PKG_VERSION"));

    let backend = SensorBackend::from_env();
    let exit = app::run_viewer(sensor::discover(backend), Console::start, make_surface)?;
    let status = exit_status(&exit, console::wait_for_any_key)?;
    Ok(ExitCode::from(status))
}

/// Maps how the viewer ended to a process status, reporting a missing sensor first.
fn exit_status<W>(exit: &Exit, wait_for_key: W) -> Result<u8>
where
    W: FnOnce() -> Result<()>,
{
    match exit {
        Exit::NoSensor => {
            log::error!("FATAL: no depth sensors found! Press any key to exit...");
            wait_for_key()?;
            Ok(NO_SENSOR_EXIT_CODE)
        }
        Exit::Shutdown(_) => Ok(0),
    }
}

#[cfg(feature = "window")]
fn make_surface() -> Result<surface::WindowSurface> {
    log::debug!("creating viewer window");
    surface::WindowSurface::new(app::WINDOW_TITLE, app::WINDOW_WIDTH, app::WINDOW_HEIGHT)
}

#[cfg(not(feature = "window"))]
fn make_surface() -> Result<surface::Canvas> {
    log::info!("built without the `window` feature, rendering {} off-screen", app::WINDOW_TITLE);
    Ok(surface::Canvas::new(app::WINDOW_WIDTH, app::WINDOW_HEIGHT))
}
