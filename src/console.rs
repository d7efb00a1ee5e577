use std::{
    io::{IsTerminal, Read},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender, unbounded};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const ESC: u8 = 0x1b;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleInput {
    Escape,
    Interrupt,
    Key,
    /// Input stream closed; no more keys will arrive.
    Closed,
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        enable_raw_mode().context("failed to switch the terminal to raw mode")?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Background key reader. Restores the terminal when dropped.
pub struct Console {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
    _raw_mode: Option<RawModeGuard>,
}

impl Console {
    pub fn start() -> Result<(Self, Receiver<ConsoleInput>)> {
        let (tx, rx) = unbounded();
        let stop = Arc::new(AtomicBool::new(false));

        if std::io::stdin().is_terminal() {
            let raw_mode = RawModeGuard::enable()?;
            let stop_flag = stop.clone();
            let handle = thread::Builder::new()
                .name("console".into())
                .spawn(move || terminal_loop(stop_flag, tx))
                .context("failed to spawn console thread")?;

            Ok((
                Self {
                    stop,
                    handle: Some(handle),
                    _raw_mode: Some(raw_mode),
                },
                rx,
            ))
        } else {
            // A blocking stdin read cannot be interrupted, so this thread is detached.
            thread::Builder::new()
                .name("console".into())
                .spawn(move || piped_loop(std::io::stdin().lock(), tx))
                .context("failed to spawn console thread")?;

            Ok((
                Self {
                    stop,
                    handle: None,
                    _raw_mode: None,
                },
                rx,
            ))
        }
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn terminal_loop(stop: Arc<AtomicBool>, tx: Sender<ConsoleInput>) {
    while !stop.load(Ordering::Relaxed) {
        match event::poll(POLL_INTERVAL) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(err) => {
                log::warn!("console poll failed: {err}");
                let _ = tx.send(ConsoleInput::Closed);
                return;
            }
        }

        let input = match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Esc => ConsoleInput::Escape,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    ConsoleInput::Interrupt
                }
                _ => ConsoleInput::Key,
            },
            Ok(_) => continue,
            Err(err) => {
                log::warn!("console read failed: {err}");
                ConsoleInput::Closed
            }
        };

        let closed = input == ConsoleInput::Closed;
        if tx.send(input).is_err() || closed {
            return;
        }
    }
}

fn piped_loop<R: Read>(mut input: R, tx: Sender<ConsoleInput>) {
    let mut buf = [0u8; 64];
    loop {
        let n = match input.read(&mut buf) {
            Ok(0) | Err(_) => {
                let _ = tx.send(ConsoleInput::Closed);
                return;
            }
            Ok(n) => n,
        };

        for &byte in &buf[..n] {
            let key = match byte {
                ESC => ConsoleInput::Escape,
                b'\n' | b'\r' => continue,
                _ => ConsoleInput::Key,
            };
            if tx.send(key).is_err() {
                return;
            }
        }
    }
}

/// Blocks until any key is pressed. Returns at once when stdin is not a terminal.
pub fn wait_for_any_key() -> Result<()> {
    if !std::io::stdin().is_terminal() {
        return Ok(());
    }

    let _raw_mode = RawModeGuard::enable()?;
    loop {
        if let Event::Key(key) = event::read().context("failed to read console key")? {
            if key.kind == KeyEventKind::Press {
                return Ok(());
            }
        }
    }
}
