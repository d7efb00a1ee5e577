mod synthetic;

pub use synthetic::SyntheticSensor;

use crossbeam_channel::Sender;
use thiserror::Error;

use crate::{
    mapping::{ColorImageFormat, DepthImageFormat},
    types::AllFramesReady,
};

pub const SENSOR_ENV_VAR: &str = "SKELETON_VIEWER_SENSOR";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SensorError {
    #[error("sensor {0} is already running")]
    AlreadyStarted(String),
    #[error("sensor {0} has no streams enabled")]
    NoStreamsEnabled(String),
    #[error("failed to spawn frame thread: {0}")]
    Spawn(String),
}

/// Streams requested from a sensor before it starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamConfig {
    pub skeleton: bool,
    pub color: Option<ColorImageFormat>,
    pub depth: Option<DepthImageFormat>,
}

impl StreamConfig {
    pub fn is_empty(&self) -> bool {
        !self.skeleton && self.color.is_none() && self.depth.is_none()
    }
}

/// A depth camera that pushes one [`AllFramesReady`] per tick once started.
pub trait Sensor: Send {
    fn unique_id(&self) -> &str;

    fn enable_skeleton_stream(&mut self);

    fn enable_color_stream(&mut self, format: ColorImageFormat);

    fn enable_depth_stream(&mut self, format: DepthImageFormat);

    /// Frames are offered with `try_send`; a busy consumer loses that tick.
    fn start(&mut self, frames_tx: Sender<AllFramesReady>) -> Result<(), SensorError>;

    fn stop(&mut self);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SensorBackend {
    #[default]
    Synthetic,
    Disabled,
}

impl SensorBackend {
    pub fn from_env() -> Self {
        match std::env::var(SENSOR_ENV_VAR) {
            Ok(value) => Self::parse(&value).unwrap_or_else(|| {
                log::warn!("unknown {SENSOR_ENV_VAR}={value:?}, using the default backend");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "synthetic" => Some(SensorBackend::Synthetic),
            "none" => Some(SensorBackend::Disabled),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SensorBackend::Synthetic => "synthetic",
            SensorBackend::Disabled => "none",
        }
    }
}

/// Lists the sensors attached through `backend`, in connection order.
pub fn discover(backend: SensorBackend) -> Vec<Box<dyn Sensor>> {
    log::debug!("discovering sensors with backend: {}", backend.label());

    match backend {
        SensorBackend::Synthetic => vec![Box::new(SyntheticSensor::new("synthetic-0"))],
        SensorBackend::Disabled => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_parsing_is_case_insensitive() {
        assert_eq!(SensorBackend::parse("Synthetic"), Some(SensorBackend::Synthetic));
        assert_eq!(SensorBackend::parse(" none "), Some(SensorBackend::Disabled));
        assert_eq!(SensorBackend::parse("kinect2"), None);
    }

    #[test]
    fn none_backend_finds_no_sensors() {
        assert!(discover(SensorBackend::Disabled).is_empty());
    }

    #[test]
    fn synthetic_backend_finds_one_sensor() {
        let sensors = discover(SensorBackend::Synthetic);
        assert_eq!(sensors.len(), 1);
        assert_eq!(sensors[0].unique_id(), "synthetic-0");
    }

    #[test]
    fn empty_stream_config() {
        assert!(StreamConfig::default().is_empty());
        let config = StreamConfig {
            skeleton: true,
            ..StreamConfig::default()
        };
        assert!(!config.is_empty());
    }
}
