use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use crossbeam_channel::Sender;

use super::{Sensor, SensorError, StreamConfig};
use crate::{
    mapping::{ColorImageFormat, DepthImageFormat},
    skeleton::{
        JointTrackingState, JointType, SKELETON_COUNT, Skeleton, SkeletonPoint,
        SkeletonTrackingState,
    },
    types::{AllFramesReady, ColorFrame, DepthFrame, SkeletonFrame},
};

const FRAME_INTERVAL: Duration = Duration::from_millis(1_000 / 30);
const BODY_DEPTH: f32 = 2.2;
/// Ticks between toggles of the left hand's visibility.
const HAND_DROPOUT_PERIOD: u64 = 45;

/// Stand-in sensor that renders a test pattern and one waving figure.
pub struct SyntheticSensor {
    id: String,
    streams: StreamConfig,
    worker: Option<FrameWorker>,
}

struct FrameWorker {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FrameWorker {
    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for FrameWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl SyntheticSensor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            streams: StreamConfig::default(),
            worker: None,
        }
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }
}

impl Sensor for SyntheticSensor {
    fn unique_id(&self) -> &str {
        &self.id
    }

    fn enable_skeleton_stream(&mut self) {
        self.streams.skeleton = true;
    }

    fn enable_color_stream(&mut self, format: ColorImageFormat) {
        self.streams.color = Some(format);
    }

    fn enable_depth_stream(&mut self, format: DepthImageFormat) {
        self.streams.depth = Some(format);
    }

    fn start(&mut self, frames_tx: Sender<AllFramesReady>) -> Result<(), SensorError> {
        if self.worker.is_some() {
            return Err(SensorError::AlreadyStarted(self.id.clone()));
        }
        if self.streams.is_empty() {
            return Err(SensorError::NoStreamsEnabled(self.id.clone()));
        }

        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();
        let streams = self.streams;

        let handle = thread::Builder::new()
            .name(format!("sensor-{}", self.id))
            .spawn(move || {
                let mut tick = 0u64;
                while !stop_flag.load(Ordering::Relaxed) {
                    let started = Instant::now();
                    let frames = synthesize_frames(tick, &streams);

                    // Drop the tick if the viewer is still busy with the last one.
                    if let Err(err) = frames_tx.try_send(frames) {
                        if err.is_disconnected() {
                            log::debug!("frame receiver gone, stopping synthetic sensor");
                            break;
                        }
                    }

                    tick = tick.wrapping_add(1);
                    if let Some(rest) = FRAME_INTERVAL.checked_sub(started.elapsed()) {
                        thread::sleep(rest);
                    }
                }
            })
            .map_err(|err| SensorError::Spawn(err.to_string()))?;

        self.worker = Some(FrameWorker {
            stop,
            handle: Some(handle),
        });
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(mut worker) = self.worker.take() {
            worker.shutdown();
        }
    }
}

pub(crate) fn synthesize_frames(tick: u64, streams: &StreamConfig) -> AllFramesReady {
    let timestamp = Instant::now();

    AllFramesReady {
        color: streams.color.map(|format| color_pattern(tick, format, timestamp)),
        depth: streams.depth.map(|format| depth_pattern(tick, format, timestamp)),
        skeleton: streams
            .skeleton
            .then(|| SkeletonFrame::new(skeleton_slots(tick), timestamp)),
    }
}

fn color_pattern(tick: u64, format: ColorImageFormat, timestamp: Instant) -> ColorFrame {
    let width = format.width();
    let height = format.height();
    let shift = (tick % 256) as u32;

    let mut pixel_data = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            let b = ((x + shift) * 255 / width) as u8;
            let g = (y * 255 / height) as u8;
            let r = 64u8;
            pixel_data.extend_from_slice(&[b, g, r, 0]);
        }
    }

    ColorFrame {
        format,
        width,
        height,
        pixel_data,
        timestamp,
    }
}

fn depth_pattern(tick: u64, format: DepthImageFormat, timestamp: Instant) -> DepthFrame {
    let width = format.width();
    let height = format.height();
    let offset = (tick % 64) as u32;

    let pixel_data = (0..height)
        .flat_map(|y| (0..width).map(move |x| (800 + (x + y + offset) * 8) as u16))
        .collect();

    DepthFrame {
        format,
        width,
        height,
        pixel_data,
        timestamp,
    }
}

fn skeleton_slots(tick: u64) -> Vec<Skeleton> {
    let mut skeletons = vec![Skeleton::default(); SKELETON_COUNT];
    skeletons[0] = waving_figure(tick);
    skeletons[1] = Skeleton {
        tracking_id: 2,
        tracking_state: SkeletonTrackingState::PositionOnly,
        position: SkeletonPoint::new(-0.8, 0.0, 3.0),
        ..Skeleton::default()
    };
    skeletons
}

fn waving_figure(tick: u64) -> Skeleton {
    use JointTrackingState::{Inferred, NotTracked, Tracked};
    use JointType::*;

    let z = BODY_DEPTH;
    let wave = (tick as f32 * 0.15).sin() * 0.6;
    let (elbow_x, elbow_y) = (0.38, 0.42);
    let forearm = 0.26;
    let wrist = (elbow_x + forearm * wave.sin(), elbow_y + forearm * wave.cos());
    let hand = (elbow_x + 0.34 * wave.sin(), elbow_y + 0.34 * wave.cos());
    let left_hand_state = if (tick / HAND_DROPOUT_PERIOD) % 2 == 1 {
        NotTracked
    } else {
        Tracked
    };

    let mut skeleton = Skeleton {
        tracking_id: 1,
        tracking_state: SkeletonTrackingState::Tracked,
        position: SkeletonPoint::new(0.0, 0.1, z),
        ..Skeleton::default()
    };

    let joints = [
        (Head, 0.0, 0.58, Tracked),
        (ShoulderCenter, 0.0, 0.42, Tracked),
        (ShoulderLeft, -0.18, 0.38, Tracked),
        (ElbowLeft, -0.26, 0.12, Tracked),
        (WristLeft, -0.29, -0.12, Tracked),
        (HandLeft, -0.3, -0.2, left_hand_state),
        (ShoulderRight, 0.18, 0.38, Tracked),
        (ElbowRight, elbow_x, elbow_y, Tracked),
        (WristRight, wrist.0, wrist.1, Tracked),
        (HandRight, hand.0, hand.1, Inferred),
        (Spine, 0.0, 0.12, Tracked),
        (HipCenter, 0.0, -0.04, Tracked),
        (HipLeft, -0.1, -0.1, Tracked),
        (KneeLeft, -0.11, -0.5, Tracked),
        (AnkleLeft, -0.12, -0.88, Tracked),
        (FootLeft, -0.13, -0.94, Inferred),
        (HipRight, 0.1, -0.1, Tracked),
        (KneeRight, 0.11, -0.5, Tracked),
        (AnkleRight, 0.12, -0.88, Tracked),
        (FootRight, 0.13, -0.94, Inferred),
    ];
    for (joint_type, x, y, state) in joints {
        skeleton
            .joints
            .set(joint_type, SkeletonPoint::new(x, y, z), state);
    }

    skeleton
}
