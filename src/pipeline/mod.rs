mod frames;
pub mod overlay;

use frames::{color_frame_to_bitmap, depth_frame_to_bitmap};

use crate::{
    surface::Surface,
    types::{AllFramesReady, Point},
};

pub const COLOR_ORIGIN: Point = Point::new(0, 0);
pub const DEPTH_ORIGIN: Point = Point::new(640, 0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    Minimized,
    NoColorFrame,
    BadColorFrame,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Skipped(SkipReason),
    Rendered {
        depth_drawn: bool,
        skeletons_drawn: usize,
    },
}

/// Handles one frame-ready tick: color, then depth, then tracked skeletons.
///
/// Sub-frames are owned by this call and dropped on every return path.
pub fn process_frames<S: Surface + ?Sized>(
    surface: &mut S,
    mut frames: AllFramesReady,
) -> FrameOutcome {
    if surface.is_minimized() {
        return FrameOutcome::Skipped(SkipReason::Minimized);
    }

    let color_frame = frames.open_color_image_frame();
    let depth_frame = frames.open_depth_image_frame();
    let skeleton_frame = frames.open_skeleton_frame();

    let Some(color_frame) = color_frame else {
        return FrameOutcome::Skipped(SkipReason::NoColorFrame);
    };

    let color_bitmap = match color_frame_to_bitmap(&color_frame) {
        Ok(bitmap) => bitmap,
        Err(err) => {
            log::debug!("dropping color frame: {err}");
            return FrameOutcome::Skipped(SkipReason::BadColorFrame);
        }
    };
    overlay::draw_bitmap(surface, &color_bitmap, COLOR_ORIGIN);

    let depth_drawn = match depth_frame.as_ref().map(depth_frame_to_bitmap) {
        Some(Ok(bitmap)) => {
            overlay::draw_bitmap(surface, &bitmap, DEPTH_ORIGIN);
            true
        }
        Some(Err(err)) => {
            log::debug!("dropping depth frame: {err}");
            false
        }
        None => false,
    };

    let mut skeletons_drawn = 0;
    if let Some(skeleton_frame) = skeleton_frame {
        let skeletons = skeleton_frame.copy_skeleton_data();
        log::trace!("copied {} skeleton slots", skeleton_frame.skeleton_array_length());
        drop(skeleton_frame);

        for skeleton in skeletons.iter().filter(|s| s.is_tracked()) {
            overlay::draw_tracked_skeleton(surface, &skeleton.joints, color_frame.format);
            skeletons_drawn += 1;
        }
    }

    log::trace!(
        "rendered frame in {:?} ({} skeletons)",
        color_frame.timestamp.elapsed(),
        skeletons_drawn
    );

    FrameOutcome::Rendered {
        depth_drawn,
        skeletons_drawn,
    }
}
