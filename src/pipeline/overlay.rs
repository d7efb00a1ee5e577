use crate::{
    mapping::{ColorImageFormat, map_skeleton_point_to_color_point},
    skeleton::{BONES, Joint, JointCollection, JointTrackingState},
    surface::{Color, Pen, Surface},
    types::{Bitmap, Point},
};

pub const BONE_WIDTH: u32 = 4;

const TRACKED_PEN: Pen = Pen {
    color: Color::RED,
    width: BONE_WIDTH,
};

const INFERRED_PEN: Pen = Pen {
    color: Color::BLUE,
    width: BONE_WIDTH,
};

pub fn draw_bitmap<S: Surface + ?Sized>(surface: &mut S, bitmap: &Bitmap, origin: Point) {
    surface.draw_bitmap(bitmap, origin);
}

/// Draws every bone of one tracked skeleton, later bones over earlier ones.
pub fn draw_tracked_skeleton<S: Surface + ?Sized>(
    surface: &mut S,
    joints: &JointCollection,
    format: ColorImageFormat,
) {
    for &(from, to) in BONES.iter() {
        draw_bone(surface, &joints[from], &joints[to], format);
    }
}

pub fn draw_bone<S: Surface + ?Sized>(
    surface: &mut S,
    from: &Joint,
    to: &Joint,
    format: ColorImageFormat,
) {
    let Some(pen) = bone_pen(from.tracking_state, to.tracking_state) else {
        return;
    };

    let start = map_skeleton_point_to_color_point(from.position, format);
    let end = map_skeleton_point_to_color_point(to.position, format);
    surface.draw_line(start, end, pen);
}

/// Pen for a bone, or `None` when either end is not tracked.
fn bone_pen(from: JointTrackingState, to: JointTrackingState) -> Option<Pen> {
    use JointTrackingState::*;

    match (from, to) {
        (NotTracked, _) | (_, NotTracked) => None,
        (Tracked, Tracked) => Some(TRACKED_PEN),
        _ => Some(INFERRED_PEN),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use anyhow::Result;

    use super::*;
    use crate::{
        mapping::ColorPoint,
        skeleton::{JointType, SkeletonPoint},
        types::PixelFormat,
    };

    const FORMAT: ColorImageFormat = ColorImageFormat::RgbResolution640x480Fps30;

    #[derive(Clone, Debug, PartialEq)]
    pub(crate) enum DrawCall {
        Bitmap { origin: Point, width: u32, height: u32 },
        Line { from: ColorPoint, to: ColorPoint, pen: Pen },
    }

    /// Surface double that records what was painted.
    #[derive(Default)]
    pub(crate) struct RecordingSurface {
        pub minimized: bool,
        pub closed: bool,
        pub calls: Vec<DrawCall>,
        pub presents: usize,
        pub pumps: usize,
    }

    impl RecordingSurface {
        pub fn lines(&self) -> Vec<(ColorPoint, ColorPoint, Pen)> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    DrawCall::Line { from, to, pen } => Some((*from, *to, *pen)),
                    DrawCall::Bitmap { .. } => None,
                })
                .collect()
        }

        pub fn bitmaps(&self) -> Vec<Point> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    DrawCall::Bitmap { origin, .. } => Some(*origin),
                    DrawCall::Line { .. } => None,
                })
                .collect()
        }
    }

    impl Surface for RecordingSurface {
        fn is_minimized(&self) -> bool {
            self.minimized
        }

        fn is_open(&self) -> bool {
            !self.closed
        }

        fn draw_bitmap(&mut self, bitmap: &Bitmap, origin: Point) {
            self.calls.push(DrawCall::Bitmap {
                origin,
                width: bitmap.width,
                height: bitmap.height,
            });
        }

        fn draw_line(&mut self, from: ColorPoint, to: ColorPoint, pen: Pen) {
            self.calls.push(DrawCall::Line { from, to, pen });
        }

        fn present(&mut self) -> Result<()> {
            self.presents += 1;
            Ok(())
        }

        fn pump_events(&mut self) -> Result<()> {
            self.pumps += 1;
            Ok(())
        }
    }

    fn head_and_shoulder(shoulder_state: JointTrackingState) -> JointCollection {
        let mut joints = JointCollection::default();
        joints.set(
            JointType::Head,
            SkeletonPoint::new(0.0, 0.0, 1.0),
            JointTrackingState::Tracked,
        );
        joints.set(
            JointType::ShoulderCenter,
            SkeletonPoint::new(0.0, -0.2, 1.0),
            shoulder_state,
        );
        joints
    }

    fn all_joints(state: JointTrackingState) -> JointCollection {
        let mut joints = JointCollection::default();
        for (i, joint_type) in JointType::ALL.into_iter().enumerate() {
            joints.set(
                joint_type,
                SkeletonPoint::new(i as f32 * 0.01, 0.0, 2.0),
                state,
            );
        }
        joints
    }

    #[test]
    fn tracked_pair_draws_one_red_line() {
        let mut surface = RecordingSurface::default();
        draw_tracked_skeleton(
            &mut surface,
            &head_and_shoulder(JointTrackingState::Tracked),
            FORMAT,
        );

        assert_eq!(
            surface.lines(),
            vec![(ColorPoint::new(320, 240), ColorPoint::new(320, 346), TRACKED_PEN)]
        );
        assert_eq!(surface.lines()[0].2.color, Color::RED);
    }

    #[test]
    fn inferred_endpoint_draws_blue() {
        let mut surface = RecordingSurface::default();
        draw_tracked_skeleton(
            &mut surface,
            &head_and_shoulder(JointTrackingState::Inferred),
            FORMAT,
        );

        let lines = surface.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].2.color, Color::BLUE);
        assert_eq!(lines[0].2.width, BONE_WIDTH);
    }

    #[test]
    fn untracked_endpoint_skips_only_its_bones() {
        let mut joints = all_joints(JointTrackingState::Tracked);
        joints.set(
            JointType::ShoulderCenter,
            SkeletonPoint::new(0.0, -0.2, 1.0),
            JointTrackingState::NotTracked,
        );

        let mut surface = RecordingSurface::default();
        draw_tracked_skeleton(&mut surface, &joints, FORMAT);

        let touching_shoulder = BONES
            .iter()
            .filter(|&&(a, b)| a == JointType::ShoulderCenter || b == JointType::ShoulderCenter)
            .count();
        assert_eq!(touching_shoulder, 4);
        assert_eq!(surface.lines().len(), BONES.len() - touching_shoulder);
        assert!(surface.lines().iter().all(|(_, _, pen)| *pen == TRACKED_PEN));
    }

    #[test]
    fn bone_colors_follow_endpoint_states() {
        use JointTrackingState::*;

        let states = [NotTracked, Inferred, Tracked];
        for from_state in states {
            for to_state in states {
                let mut from = all_joints(from_state)[JointType::Head];
                let mut to = all_joints(to_state)[JointType::ShoulderCenter];
                from.position = SkeletonPoint::new(0.0, 0.1, 1.0);
                to.position = SkeletonPoint::new(0.0, -0.1, 1.0);

                let mut surface = RecordingSurface::default();
                draw_bone(&mut surface, &from, &to, FORMAT);
                let lines = surface.lines();

                match (from_state, to_state) {
                    (NotTracked, _) | (_, NotTracked) => assert!(lines.is_empty()),
                    (Tracked, Tracked) => assert_eq!(lines[0].2.color, Color::RED),
                    _ => assert_eq!(lines[0].2.color, Color::BLUE),
                }
                assert!(lines.len() <= 1);
            }
        }
    }

    #[test]
    fn fully_tracked_skeleton_draws_bones_in_table_order() {
        let joints = all_joints(JointTrackingState::Tracked);
        let mut surface = RecordingSurface::default();
        draw_tracked_skeleton(&mut surface, &joints, FORMAT);

        let expected: Vec<_> = BONES
            .iter()
            .map(|&(a, b)| {
                (
                    map_skeleton_point_to_color_point(joints[a].position, FORMAT),
                    map_skeleton_point_to_color_point(joints[b].position, FORMAT),
                    TRACKED_PEN,
                )
            })
            .collect();
        assert_eq!(surface.lines(), expected);
    }

    #[test]
    fn degenerate_positions_still_draw_quietly() {
        let mut joints = head_and_shoulder(JointTrackingState::Tracked);
        joints.set(
            JointType::Head,
            SkeletonPoint::new(0.0, 0.0, 0.0),
            JointTrackingState::Tracked,
        );
        let mut surface = RecordingSurface::default();
        draw_tracked_skeleton(&mut surface, &joints, FORMAT);
        assert_eq!(surface.lines().len(), 1);
    }

    #[test]
    fn draw_bitmap_forwards_origin() {
        let mut surface = RecordingSurface::default();
        let bitmap = Bitmap {
            width: 1,
            height: 1,
            format: PixelFormat::Bgr32,
            data: vec![0; 4],
        };
        draw_bitmap(&mut surface, &bitmap, Point::new(640, 0));
        assert_eq!(surface.bitmaps(), vec![Point::new(640, 0)]);
    }
}
