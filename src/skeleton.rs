/// Number of skeleton slots the sensor reports per frame.
pub const SKELETON_COUNT: usize = 6;

/// Body landmarks reported for each skeleton, in the sensor's slot order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum JointType {
    HipCenter = 0,
    Spine = 1,
    ShoulderCenter = 2,
    Head = 3,
    ShoulderLeft = 4,
    ElbowLeft = 5,
    WristLeft = 6,
    HandLeft = 7,
    ShoulderRight = 8,
    ElbowRight = 9,
    WristRight = 10,
    HandRight = 11,
    HipLeft = 12,
    KneeLeft = 13,
    AnkleLeft = 14,
    FootLeft = 15,
    HipRight = 16,
    KneeRight = 17,
    AnkleRight = 18,
    FootRight = 19,
}

impl JointType {
    pub const COUNT: usize = 20;

    pub const ALL: [JointType; JointType::COUNT] = [
        JointType::HipCenter,
        JointType::Spine,
        JointType::ShoulderCenter,
        JointType::Head,
        JointType::ShoulderLeft,
        JointType::ElbowLeft,
        JointType::WristLeft,
        JointType::HandLeft,
        JointType::ShoulderRight,
        JointType::ElbowRight,
        JointType::WristRight,
        JointType::HandRight,
        JointType::HipLeft,
        JointType::KneeLeft,
        JointType::AnkleLeft,
        JointType::FootLeft,
        JointType::HipRight,
        JointType::KneeRight,
        JointType::AnkleRight,
        JointType::FootRight,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JointTrackingState {
    #[default]
    NotTracked,
    Inferred,
    Tracked,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SkeletonTrackingState {
    #[default]
    NotTracked,
    PositionOnly,
    Tracked,
}

/// Position in sensor space, in meters. +Y is up, +Z points away from the sensor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SkeletonPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl SkeletonPoint {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Joint {
    #[allow(dead_code)]
    pub joint_type: JointType,
    pub position: SkeletonPoint,
    pub tracking_state: JointTrackingState,
}

/// Fixed set of joints, one per [`JointType`], indexable by label.
#[derive(Clone, Debug, PartialEq)]
pub struct JointCollection {
    joints: [Joint; JointType::COUNT],
}

impl JointCollection {
    pub fn set(
        &mut self,
        joint_type: JointType,
        position: SkeletonPoint,
        state: JointTrackingState,
    ) {
        self.joints[joint_type.index()] = Joint {
            joint_type,
            position,
            tracking_state: state,
        };
    }

    #[allow(dead_code)]
    pub fn iter(&self) -> impl Iterator<Item = &Joint> {
        self.joints.iter()
    }
}

impl Default for JointCollection {
    fn default() -> Self {
        Self {
            joints: JointType::ALL.map(|joint_type| Joint {
                joint_type,
                position: SkeletonPoint::default(),
                tracking_state: JointTrackingState::NotTracked,
            }),
        }
    }
}

impl std::ops::Index<JointType> for JointCollection {
    type Output = Joint;

    fn index(&self, joint_type: JointType) -> &Joint {
        &self.joints[joint_type.index()]
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Skeleton {
    #[allow(dead_code)]
    pub tracking_id: u32,
    pub tracking_state: SkeletonTrackingState,
    #[allow(dead_code)]
    pub position: SkeletonPoint,
    pub joints: JointCollection,
}

impl Skeleton {
    pub fn is_tracked(&self) -> bool {
        self.tracking_state == SkeletonTrackingState::Tracked
    }
}

/// Joint pairs connected when drawing a skeleton, in draw order.
pub const BONES: [(JointType, JointType); 19] = [
    // head and shoulders
    (JointType::Head, JointType::ShoulderCenter),
    (JointType::ShoulderCenter, JointType::ShoulderLeft),
    (JointType::ShoulderCenter, JointType::ShoulderRight),
    // left arm
    (JointType::ShoulderLeft, JointType::ElbowLeft),
    (JointType::ElbowLeft, JointType::WristLeft),
    (JointType::WristLeft, JointType::HandLeft),
    // right arm
    (JointType::ShoulderRight, JointType::ElbowRight),
    (JointType::ElbowRight, JointType::WristRight),
    (JointType::WristRight, JointType::HandRight),
    // spine
    (JointType::ShoulderCenter, JointType::Spine),
    (JointType::Spine, JointType::HipCenter),
    // left leg
    (JointType::HipCenter, JointType::HipLeft),
    (JointType::HipLeft, JointType::KneeLeft),
    (JointType::KneeLeft, JointType::AnkleLeft),
    (JointType::AnkleLeft, JointType::FootLeft),
    // right leg
    (JointType::HipCenter, JointType::HipRight),
    (JointType::HipRight, JointType::KneeRight),
    (JointType::KneeRight, JointType::AnkleRight),
    (JointType::AnkleRight, JointType::FootRight),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joint_indices_match_slot_order() {
        for (slot, joint_type) in JointType::ALL.iter().enumerate() {
            assert_eq!(joint_type.index(), slot);
        }
    }

    #[test]
    fn default_collection_is_untracked() {
        let joints = JointCollection::default();
        assert_eq!(joints.iter().count(), JointType::COUNT);
        assert!(
            joints
                .iter()
                .all(|j| j.tracking_state == JointTrackingState::NotTracked)
        );
        assert_eq!(joints[JointType::FootRight].joint_type, JointType::FootRight);
    }

    #[test]
    fn set_replaces_single_joint() {
        let mut joints = JointCollection::default();
        joints.set(
            JointType::Head,
            SkeletonPoint::new(0.0, 0.5, 2.0),
            JointTrackingState::Inferred,
        );

        let head = joints[JointType::Head];
        assert_eq!(head.position, SkeletonPoint::new(0.0, 0.5, 2.0));
        assert_eq!(head.tracking_state, JointTrackingState::Inferred);
        assert_eq!(
            joints[JointType::Spine].tracking_state,
            JointTrackingState::NotTracked
        );
    }

    #[test]
    fn bones_start_at_head_and_end_at_right_foot() {
        assert_eq!(BONES[0], (JointType::Head, JointType::ShoulderCenter));
        assert_eq!(
            BONES[BONES.len() - 1],
            (JointType::AnkleRight, JointType::FootRight)
        );
    }

    #[test]
    fn every_joint_is_reached_by_some_bone() {
        for joint_type in JointType::ALL {
            assert!(
                BONES
                    .iter()
                    .any(|&(a, b)| a == joint_type || b == joint_type),
                "{joint_type:?} is not connected"
            );
        }
    }
}
