//! Feature extraction from hand landmarks
//!
//! Turns one `JointFrame` into a fixed-schema `FeatureBundle`. Pure: no
//! state, no failure modes for a well-formed frame.

use nalgebra::Vector3;

use super::angles::joint_angle;
use super::landmarks::{
    Finger, JointFrame, FINGERTIPS, INDEX_MCP, MIDDLE_MCP, MIDDLE_TIP, PINKY_MCP, RING_MCP,
    THUMB_MCP, THUMB_TIP, WRIST,
};

/// Tip must sit this far above its MCP (image y grows downward)
pub const VERTICAL_MARGIN: f32 = 0.04;
/// Tip-to-wrist over MCP-to-wrist ratio for an extended finger
pub const WRIST_DISTANCE_RATIO: f32 = 1.1;
/// Middle-knuckle angle (degrees) above which a finger counts as straight
pub const STRAIGHT_ANGLE_DEG: f32 = 140.0;

/// Thumb tip-to-wrist over thumb MCP-to-wrist ratio
pub const THUMB_DISTANCE_RATIO: f32 = 1.3;
/// Minimum |x| between thumb tip and index MCP
pub const THUMB_INDEX_SPREAD: f32 = 0.06;
/// Minimum |x| between thumb tip and wrist
pub const THUMB_WRIST_OFFSET: f32 = 0.08;

/// Palm normal z beyond ±this decides which side faces the camera
pub const NORMAL_FACING_THRESHOLD: f32 = 0.3;

/// Votes needed out of three signals
const EXTENSION_VOTES: usize = 2;

/// Pitch, yaw and roll of the palm in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PalmOrientation {
    /// +90 fingers straight up, -90 straight down
    pub pitch: f32,
    /// 0 upright, negative leaning left, positive leaning right
    pub yaw: f32,
    /// Tilt of the knuckle line (index MCP → pinky MCP)
    pub roll: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PalmNormal {
    /// Unit normal of the wrist/index-MCP/pinky-MCP plane
    pub normal: Vector3<f32>,
    pub facing_viewer: bool,
    pub facing_away: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerDistances {
    /// Each fingertip to the wrist, thumb first
    pub tip_to_wrist: [f32; 5],
    /// Thumb–index, index–middle, middle–ring, ring–pinky
    pub adjacent_tips: [f32; 4],
    /// Thumb tip to index tip (pinch)
    pub thumb_index: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbPosition {
    /// Thumb tip minus palm center
    pub offset: Vector3<f32>,
    pub distance: f32,
}

/// Everything the classifier looks at for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureBundle {
    /// Thumb, index, middle, ring, pinky
    pub fingers_extended: [bool; 5],
    pub extended_count: u8,
    /// Angle at each finger's middle knuckle in degrees
    pub finger_angles: [f32; 5],
    pub distances: FingerDistances,
    pub palm_center: Vector3<f32>,
    pub palm_orientation: PalmOrientation,
    pub palm_normal: PalmNormal,
    pub palm_size: f32,
    /// Unit vector wrist → middle tip
    pub hand_direction: Vector3<f32>,
    /// Unit vector thumb MCP → thumb tip
    pub thumb_direction: Vector3<f32>,
    /// Mean adjacent-fingertip distance
    pub finger_spread: f32,
    pub thumb_position: ThumbPosition,
}

impl FeatureBundle {
    pub fn is_extended(&self, finger: Finger) -> bool {
        self.fingers_extended[finger as usize]
    }

    /// True when `finger` is the single extended finger
    pub fn only_extended(&self, finger: Finger) -> bool {
        self.extended_count == 1 && self.is_extended(finger)
    }

    pub fn angle(&self, finger: Finger) -> f32 {
        self.finger_angles[finger as usize]
    }
}

/// Extract the full feature bundle from one frame
pub fn extract_features(frame: &JointFrame) -> FeatureBundle {
    let finger_angles = finger_angles(frame);
    let fingers_extended = fingers_extended(frame, &finger_angles);
    let extended_count = fingers_extended.iter().filter(|&&e| e).count() as u8;

    let distances = finger_distances(frame);
    let finger_spread = distances.adjacent_tips.iter().sum::<f32>() / 4.0;

    let palm_center = palm_center(frame);
    let thumb_offset = frame.joint(THUMB_TIP) - palm_center;

    FeatureBundle {
        fingers_extended,
        extended_count,
        finger_angles,
        distances,
        palm_center,
        palm_orientation: palm_orientation(frame),
        palm_normal: palm_normal(frame),
        palm_size: (frame.joint(MIDDLE_MCP) - frame.joint(WRIST)).norm(),
        hand_direction: unit(frame.joint(MIDDLE_TIP) - frame.joint(WRIST)),
        thumb_direction: unit(frame.joint(THUMB_TIP) - frame.joint(THUMB_MCP)),
        finger_spread,
        thumb_position: ThumbPosition {
            offset: thumb_offset,
            distance: thumb_offset.norm(),
        },
    }
}

fn finger_angles(frame: &JointFrame) -> [f32; 5] {
    Finger::ALL.map(|finger| {
        let [base, mid, distal, _] = finger.joints();
        joint_angle(frame.joint(base), frame.joint(mid), frame.joint(distal))
    })
}

/// Majority vote over three independent signals per finger
fn fingers_extended(frame: &JointFrame, angles: &[f32; 5]) -> [bool; 5] {
    let wrist = frame.joint(WRIST);
    let mut extended = [false; 5];

    // Thumb bends sideways, so its signals are lateral
    let thumb_tip = frame.joint(THUMB_TIP);
    let thumb_mcp = frame.joint(THUMB_MCP);
    let thumb_votes = [
        (thumb_tip - wrist).norm() > (thumb_mcp - wrist).norm() * THUMB_DISTANCE_RATIO,
        (thumb_tip.x - frame.joint(INDEX_MCP).x).abs() > THUMB_INDEX_SPREAD,
        (thumb_tip.x - wrist.x).abs() > THUMB_WRIST_OFFSET,
    ];
    extended[Finger::Thumb as usize] = passes(&thumb_votes);

    for finger in &Finger::ALL[1..] {
        let mcp = frame.joint(finger.joints()[0]);
        let tip = frame.joint(finger.tip());
        let votes = [
            tip.y < mcp.y - VERTICAL_MARGIN,
            (tip - wrist).norm() > (mcp - wrist).norm() * WRIST_DISTANCE_RATIO,
            angles[*finger as usize] > STRAIGHT_ANGLE_DEG,
        ];
        extended[*finger as usize] = passes(&votes);
    }

    extended
}

fn passes(votes: &[bool; 3]) -> bool {
    votes.iter().filter(|&&v| v).count() >= EXTENSION_VOTES
}

fn finger_distances(frame: &JointFrame) -> FingerDistances {
    let wrist = frame.joint(WRIST);
    let tip_to_wrist = FINGERTIPS.map(|tip| (frame.joint(tip) - wrist).norm());

    let mut adjacent_tips = [0.0; 4];
    for (i, pair) in FINGERTIPS.windows(2).enumerate() {
        adjacent_tips[i] = (frame.joint(pair[0]) - frame.joint(pair[1])).norm();
    }

    FingerDistances {
        tip_to_wrist,
        adjacent_tips,
        thumb_index: adjacent_tips[0],
    }
}

fn palm_center(frame: &JointFrame) -> Vector3<f32> {
    let sum = [WRIST, INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP]
        .iter()
        .fold(Vector3::zeros(), |acc, &i| acc + frame.joint(i));
    sum / 5.0
}

fn palm_orientation(frame: &JointFrame) -> PalmOrientation {
    let v = frame.joint(MIDDLE_MCP) - frame.joint(WRIST);
    let across = frame.joint(PINKY_MCP) - frame.joint(INDEX_MCP);

    PalmOrientation {
        pitch: (-v.y).atan2((v.x * v.x + v.z * v.z).sqrt()).to_degrees(),
        yaw: v.x.atan2(-v.y).to_degrees(),
        roll: across.y.atan2(across.x).to_degrees(),
    }
}

fn palm_normal(frame: &JointFrame) -> PalmNormal {
    let wrist = frame.joint(WRIST);
    let to_index = frame.joint(INDEX_MCP) - wrist;
    let to_pinky = frame.joint(PINKY_MCP) - wrist;
    let normal = unit(to_index.cross(&to_pinky));

    PalmNormal {
        normal,
        facing_viewer: normal.z > NORMAL_FACING_THRESHOLD,
        facing_away: normal.z < -NORMAL_FACING_THRESHOLD,
    }
}

fn unit(v: Vector3<f32>) -> Vector3<f32> {
    v.try_normalize(1e-6).unwrap_or_else(Vector3::zeros)
}

#[cfg(test)]
pub(crate) mod test_hands {
    //! Synthetic hands in image coordinates, wrist at (0.5, 0.8)

    use super::super::landmarks::*;
    use nalgebra::Vector3;

    fn p(x: f32, y: f32) -> Vector3<f32> {
        Vector3::new(x, y, 0.0)
    }

    /// Fill PIP, DIP and tip on a straight line from MCP
    fn straight(j: &mut [Vector3<f32>; JOINT_COUNT], finger: Finger, mcp: (f32, f32), tip: (f32, f32)) {
        let [m, pip, dip, t] = finger.joints();
        let a = p(mcp.0, mcp.1);
        let b = p(tip.0, tip.1);
        j[m] = a;
        j[pip] = a + (b - a) * 0.4;
        j[dip] = a + (b - a) * 0.7;
        j[t] = b;
    }

    /// Finger folded back toward the palm
    fn curled(j: &mut [Vector3<f32>; JOINT_COUNT], finger: Finger, x: f32, mcp_y: f32) {
        let [m, pip, dip, t] = finger.joints();
        j[m] = p(x, mcp_y);
        j[pip] = p(x, mcp_y - 0.07);
        j[dip] = p(x, mcp_y - 0.02);
        j[t] = p(x, mcp_y + 0.05);
    }

    fn tucked_thumb(j: &mut [Vector3<f32>; JOINT_COUNT]) {
        j[THUMB_CMC] = p(0.45, 0.75);
        j[THUMB_MCP] = p(0.42, 0.70);
        j[THUMB_IP] = p(0.44, 0.65);
        j[THUMB_TIP] = p(0.47, 0.68);
    }

    fn base() -> [Vector3<f32>; JOINT_COUNT] {
        let mut j = [Vector3::zeros(); JOINT_COUNT];
        j[WRIST] = p(0.5, 0.8);
        j
    }

    fn curled_fingers(j: &mut [Vector3<f32>; JOINT_COUNT]) {
        curled(j, Finger::Index, 0.42, 0.55);
        curled(j, Finger::Middle, 0.50, 0.53);
        curled(j, Finger::Ring, 0.57, 0.55);
        curled(j, Finger::Pinky, 0.63, 0.58);
    }

    /// All five fingers straight and spread wide
    pub fn open_palm() -> JointFrame {
        let mut j = base();
        j[THUMB_CMC] = p(0.42, 0.74);
        j[THUMB_MCP] = p(0.36, 0.68);
        j[THUMB_IP] = p(0.31, 0.62);
        j[THUMB_TIP] = p(0.27, 0.56);
        straight(&mut j, Finger::Index, (0.42, 0.55), (0.38, 0.33));
        straight(&mut j, Finger::Middle, (0.50, 0.53), (0.50, 0.30));
        straight(&mut j, Finger::Ring, (0.57, 0.55), (0.61, 0.34));
        straight(&mut j, Finger::Pinky, (0.63, 0.58), (0.70, 0.41));
        JointFrame::new(j)
    }

    /// All five fingers straight and held together, palm toward camera
    pub fn flat_hand() -> JointFrame {
        let mut j = base();
        j[THUMB_CMC] = p(0.42, 0.74);
        j[THUMB_MCP] = p(0.36, 0.68);
        j[THUMB_IP] = p(0.37, 0.55);
        j[THUMB_TIP] = p(0.38, 0.42);
        straight(&mut j, Finger::Index, (0.44, 0.55), (0.46, 0.32));
        straight(&mut j, Finger::Middle, (0.50, 0.53), (0.50, 0.30));
        straight(&mut j, Finger::Ring, (0.55, 0.55), (0.54, 0.32));
        straight(&mut j, Finger::Pinky, (0.60, 0.57), (0.58, 0.36));
        JointFrame::new(j)
    }

    /// Closed fist, palm toward camera
    pub fn fist() -> JointFrame {
        let mut j = base();
        tucked_thumb(&mut j);
        curled_fingers(&mut j);
        JointFrame::new(j)
    }

    /// Thumb out to the left, everything else curled
    pub fn thumb_left() -> JointFrame {
        let mut j = base();
        j[THUMB_CMC] = p(0.45, 0.74);
        j[THUMB_MCP] = p(0.40, 0.70);
        j[THUMB_IP] = p(0.32, 0.69);
        j[THUMB_TIP] = p(0.24, 0.68);
        curled_fingers(&mut j);
        JointFrame::new(j)
    }

    /// Index pointing up, everything else curled
    pub fn index_up() -> JointFrame {
        let mut j = base();
        tucked_thumb(&mut j);
        curled_fingers(&mut j);
        straight(&mut j, Finger::Index, (0.42, 0.55), (0.41, 0.30));
        JointFrame::new(j)
    }

    /// Thumb and index tips touching, other three fingers straight
    pub fn pinch() -> JointFrame {
        let mut j = base();
        j[THUMB_CMC] = p(0.42, 0.74);
        j[THUMB_MCP] = p(0.36, 0.68);
        j[THUMB_IP] = p(0.34, 0.55);
        j[THUMB_TIP] = p(0.35, 0.42);
        straight(&mut j, Finger::Index, (0.42, 0.55), (0.34, 0.40));
        straight(&mut j, Finger::Middle, (0.50, 0.53), (0.50, 0.30));
        straight(&mut j, Finger::Ring, (0.57, 0.55), (0.61, 0.34));
        straight(&mut j, Finger::Pinky, (0.63, 0.58), (0.70, 0.41));
        JointFrame::new(j)
    }

    /// Mirror across x = 0.5 (back of hand toward camera for a palm pose)
    pub fn mirrored(frame: JointFrame) -> JointFrame {
        JointFrame::new((*frame.joints()).map(|v| Vector3::new(1.0 - v.x, v.y, v.z)))
    }

    /// Rotate 180° in the image plane (hand pointing down)
    pub fn upside_down(frame: JointFrame) -> JointFrame {
        JointFrame::new((*frame.joints()).map(|v| Vector3::new(1.0 - v.x, 1.0 - v.y, v.z)))
    }
}

#[cfg(test)]
mod tests {
    use super::test_hands::*;
    use super::*;

    #[test]
    fn test_open_palm_all_extended() {
        let f = extract_features(&open_palm());
        assert_eq!(f.fingers_extended, [true; 5]);
        assert_eq!(f.extended_count, 5);
        assert!(f.finger_spread > 0.10, "spread {}", f.finger_spread);
    }

    #[test]
    fn test_fist_none_extended() {
        let f = extract_features(&fist());
        assert_eq!(f.fingers_extended, [false; 5]);
        assert_eq!(f.extended_count, 0);
    }

    #[test]
    fn test_single_finger_poses() {
        let f = extract_features(&index_up());
        assert!(f.only_extended(Finger::Index));

        let f = extract_features(&thumb_left());
        assert!(f.only_extended(Finger::Thumb));
        assert!(f.thumb_direction.x < -0.9);
    }

    #[test]
    fn test_flat_hand_is_narrow() {
        let f = extract_features(&flat_hand());
        assert_eq!(f.extended_count, 5);
        assert!(f.finger_spread <= 0.10, "spread {}", f.finger_spread);
    }

    #[test]
    fn test_extended_count_matches_flags() {
        let frames = [
            open_palm(),
            flat_hand(),
            fist(),
            thumb_left(),
            index_up(),
            pinch(),
            mirrored(open_palm()),
            upside_down(fist()),
            upside_down(open_palm()),
        ];
        for frame in frames {
            let f = extract_features(&frame);
            let flags = f.fingers_extended.iter().filter(|&&e| e).count() as u8;
            assert_eq!(f.extended_count, flags);
            assert!(f.extended_count <= 5);
        }
    }

    #[test]
    fn test_palm_normal_sides() {
        let f = extract_features(&fist());
        assert!(f.palm_normal.facing_viewer);
        assert!(!f.palm_normal.facing_away);
        assert!((f.palm_normal.normal.norm() - 1.0).abs() < 1e-4);

        let f = extract_features(&mirrored(fist()));
        assert!(f.palm_normal.facing_away);
        assert!(!f.palm_normal.facing_viewer);
    }

    #[test]
    fn test_orientation_upright_and_inverted() {
        let f = extract_features(&open_palm());
        assert!((f.palm_orientation.pitch - 90.0).abs() < 1.0);
        assert!(f.palm_orientation.yaw.abs() < 1.0);
        assert!(f.hand_direction.y < -0.99);

        let f = extract_features(&upside_down(open_palm()));
        assert!((f.palm_orientation.pitch + 90.0).abs() < 1.0);
        assert!(f.hand_direction.y > 0.99);
    }

    #[test]
    fn test_distances_and_palm_geometry() {
        let frame = pinch();
        let f = extract_features(&frame);
        assert!(f.distances.thumb_index < 0.05);
        assert_eq!(f.distances.thumb_index, f.distances.adjacent_tips[0]);

        let expected_size = (frame.joint(MIDDLE_MCP) - frame.joint(WRIST)).norm();
        assert!((f.palm_size - expected_size).abs() < 1e-6);

        let offset = frame.joint(THUMB_TIP) - f.palm_center;
        assert!((f.thumb_position.distance - offset.norm()).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_frame_has_zero_directions() {
        let frame = JointFrame::new([Vector3::new(0.5, 0.5, 0.0); 21]);
        let f = extract_features(&frame);
        assert_eq!(f.hand_direction, Vector3::zeros());
        assert_eq!(f.thumb_direction, Vector3::zeros());
        assert!(!f.palm_normal.facing_viewer && !f.palm_normal.facing_away);
    }
}
