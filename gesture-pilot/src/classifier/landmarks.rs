//! Hand joint frame
//!
//! One frame of the 21 MediaPipe hand landmarks. x and y are normalized to
//! the image (y grows downward), z is relative depth.

use nalgebra::Vector3;

use crate::error::{PilotError, Result};

// ============================================================================
// HAND LANDMARK INDICES
// ============================================================================

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

pub const JOINT_COUNT: usize = 21;

/// Length of a flat `[x, y, z, x, y, z, ...]` landmark buffer
pub const FLAT_LEN: usize = JOINT_COUNT * 3;

/// Fingertips in thumb-to-pinky order
pub const FINGERTIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// The five fingers, in the order used by every per-finger array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// Joint indices from base to tip: [base, mid, distal, tip]
    ///
    /// For the thumb the base is CMC; for the others it is MCP.
    pub fn joints(&self) -> [usize; 4] {
        match self {
            Finger::Thumb => [THUMB_CMC, THUMB_MCP, THUMB_IP, THUMB_TIP],
            Finger::Index => [INDEX_MCP, INDEX_PIP, INDEX_DIP, INDEX_TIP],
            Finger::Middle => [MIDDLE_MCP, MIDDLE_PIP, MIDDLE_DIP, MIDDLE_TIP],
            Finger::Ring => [RING_MCP, RING_PIP, RING_DIP, RING_TIP],
            Finger::Pinky => [PINKY_MCP, PINKY_PIP, PINKY_DIP, PINKY_TIP],
        }
    }

    pub fn tip(&self) -> usize {
        self.joints()[3]
    }
}

/// One observed hand pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointFrame {
    joints: [Vector3<f32>; JOINT_COUNT],
}

impl JointFrame {
    pub fn new(joints: [Vector3<f32>; JOINT_COUNT]) -> Self {
        Self { joints }
    }

    /// Parse a flat Float32Array of 63 values (21 joints × x, y, z)
    pub fn from_flat(data: &[f32]) -> Result<Self> {
        if data.len() != FLAT_LEN {
            return Err(PilotError::InvalidLandmarks {
                len: data.len(),
                expected: FLAT_LEN,
            });
        }

        let mut joints = [Vector3::zeros(); JOINT_COUNT];
        for (i, chunk) in data.chunks_exact(3).enumerate() {
            joints[i] = Vector3::new(chunk[0], chunk[1], chunk[2]);
        }
        Ok(Self { joints })
    }

    pub fn joint(&self, index: usize) -> Vector3<f32> {
        self.joints[index]
    }

    pub fn joints(&self) -> &[Vector3<f32>; JOINT_COUNT] {
        &self.joints
    }
}
