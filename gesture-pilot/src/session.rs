//! Per-session pipeline context
//!
//! One `PilotSession` owns every piece of mutable state for a single tracked
//! hand and a single vehicle: classifier tallies, smoother window, flight
//! model and detection counters. Nothing is shared between sessions.

use serde::Serialize;
use tracing::{debug, info};

use crate::buffer::RingBuffer;
use crate::classifier::{
    extract_features, ClassificationResult, ClassifierStats, GestureClassifier, JointFrame,
};
use crate::config::PilotConfig;
use crate::physics::{CommandResponse, VehicleController, VehicleStatus};
use crate::smoothing::{Sensitivity, SmoothedGesture, SmootherStats, TemporalSmoother};

/// Hand detection counters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetectionStats {
    pub frames_with_hand: u64,
    pub frames_without_hand: u64,
    /// Percent of frames with a hand
    pub success_rate: f64,
    /// Times the smoother was reset after a long detection gap
    pub detection_timeouts: u64,
}

impl DetectionStats {
    fn record(&mut self, hand: bool) {
        if hand {
            self.frames_with_hand += 1;
        } else {
            self.frames_without_hand += 1;
        }
        let total = self.frames_with_hand + self.frames_without_hand;
        self.success_rate = self.frames_with_hand as f64 / total as f64 * 100.0;
    }

    pub fn total_frames(&self) -> u64 {
        self.frames_with_hand + self.frames_without_hand
    }
}

/// Frames kept for the rolling frame rate
const FPS_WINDOW: usize = 30;

/// Throughput counters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceStats {
    pub frames_processed: u64,
    /// Frames per second over the last `FPS_WINDOW` frames
    pub fps: f64,
}

/// Frame timestamps feeding `PerformanceStats`
struct FrameRate {
    times: RingBuffer<f64>,
    frames_processed: u64,
}

impl FrameRate {
    fn new() -> Self {
        Self {
            times: RingBuffer::new(FPS_WINDOW),
            frames_processed: 0,
        }
    }

    fn record(&mut self, now: f64) {
        self.frames_processed += 1;
        self.times.push(now);
    }

    fn fps(&self) -> f64 {
        let (Some(&oldest), Some(&latest)) = (self.times.iter().next(), self.times.latest())
        else {
            return 0.0;
        };
        let span = latest - oldest;
        if self.times.len() < 2 || span <= 0.0 {
            return 0.0;
        }
        (self.times.len() - 1) as f64 / span
    }

    fn stats(&self) -> PerformanceStats {
        PerformanceStats {
            frames_processed: self.frames_processed,
            fps: self.fps(),
        }
    }

    fn clear(&mut self) {
        self.times.clear();
        self.frames_processed = 0;
    }
}

/// Everything that happened for one processed frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub hand_detected: bool,
    /// Classifier output before smoothing
    pub raw: ClassificationResult,
    pub smoothed: SmoothedGesture,
    /// Set when a newly confirmed gesture was sent to the vehicle
    pub command: Option<CommandResponse>,
    pub status: VehicleStatus,
}

/// Result of a direct (non-gesture) command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandReply {
    #[serde(flatten)]
    pub response: CommandResponse,
    pub status: VehicleStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineStats {
    pub detection: DetectionStats,
    pub classifier: ClassifierStats,
    pub smoother: SmootherStats,
    pub performance: PerformanceStats,
}

pub struct PilotSession {
    config: PilotConfig,
    classifier: GestureClassifier,
    smoother: TemporalSmoother,
    vehicle: VehicleController,
    detection: DetectionStats,
    frame_rate: FrameRate,

    last_hand_at: Option<f64>,
    /// Set once the detection gap reset has fired, cleared by the next hand
    timed_out: bool,
    last_tick: Option<f64>,
    /// Most recent timestamp seen by `step` or `tick`
    now: f64,
}

impl PilotSession {
    pub fn new(config: PilotConfig) -> Self {
        let mut smoother = TemporalSmoother::new(config.smoothing.clone());
        if let Some(level) = config.pipeline.sensitivity {
            smoother.set_sensitivity(level);
        }
        let vehicle = VehicleController::new(config.vehicle.clone());

        info!(
            min_confidence = smoother.config().min_confidence,
            consistency_frames = smoother.config().consistency_frames,
            "pilot session created"
        );

        Self {
            config,
            classifier: GestureClassifier::new(),
            smoother,
            vehicle,
            detection: DetectionStats::default(),
            frame_rate: FrameRate::new(),
            last_hand_at: None,
            timed_out: false,
            last_tick: None,
            now: 0.0,
        }
    }

    /// Process one frame taken at `now` (seconds); `None` means no hand
    ///
    /// Physics always advances, whether or not a hand was found.
    pub fn step(&mut self, frame: Option<&JointFrame>, now: f64) -> FrameReport {
        self.detection.record(frame.is_some());
        self.frame_rate.record(now);

        let raw = match frame {
            Some(frame) => {
                self.last_hand_at = Some(now);
                self.timed_out = false;
                let features = extract_features(frame);
                self.classifier.classify(&features)
            }
            None => {
                self.check_detection_gap(now);
                ClassificationResult::NONE
            }
        };

        let smoothed = self.smoother.update(raw.gesture, raw.confidence, now);

        let command = match smoothed.gesture {
            Some(gesture) if smoothed.is_new => {
                Some(self.vehicle.apply_command(gesture.into(), smoothed.confidence))
            }
            Some(gesture) => {
                self.vehicle.keep_alive(gesture);
                None
            }
            None => None,
        };

        self.tick(now);

        FrameReport {
            hand_detected: frame.is_some(),
            raw,
            smoothed,
            command,
            status: self.vehicle.status(),
        }
    }

    fn check_detection_gap(&mut self, now: f64) {
        let Some(last) = self.last_hand_at else {
            return;
        };
        if !self.timed_out && now - last >= self.config.pipeline.detection_timeout_secs {
            self.timed_out = true;
            self.detection.detection_timeouts += 1;
            self.smoother.reset();
            debug!(gap = now - last, "detection timeout, smoother reset");
        }
    }

    /// Advance physics to `now`; returns the dt used
    ///
    /// The first tick of a session uses dt = 0, and time never runs backwards.
    pub fn tick(&mut self, now: f64) -> f64 {
        let dt = match self.last_tick {
            Some(last) => (now - last).max(0.0),
            None => 0.0,
        };
        self.last_tick = Some(self.last_tick.map_or(now, |last| last.max(now)));
        self.now = self.now.max(now);
        self.vehicle.advance(dt);
        dt
    }

    /// Apply a named command at full confidence
    pub fn command(&mut self, name: &str) -> CommandReply {
        let response = self.vehicle.apply_label(name, 1.0);
        CommandReply {
            response,
            status: self.vehicle.status(),
        }
    }

    pub fn stop_movement(&mut self, direction: &str) -> CommandReply {
        let response = self.vehicle.stop_movement(direction);
        CommandReply {
            response,
            status: self.vehicle.status(),
        }
    }

    pub fn set_sensitivity(&mut self, level: Sensitivity) {
        self.smoother.set_sensitivity(level);
    }

    pub fn set_speed_multiplier(&mut self, multiplier: f32) -> f32 {
        self.vehicle.set_speed_multiplier(multiplier)
    }

    pub fn status(&self) -> VehicleStatus {
        self.vehicle.status()
    }

    pub fn statistics(&self) -> PipelineStats {
        PipelineStats {
            detection: self.detection.clone(),
            classifier: self.classifier.stats(),
            smoother: self.smoother.stats(self.now),
            performance: self.frame_rate.stats(),
        }
    }

    /// Reset vehicle, smoother, classifier tallies and detection counters
    pub fn reset(&mut self) {
        self.vehicle.reset();
        self.smoother.reset();
        self.smoother.reset_stats();
        self.classifier.reset_stats();
        self.detection = DetectionStats::default();
        self.frame_rate.clear();
        self.last_hand_at = None;
        self.timed_out = false;
        self.last_tick = None;
        info!("pilot session reset");
    }
}

impl Default for PilotSession {
    fn default() -> Self {
        Self::new(PilotConfig::default())
    }
}
