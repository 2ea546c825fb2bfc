//! Temporal smoothing for gesture recognition
//!
//! Debounces the noisy per-frame classifier output into a stable gesture.
//! A label must win a majority of the consistency window, and a change of
//! stable label must wait out the cooldown since the previous change.

use serde::Serialize;
use tracing::{debug, info};

use crate::buffer::RingBuffer;
use crate::classifier::Gesture;
use crate::config::SmoothingConfig;

use super::sensitivity::Sensitivity;

/// Recent entries inspected for detection loss
const MISS_WINDOW: usize = 10;
/// Misses within `MISS_WINDOW` that drop the stable gesture
const MISS_LIMIT: usize = 7;
/// Share of the consistency window a candidate must hold
const CONSISTENCY_RATIO: f32 = 0.6;
/// Weight kept from the old confidence when the same gesture is re-confirmed
const CONFIDENCE_BLEND: f32 = 0.7;

/// One raw classification as seen by the smoother
#[derive(Debug, Clone, Copy, PartialEq)]
struct Observation {
    gesture: Option<Gesture>,
    confidence: f32,
}

impl Observation {
    const MISS: Observation = Observation {
        gesture: None,
        confidence: 0.0,
    };
}

/// Smoothed output for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SmoothedGesture {
    pub gesture: Option<Gesture>,
    pub confidence: f32,
    /// Set exactly once per confirmed transition
    pub is_new: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmootherStats {
    pub gesture_changes: u64,
    pub rejected_gestures: u64,
    pub current_gesture: Option<Gesture>,
    pub current_confidence: f32,
    pub gesture_duration: f64,
    pub history_size: usize,
    /// `None` when the thresholds match no preset
    pub sensitivity: Option<Sensitivity>,
}

pub struct TemporalSmoother {
    config: SmoothingConfig,
    sensitivity: Option<Sensitivity>,
    history: RingBuffer<Observation>,

    current: Option<Gesture>,
    confidence: f32,
    /// Time of the last confirmed change; `None` until the first one
    last_change: Option<f64>,
    /// Time the current gesture was confirmed
    gesture_start: f64,

    gesture_changes: u64,
    rejected: u64,
}

impl TemporalSmoother {
    pub fn new(config: SmoothingConfig) -> Self {
        let capacity = config.max_history.max(config.consistency_frames);
        let sensitivity = Sensitivity::matching(&config);
        Self {
            config,
            sensitivity,
            history: RingBuffer::new(capacity),
            current: None,
            confidence: 0.0,
            last_change: None,
            gesture_start: 0.0,
            gesture_changes: 0,
            rejected: 0,
        }
    }

    /// Feed one raw classification taken at `now` (seconds)
    pub fn update(&mut self, gesture: Option<Gesture>, confidence: f32, now: f64) -> SmoothedGesture {
        let gesture = match gesture {
            Some(g) if confidence >= self.config.min_confidence => g,
            _ => return self.record_miss(),
        };
        let confidence = confidence.min(1.0);

        self.history.push(Observation {
            gesture: Some(gesture),
            confidence,
        });

        let window = self.config.consistency_frames;
        if self.history.len() < window {
            return self.hold();
        }

        let Some((candidate, count)) = self.most_common(window) else {
            return self.hold();
        };

        let ratio = count as f32 / window as f32;
        if ratio < CONSISTENCY_RATIO {
            self.rejected += 1;
            return self.hold();
        }

        let avg_confidence = self.mean_confidence(candidate, window);

        if Some(candidate) == self.current {
            self.confidence =
                CONFIDENCE_BLEND * self.confidence + (1.0 - CONFIDENCE_BLEND) * avg_confidence;
            return self.hold();
        }

        if let Some(last) = self.last_change {
            if now - last < self.config.cooldown_secs {
                self.rejected += 1;
                debug!(
                    current = ?self.current,
                    candidate = %candidate,
                    "gesture change blocked by cooldown"
                );
                return self.hold();
            }
        }

        info!(
            from = ?self.current,
            to = %candidate,
            confidence = avg_confidence,
            consistency = ratio,
            "gesture changed"
        );
        self.current = Some(candidate);
        self.confidence = avg_confidence;
        self.last_change = Some(now);
        self.gesture_start = now;
        self.gesture_changes += 1;

        SmoothedGesture {
            gesture: self.current,
            confidence: self.confidence,
            is_new: true,
        }
    }

    fn record_miss(&mut self) -> SmoothedGesture {
        self.history.push(Observation::MISS);

        let misses = self
            .history
            .recent(MISS_WINDOW)
            .filter(|o| o.gesture.is_none())
            .count();
        if misses >= MISS_LIMIT {
            if let Some(previous) = self.current {
                debug!(gesture = %previous, "clearing gesture after repeated misses");
            }
            self.current = None;
            self.confidence = 0.0;
        }

        self.hold()
    }

    /// Most frequent gesture in the last `window` entries that still clears
    /// the current confidence floor
    fn most_common(&self, window: usize) -> Option<(Gesture, usize)> {
        let mut counts = [0usize; Gesture::COUNT];
        for o in self.history.recent(window) {
            if let Some(g) = o.gesture {
                if o.confidence >= self.config.min_confidence {
                    counts[g.index()] += 1;
                }
            }
        }

        Gesture::ALL
            .iter()
            .map(|g| (*g, counts[g.index()]))
            .filter(|(_, count)| *count > 0)
            .max_by_key(|(_, count)| *count)
    }

    fn mean_confidence(&self, gesture: Gesture, window: usize) -> f32 {
        let (sum, n) = self
            .history
            .recent(window)
            .filter(|o| o.gesture == Some(gesture))
            .fold((0.0f32, 0usize), |(sum, n), o| (sum + o.confidence, n + 1));
        if n == 0 {
            0.0
        } else {
            sum / n as f32
        }
    }

    fn hold(&self) -> SmoothedGesture {
        SmoothedGesture {
            gesture: self.current,
            confidence: self.confidence,
            is_new: false,
        }
    }

    pub fn current(&self) -> Option<Gesture> {
        self.current
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn config(&self) -> &SmoothingConfig {
        &self.config
    }

    /// Seconds the current gesture has been stable
    pub fn gesture_duration(&self, now: f64) -> f64 {
        match self.current {
            Some(_) => (now - self.gesture_start).max(0.0),
            None => 0.0,
        }
    }

    /// Swap the threshold triple in one step
    pub fn set_sensitivity(&mut self, level: Sensitivity) {
        level.apply_to(&mut self.config);
        self.sensitivity = Some(level);

        if self.history.capacity() < self.config.consistency_frames {
            let mut grown = RingBuffer::new(self.config.consistency_frames);
            for o in self.history.iter() {
                grown.push(*o);
            }
            self.history = grown;
        }
        info!(level = %level, "sensitivity adjusted");
    }

    /// Drop history and the stable gesture; statistics are kept
    pub fn reset(&mut self) {
        self.history.clear();
        self.current = None;
        self.confidence = 0.0;
        self.last_change = None;
        self.gesture_start = 0.0;
        debug!("temporal smoother reset");
    }

    pub fn reset_stats(&mut self) {
        self.gesture_changes = 0;
        self.rejected = 0;
    }

    pub fn stats(&self, now: f64) -> SmootherStats {
        SmootherStats {
            gesture_changes: self.gesture_changes,
            rejected_gestures: self.rejected,
            current_gesture: self.current,
            current_confidence: self.confidence,
            gesture_duration: self.gesture_duration(now),
            history_size: self.history.len(),
            sensitivity: self.sensitivity,
        }
    }
}

impl Default for TemporalSmoother {
    fn default() -> Self {
        Self::new(SmoothingConfig::default())
    }
}
