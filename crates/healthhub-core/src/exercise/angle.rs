//! Joint angle computation and smoothing.
//!
//! Raw per-frame angles are noisy; the detectors smooth them with a small
//! fixed-capacity window before applying thresholds.

use std::collections::VecDeque;

use super::landmarks::Point;

/// Guards the division when an endpoint coincides with the vertex.
const NORM_EPSILON: f64 = 1e-6;

/// Number of recent angles averaged before threshold checks.
pub const SMOOTHING_WINDOW: usize = 5;

/// Angle in degrees at `vertex`, formed by the segments to `a` and `c`.
///
/// Standard dot-product formula. The cosine is clamped to `[-1, 1]` before
/// the inverse cosine so floating-point overshoot cannot produce NaN, and
/// the denominator carries a small epsilon so degenerate input (an endpoint
/// on the vertex) yields a finite value instead of dividing by zero.
/// Result is always within `[0, 180]` for finite input.
pub fn joint_angle(a: Point, vertex: Point, c: Point) -> f64 {
    let (vax, vay) = (a.x - vertex.x, a.y - vertex.y);
    let (vcx, vcy) = (c.x - vertex.x, c.y - vertex.y);

    let dot = vax * vcx + vay * vcy;
    let norm_a = (vax * vax + vay * vay).sqrt();
    let norm_c = (vcx * vcx + vcy * vcy).sqrt();

    let cosine = dot / (norm_a * norm_c + NORM_EPSILON);
    cosine.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Fixed-capacity FIFO of recent angles, oldest evicted first.
///
/// The reported value for threshold logic is the arithmetic mean of the
/// current contents.
#[derive(Debug, Clone)]
pub struct AngleWindow {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl AngleWindow {
    pub fn new() -> Self {
        Self::with_capacity(SMOOTHING_WINDOW)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a raw angle, evicting the oldest sample once full.
    pub fn push(&mut self, angle: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(angle);
    }

    /// Mean of the current contents, or `None` before the first sample.
    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }

    /// Push `angle` and report the smoothed value.
    pub fn smooth(&mut self, angle: f64) -> f64 {
        self.push(angle);
        self.mean().unwrap_or(angle)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl Default for AngleWindow {
    fn default() -> Self {
        Self::new()
    }
}
