//! Exercise detection state machine.
//!
//! The detector is a caller-driven state machine. It does not own a camera
//! or a clock - the caller feeds it one landmark frame per captured frame
//! along with the current wall-clock time in epoch milliseconds.
//!
//! ## Usage
//!
//! ```ignore
//! let mut detector = ExerciseDetector::new();
//! detector.select(Exercise::PushUp);
//! // In the capture loop:
//! if let Some(event) = detector.observe(&frame, now_ms())? {
//!     // render / log the event
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::angle::{joint_angle, AngleWindow};
use super::landmarks::{Joint, LandmarkFrame};
use crate::error::DetectError;
use crate::events::Event;

/// Smoothed elbow angle below this marks the bottom of a push-up.
pub const PUSH_UP_DOWN_DEG: f64 = 90.0;
/// Smoothed elbow angle above this completes a push-up once down.
pub const PUSH_UP_UP_DEG: f64 = 150.0;
/// Smoothed knee angle below this marks the bottom of a squat.
pub const SQUAT_DOWN_DEG: f64 = 90.0;
/// Smoothed knee angle above this completes a squat once down.
pub const SQUAT_UP_DEG: f64 = 160.0;
/// Shoulder/hip vertical separation (normalized) below which the body
/// counts as horizontal, i.e. in plank position.
pub const PLANK_LEVEL_EPSILON: f64 = 0.1;

/// Exercise modes. `Demo` tracks nothing; it is the idle pose-display mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exercise {
    #[default]
    Demo,
    PushUp,
    Squat,
    Plank,
}

impl Exercise {
    /// Display label for overlays and console lines.
    pub fn label(&self) -> &'static str {
        match self {
            Exercise::Demo => "Demo",
            Exercise::PushUp => "Push-ups",
            Exercise::Squat => "Squats",
            Exercise::Plank => "Plank",
        }
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Exercise::Demo => "demo",
            Exercise::PushUp => "pushup",
            Exercise::Squat => "squat",
            Exercise::Plank => "plank",
        };
        f.write_str(name)
    }
}

impl FromStr for Exercise {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "demo" => Ok(Exercise::Demo),
            "pushup" => Ok(Exercise::PushUp),
            "squat" => Ok(Exercise::Squat),
            "plank" => Ok(Exercise::Plank),
            other => Err(format!(
                "unknown exercise '{other}' (expected demo, pushup, squat or plank)"
            )),
        }
    }
}

/// Outcome of feeding one frame to the plank rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlankTransition {
    /// Out of position, and was not holding before.
    Idle,
    /// Entered the plank position this frame; a new hold timer started.
    Started,
    /// Still in position; duration updated.
    Holding,
    /// Left the position after a sustained hold.
    Broken { held_secs: u64 },
}

/// Per-session exercise tallies and in-progress transition flags.
///
/// A plain value object: the threshold rules below mutate it directly, so
/// every transition is testable without driving a camera.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub push_ups: u32,
    pub squats: u32,
    /// Whole seconds of the current (or last sustained) plank hold.
    pub plank_secs: u64,
    push_up_down: bool,
    squat_down: bool,
    plank_holding: bool,
    plank_started_ms: Option<u64>,
}

impl SessionState {
    /// Push-up hysteresis: going below the down threshold arms the rep,
    /// rising past the up threshold while armed counts it. Returns true
    /// when a rep was counted this call.
    pub fn apply_push_up(&mut self, smoothed_angle: f64) -> bool {
        if smoothed_angle < PUSH_UP_DOWN_DEG {
            self.push_up_down = true;
        } else if smoothed_angle > PUSH_UP_UP_DEG && self.push_up_down {
            self.push_ups += 1;
            self.push_up_down = false;
            return true;
        }
        false
    }

    /// Squat hysteresis, same pattern with the squat thresholds.
    pub fn apply_squat(&mut self, smoothed_angle: f64) -> bool {
        if smoothed_angle < SQUAT_DOWN_DEG {
            self.squat_down = true;
        } else if smoothed_angle > SQUAT_UP_DEG && self.squat_down {
            self.squats += 1;
            self.squat_down = false;
            return true;
        }
        false
    }

    /// Plank hold rule. `in_position` is the caller's horizontal-body check
    /// for this frame; `now_ms` is wall-clock epoch milliseconds.
    ///
    /// Leaving the position drops the hold timer but keeps `plank_secs` at
    /// its last value until a new hold starts.
    pub fn apply_plank(&mut self, in_position: bool, now_ms: u64) -> PlankTransition {
        if in_position {
            let entered = if self.plank_holding {
                false
            } else {
                self.plank_holding = true;
                self.plank_started_ms = Some(now_ms);
                true
            };
            if let Some(start) = self.plank_started_ms {
                self.plank_secs = now_ms.saturating_sub(start) / 1000;
            }
            if entered {
                PlankTransition::Started
            } else {
                PlankTransition::Holding
            }
        } else {
            let was_holding = self.plank_holding;
            self.plank_holding = false;
            self.plank_started_ms = None;
            if was_holding {
                PlankTransition::Broken {
                    held_secs: self.plank_secs,
                }
            } else {
                PlankTransition::Idle
            }
        }
    }
}

/// Core exercise detector.
///
/// Holds the active mode, the session tallies and the shared smoothing
/// window. One `observe()` call per captured frame.
#[derive(Debug, Clone, Default)]
pub struct ExerciseDetector {
    exercise: Exercise,
    state: SessionState,
    window: AngleWindow,
}

impl ExerciseDetector {
    /// New detector in demo mode with zeroed tallies.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn exercise(&self) -> Exercise {
        self.exercise
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Mean of the smoothing window, `None` before the first sample.
    pub fn smoothed_angle(&self) -> Option<f64> {
        self.window.mean()
    }

    /// Build a full display snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            exercise: self.exercise,
            push_ups: self.state.push_ups,
            squats: self.state.squats,
            plank_secs: self.state.plank_secs,
            smoothed_angle: self.window.mean(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Switch exercise mode. Zeroes the selected mode's tally only; the
    /// other modes' tallies and in-progress flags are left as they are,
    /// and the smoothing window carries over across the switch.
    pub fn select(&mut self, exercise: Exercise) -> Event {
        match exercise {
            Exercise::PushUp => self.state.push_ups = 0,
            Exercise::Squat => self.state.squats = 0,
            Exercise::Plank => self.state.plank_secs = 0,
            Exercise::Demo => {}
        }
        self.exercise = exercise;
        Event::ExerciseSelected {
            exercise,
            at: Utc::now(),
        }
    }

    /// Feed one landmark frame. Returns an event on a counted rep or a
    /// plank transition; `now_ms` is wall-clock epoch milliseconds.
    ///
    /// A joint required by the active mode but absent from the frame is
    /// invalid input and returns [`DetectError::MissingLandmark`].
    pub fn observe(
        &mut self,
        frame: &LandmarkFrame,
        now_ms: u64,
    ) -> Result<Option<Event>, DetectError> {
        match self.exercise {
            Exercise::Demo => Ok(None),
            Exercise::PushUp => {
                let shoulder = frame.require(Joint::LeftShoulder)?;
                let elbow = frame.require(Joint::LeftElbow)?;
                let wrist = frame.require(Joint::LeftWrist)?;
                let smoothed = self.window.smooth(joint_angle(shoulder, elbow, wrist));
                if self.state.apply_push_up(smoothed) {
                    return Ok(Some(Event::RepCounted {
                        exercise: Exercise::PushUp,
                        count: self.state.push_ups,
                        at: Utc::now(),
                    }));
                }
                Ok(None)
            }
            Exercise::Squat => {
                let hip = frame.require(Joint::LeftHip)?;
                let knee = frame.require(Joint::LeftKnee)?;
                let ankle = frame.require(Joint::LeftAnkle)?;
                let smoothed = self.window.smooth(joint_angle(hip, knee, ankle));
                if self.state.apply_squat(smoothed) {
                    return Ok(Some(Event::RepCounted {
                        exercise: Exercise::Squat,
                        count: self.state.squats,
                        at: Utc::now(),
                    }));
                }
                Ok(None)
            }
            Exercise::Plank => {
                let shoulder = frame.require(Joint::LeftShoulder)?;
                let hip = frame.require(Joint::LeftHip)?;
                let in_position = (shoulder.y - hip.y).abs() < PLANK_LEVEL_EPSILON;
                match self.state.apply_plank(in_position, now_ms) {
                    PlankTransition::Started => Ok(Some(Event::PlankStarted { at: Utc::now() })),
                    PlankTransition::Broken { held_secs } => Ok(Some(Event::PlankBroken {
                        held_secs,
                        at: Utc::now(),
                    })),
                    PlankTransition::Idle | PlankTransition::Holding => Ok(None),
                }
            }
        }
    }

    /// End the session, yielding the final tallies.
    pub fn finish(&self) -> Event {
        Event::SessionEnded {
            push_ups: self.state.push_ups,
            squats: self.state.squats,
            plank_secs: self.state.plank_secs,
            at: Utc::now(),
        }
    }
}

/// Current wall-clock time in epoch milliseconds, for capture loops that
/// have no better frame timestamp.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::landmarks::Point;

    /// Frame whose left elbow angle is exactly `deg` degrees.
    fn arm_frame(deg: f64) -> LandmarkFrame {
        let rad = deg.to_radians();
        let mut frame = LandmarkFrame::new();
        frame.insert(Joint::LeftElbow, Point::new(0.0, 0.0));
        frame.insert(Joint::LeftWrist, Point::new(1.0, 0.0));
        frame.insert(Joint::LeftShoulder, Point::new(rad.cos(), rad.sin()));
        frame
    }

    /// Frame whose left knee angle is exactly `deg` degrees.
    fn leg_frame(deg: f64) -> LandmarkFrame {
        let rad = deg.to_radians();
        let mut frame = LandmarkFrame::new();
        frame.insert(Joint::LeftKnee, Point::new(0.0, 0.0));
        frame.insert(Joint::LeftAnkle, Point::new(1.0, 0.0));
        frame.insert(Joint::LeftHip, Point::new(rad.cos(), rad.sin()));
        frame
    }

    /// Frame with shoulder and hip at the given normalized heights.
    fn torso_frame(shoulder_y: f64, hip_y: f64) -> LandmarkFrame {
        let mut frame = LandmarkFrame::new();
        frame.insert(Joint::LeftShoulder, Point::new(0.3, shoulder_y));
        frame.insert(Joint::LeftHip, Point::new(0.6, hip_y));
        frame
    }

    #[test]
    fn push_up_rule_counts_one_rep_per_down_up_pass() {
        let mut state = SessionState::default();
        let mut counted = 0;
        for angle in [100.0, 80.0, 100.0, 160.0] {
            if state.apply_push_up(angle) {
                counted += 1;
            }
        }
        assert_eq!(counted, 1);
        assert_eq!(state.push_ups, 1);
    }

    #[test]
    fn push_up_rule_requires_the_down_phase_first() {
        let mut state = SessionState::default();
        for angle in [100.0, 120.0, 160.0, 175.0] {
            assert!(!state.apply_push_up(angle));
        }
        assert_eq!(state.push_ups, 0);
    }

    #[test]
    fn squat_rule_uses_its_own_thresholds() {
        let mut state = SessionState::default();
        // 155 is above the push-up up threshold but below the squat one.
        for angle in [95.0, 85.0, 155.0] {
            assert!(!state.apply_squat(angle));
        }
        assert!(state.apply_squat(165.0));
        assert_eq!(state.squats, 1);
    }

    #[test]
    fn observe_counts_push_up_through_smoothing() {
        let mut detector = ExerciseDetector::new();
        detector.select(Exercise::PushUp);

        // Five deep-bend frames pull the smoothed angle to 50.
        for _ in 0..5 {
            assert!(detector.observe(&arm_frame(50.0), 0).unwrap().is_none());
        }
        // Extension frames raise the mean: 74, 98, 122, 146 - no rep yet -
        // then 170 crosses the up threshold.
        let mut event = None;
        for _ in 0..5 {
            assert!(event.is_none());
            event = detector.observe(&arm_frame(170.0), 0).unwrap();
        }
        match event {
            Some(Event::RepCounted {
                exercise, count, ..
            }) => {
                assert_eq!(exercise, Exercise::PushUp);
                assert_eq!(count, 1);
            }
            other => panic!("expected RepCounted, got {other:?}"),
        }
        assert_eq!(detector.state().push_ups, 1);
    }

    #[test]
    fn observe_counts_squat_end_to_end() {
        let mut detector = ExerciseDetector::new();
        detector.select(Exercise::Squat);

        for _ in 0..5 {
            detector.observe(&leg_frame(60.0), 0).unwrap();
        }
        let mut reps = 0;
        for _ in 0..6 {
            if detector.observe(&leg_frame(175.0), 0).unwrap().is_some() {
                reps += 1;
            }
        }
        assert_eq!(reps, 1);
        assert_eq!(detector.state().squats, 1);
    }

    #[test]
    fn missing_joint_is_reported_not_swallowed() {
        let mut detector = ExerciseDetector::new();
        detector.select(Exercise::PushUp);

        let mut frame = LandmarkFrame::new();
        frame.insert(Joint::LeftElbow, Point::new(0.4, 0.5));
        frame.insert(Joint::LeftWrist, Point::new(0.4, 0.7));

        let err = detector.observe(&frame, 0).unwrap_err();
        assert!(matches!(err, DetectError::MissingLandmark(Joint::LeftShoulder)));
    }

    #[test]
    fn plank_tracks_whole_seconds_and_restarts_after_break() {
        let mut detector = ExerciseDetector::new();
        detector.select(Exercise::Plank);

        let level = torso_frame(0.5, 0.55);
        let upright = torso_frame(0.3, 0.8);

        assert!(matches!(
            detector.observe(&level, 0).unwrap(),
            Some(Event::PlankStarted { .. })
        ));
        detector.observe(&level, 3_000).unwrap();
        assert_eq!(detector.state().plank_secs, 3);
        detector.observe(&level, 5_400).unwrap();
        assert_eq!(detector.state().plank_secs, 5);

        // Breaking the hold keeps the last duration on display.
        match detector.observe(&upright, 6_000).unwrap() {
            Some(Event::PlankBroken { held_secs, .. }) => assert_eq!(held_secs, 5),
            other => panic!("expected PlankBroken, got {other:?}"),
        }
        assert_eq!(detector.state().plank_secs, 5);

        // A new hold restarts from zero, not from the old duration.
        detector.observe(&level, 10_000).unwrap();
        assert_eq!(detector.state().plank_secs, 0);
        detector.observe(&level, 12_000).unwrap();
        assert_eq!(detector.state().plank_secs, 2);
    }

    #[test]
    fn select_zeroes_only_the_chosen_tally() {
        let mut detector = ExerciseDetector::new();
        detector.state.push_ups = 7;
        detector.state.squats = 4;
        detector.state.plank_secs = 30;

        detector.select(Exercise::PushUp);
        assert_eq!(detector.state().push_ups, 0);
        assert_eq!(detector.state().squats, 4);
        assert_eq!(detector.state().plank_secs, 30);
    }

    #[test]
    fn window_carries_over_across_mode_switch() {
        let mut detector = ExerciseDetector::new();
        detector.select(Exercise::PushUp);
        for _ in 0..5 {
            detector.observe(&arm_frame(170.0), 0).unwrap();
        }

        detector.select(Exercise::Squat);
        // One deep-bend frame: the mean still carries the old 170s,
        // (170 * 4 + 40) / 5 = 144, so the down flag does not arm.
        detector.observe(&leg_frame(40.0), 0).unwrap();
        let smoothed = detector.smoothed_angle().unwrap();
        assert!((smoothed - 144.0).abs() < 1.0);
        assert!(!detector.state().squat_down);
    }

    #[test]
    fn demo_mode_observes_nothing() {
        let mut detector = ExerciseDetector::new();
        assert!(detector.observe(&LandmarkFrame::new(), 0).unwrap().is_none());
    }

    #[test]
    fn snapshot_reflects_mode_and_tallies() {
        let mut detector = ExerciseDetector::new();
        detector.select(Exercise::Squat);
        for _ in 0..3 {
            detector.observe(&leg_frame(120.0), 0).unwrap();
        }
        match detector.snapshot() {
            Event::StateSnapshot {
                exercise,
                squats,
                smoothed_angle,
                ..
            } => {
                assert_eq!(exercise, Exercise::Squat);
                assert_eq!(squats, 0);
                assert!((smoothed_angle.unwrap() - 120.0).abs() < 1e-6);
            }
            other => panic!("expected StateSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn finish_reports_final_tallies() {
        let mut detector = ExerciseDetector::new();
        detector.state.push_ups = 2;
        detector.state.squats = 9;
        match detector.finish() {
            Event::SessionEnded {
                push_ups, squats, ..
            } => {
                assert_eq!(push_ups, 2);
                assert_eq!(squats, 9);
            }
            other => panic!("expected SessionEnded, got {other:?}"),
        }
    }
}
