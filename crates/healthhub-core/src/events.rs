use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::exercise::Exercise;

/// Every detector state change of user interest produces an Event.
/// The CLI renders them as console lines; an overlay collaborator can
/// consume the same stream for on-screen display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// User selected an exercise mode; that mode's tally was zeroed.
    ExerciseSelected {
        exercise: Exercise,
        at: DateTime<Utc>,
    },
    /// A full repetition (down then up) was counted.
    RepCounted {
        exercise: Exercise,
        count: u32,
        at: DateTime<Utc>,
    },
    /// Body entered the plank position; a new hold timer started.
    PlankStarted {
        at: DateTime<Utc>,
    },
    /// Body left the plank position after a sustained hold.
    PlankBroken {
        held_secs: u64,
        at: DateTime<Utc>,
    },
    /// Session ended; final tallies.
    SessionEnded {
        push_ups: u32,
        squats: u32,
        plank_secs: u64,
        at: DateTime<Utc>,
    },
    /// Full display snapshot of the detector.
    StateSnapshot {
        exercise: Exercise,
        push_ups: u32,
        squats: u32,
        plank_secs: u64,
        smoothed_angle: Option<f64>,
        at: DateTime<Utc>,
    },
}
