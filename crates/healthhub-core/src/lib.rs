//! # HealthHub Core Library
//!
//! Core business logic for HealthHub, a small personal-health toolkit.
//! It implements a CLI-first philosophy where all operations are available
//! via a standalone CLI binary; capture and rendering front ends are thin
//! layers over the same core library.
//!
//! ## Architecture
//!
//! - **Exercise Detector**: a caller-driven state machine fed one landmark
//!   frame per captured video frame; classifies smoothed joint angles into
//!   repetitions (push-up, squat) or hold duration (plank)
//! - **Reminder Store**: JSON-document reminder persistence with an
//!   exact-match due query
//! - **Content Catalog**: read-only JSON directories of topics, schemes,
//!   hospitals and articles
//! - **Storage**: TOML-based configuration and data-directory resolution
//!
//! ## Key Components
//!
//! - [`ExerciseDetector`]: exercise detection state machine
//! - [`ReminderStore`]: reminder persistence
//! - [`Catalog`]: content lookups
//! - [`Config`]: application configuration management

pub mod catalog;
pub mod error;
pub mod events;
pub mod exercise;
pub mod storage;

pub use catalog::{Article, Catalog, Hospital, Scheme, Topic};
pub use error::{CatalogError, ConfigError, CoreError, DetectError, StoreError};
pub use events::Event;
pub use exercise::{
    joint_angle, now_ms, AngleWindow, Exercise, ExerciseDetector, Joint, LandmarkFrame, Point,
    SessionState,
};
pub use storage::{Config, Reminder, ReminderDraft, ReminderStore};
