use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use clap::Subcommand;
use healthhub_core::{now_ms, Event, Exercise, ExerciseDetector, LandmarkFrame};
use serde::Deserialize;

#[derive(Subcommand)]
pub enum TrainerAction {
    /// Run a detection session over a landmark frame stream
    Run {
        /// Starting exercise mode (demo, pushup, squat, plank)
        #[arg(long, default_value = "demo")]
        exercise: Exercise,
        /// Frame stream file (newline-delimited JSON); stdin when omitted
        #[arg(long)]
        frames: Option<PathBuf>,
        /// Emit events as JSON lines instead of console text
        #[arg(long)]
        json: bool,
    },
}

/// One line of the frame stream: either a landmark frame from the pose
/// model, or a keypress-equivalent control record.
#[derive(Deserialize)]
#[serde(untagged)]
enum InputRecord {
    Control(Control),
    Frame(FrameRecord),
}

#[derive(Deserialize)]
#[serde(tag = "cmd", rename_all = "lowercase")]
enum Control {
    Select { exercise: Exercise },
    Quit,
}

#[derive(Deserialize)]
struct FrameRecord {
    /// Frame timestamp in epoch milliseconds; wall clock when omitted.
    #[serde(default)]
    ts_ms: Option<u64>,
    landmarks: LandmarkFrame,
}

pub fn run(action: TrainerAction) -> Result<(), Box<dyn std::error::Error>> {
    let TrainerAction::Run {
        exercise,
        frames,
        json,
    } = action;

    let reader: Box<dyn BufRead> = match &frames {
        Some(path) => match File::open(path) {
            Ok(file) => Box::new(BufReader::new(file)),
            Err(e) => {
                eprintln!("could not open frame source {}: {e}", path.display());
                eprintln!("check that the recording exists and is readable");
                std::process::exit(1);
            }
        },
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let mut detector = ExerciseDetector::new();
    tracing::debug!(%exercise, "trainer session starting");
    emit(&detector.select(exercise), json)?;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: InputRecord = serde_json::from_str(line)?;
        match record {
            InputRecord::Control(Control::Quit) => break,
            InputRecord::Control(Control::Select { exercise }) => {
                emit(&detector.select(exercise), json)?;
            }
            InputRecord::Frame(frame) => {
                let ts = frame.ts_ms.unwrap_or_else(now_ms);
                if let Some(event) = detector.observe(&frame.landmarks, ts)? {
                    emit(&event, json)?;
                }
            }
        }
    }

    emit(&detector.finish(), json)?;
    Ok(())
}

fn emit(event: &Event, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }
    match event {
        Event::ExerciseSelected { exercise, .. } => {
            println!("{} mode activated", exercise.label());
        }
        Event::RepCounted {
            exercise, count, ..
        } => {
            println!("{}: {count}", exercise.label());
        }
        Event::PlankStarted { .. } => println!("plank hold started"),
        Event::PlankBroken { held_secs, .. } => println!("plank broken after {held_secs}s"),
        Event::SessionEnded {
            push_ups, squats, ..
        } => {
            println!("Session ended");
            println!("Final stats:");
            println!("  Push-ups: {push_ups}");
            println!("  Squats: {squats}");
        }
        Event::StateSnapshot { .. } => {}
    }
    Ok(())
}
