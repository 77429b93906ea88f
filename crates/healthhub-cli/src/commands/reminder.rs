use clap::Subcommand;
use healthhub_core::{Reminder, ReminderDraft, ReminderStore};

#[derive(Subcommand)]
pub enum ReminderAction {
    /// Set a new reminder
    Add {
        /// Time of day, HH:MM
        #[arg(long)]
        time: String,
        /// Date, YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Label shown with the notification
        #[arg(long)]
        label: Option<String>,
        /// Extra fields as KEY=VALUE, stored as-is
        #[arg(long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },
    /// List all reminders
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show unnotified reminders due at a given minute (defaults to now)
    Due {
        /// Time to check, HH:MM
        #[arg(long)]
        at: Option<String>,
        /// Date to check, YYYY-MM-DD
        #[arg(long)]
        on: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a reminder as notified
    Done {
        /// Reminder id
        id: String,
    },
    /// Delete a reminder
    Delete {
        /// Reminder id
        id: String,
    },
}

pub fn run(action: ReminderAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = ReminderStore::open()?;
    match action {
        ReminderAction::Add {
            time,
            date,
            label,
            fields,
        } => {
            let mut extra = serde_json::Map::new();
            if let Some(label) = label {
                extra.insert("label".to_string(), serde_json::Value::String(label));
            }
            for field in fields {
                let (key, value) = field
                    .split_once('=')
                    .ok_or_else(|| format!("invalid field '{field}', expected KEY=VALUE"))?;
                extra.insert(
                    key.to_string(),
                    serde_json::Value::String(value.to_string()),
                );
            }
            let added = store.add(ReminderDraft { time, date, extra })?;
            tracing::debug!(id = %added.id, "reminder persisted");
            println!("reminder set: {}", added.id);
        }
        ReminderAction::List { json } => {
            let all = store.list_all();
            if json {
                println!("{}", serde_json::to_string_pretty(&all)?);
            } else if all.is_empty() {
                println!("no reminders");
            } else {
                for r in &all {
                    print_line(r);
                }
            }
        }
        ReminderAction::Due { at, on, json } => {
            let now = chrono::Local::now();
            let time = at.unwrap_or_else(|| now.format("%H:%M").to_string());
            let date = on.unwrap_or_else(|| now.format("%Y-%m-%d").to_string());
            let due = store.due_now(&time, &date);
            if json {
                println!("{}", serde_json::to_string_pretty(&due)?);
            } else if due.is_empty() {
                println!("nothing due at {date} {time}");
            } else {
                for r in &due {
                    print_line(r);
                }
            }
        }
        ReminderAction::Done { id } => {
            store.mark_notified(&id)?;
            println!("ok");
        }
        ReminderAction::Delete { id } => {
            store.delete(&id)?;
            println!("ok");
        }
    }
    Ok(())
}

fn print_line(r: &Reminder) {
    let label = r
        .extra
        .get("label")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let flag = if r.notified { " [notified]" } else { "" };
    println!("{}  {} {}  {label}{flag}", r.id, r.date, r.time);
}
