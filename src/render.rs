//! Terminal rendering for juhannus types.

use chrono::DateTime;
use chrono_tz::Tz;
use juhannus_core::{Event, Participant};
use owo_colors::OwoColorize;

pub const DATETIME_FORMAT: &str = "%a %Y-%m-%d %H:%M:%S %Z";

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        let title = format!("☀ {self}").bold().to_string();

        match (self.result, self.is_final) {
            (Some(result), true) => format!("{title}  {}", format!("result {result}").green()),
            (Some(result), false) => {
                format!("{title}  {}", format!("result {result} (preliminary)").yellow())
            }
            (None, _) => title,
        }
    }
}

impl Render for Participant {
    fn render(&self) -> String {
        format!(
            "{:<32} {:>3}  {}",
            self.name,
            self.vote.bold(),
            self.id.to_string().dimmed()
        )
    }
}

impl Render for DateTime<Tz> {
    fn render(&self) -> String {
        self.format(DATETIME_FORMAT).to_string()
    }
}

pub fn voting_state(open: bool) -> String {
    if open {
        "voting open".green().to_string()
    } else {
        "voting closed".red().to_string()
    }
}
