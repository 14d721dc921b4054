//! Year substitution for header and body copy.
//!
//! Templates use `$name` or `${name}` placeholders; `$$` is a literal dollar.
//! Unknown placeholders and stray `$` signs are left as written.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::schedule::Schedule;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\$(?:(?P<escaped>\$)|(?P<named>[_a-zA-Z][_a-zA-Z0-9]*)|\{(?P<braced>[_a-zA-Z][_a-zA-Z0-9]*)\})",
    )
    .unwrap_or_else(|e| unreachable!("placeholder pattern is valid: {e}"))
});

/// Day with leading zero, month without: `21.6`
const DEADLINE_FORMAT: &str = "%d.%-m";

/// Year digits with every `0` replaced by `o`: 2020 becomes `2o2o`.
pub fn stylized_year(year: i32) -> String {
    year.to_string().replace('0', "o")
}

/// Characters of `text` separated by single spaces: `2o2o` becomes `2 o 2 o`.
pub fn spaced(text: &str) -> String {
    text.chars()
        .map(String::from)
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// The substitutions available to templates for `year`.
pub fn substitutions(year: i32, schedule: &Schedule) -> HashMap<&'static str, String> {
    let year_text = stylized_year(year);

    HashMap::from([
        ("year_spaced", spaced(&year_text)),
        ("year", year_text),
        (
            "results_deadline",
            schedule.results_deadline(year).format(DEADLINE_FORMAT).to_string(),
        ),
        (
            "voting_deadline",
            schedule.voting_deadline(year).format(DEADLINE_FORMAT).to_string(),
        ),
    ])
}

/// Render `template` for `year`. Never fails on unrecognized placeholders.
pub fn render_text(template: &str, year: i32, schedule: &Schedule) -> String {
    let values = substitutions(year, schedule);

    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            if caps.name("escaped").is_some() {
                return "$".to_string();
            }

            let key = caps
                .name("named")
                .or_else(|| caps.name("braced"))
                .map(|m| m.as_str())
                .unwrap_or_default();

            match values.get(key) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
