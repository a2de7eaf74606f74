//! Plain-text rendering of roster views

use rollcall_common::{Counts, EventLogEntry, Listing, PersonRecord};

fn mark(flag: bool) -> &'static str {
    if flag {
        "x"
    } else {
        " "
    }
}

/// One numbered roster line; `row` is 1-based
pub fn person_line(row: usize, person: &PersonRecord) -> String {
    let mut line = format!(
        "{:>4}  [{}] [{}]  {:<20} {:<16} {:<12} {:>5}  {}",
        row,
        mark(person.present),
        mark(person.evacuated),
        person.name,
        person.first_name,
        person.group,
        person.age.to_string(),
        person.gender,
    );
    if !person.note.is_empty() {
        line.push_str("  # ");
        line.push_str(&person.note);
    }
    line
}

pub fn listing_lines(listing: &Listing) -> Vec<String> {
    let mut lines = vec![format!(
        "{:>4}  {:<3} {:<3}  {:<20} {:<16} {:<12} {:>5}  {}",
        "#", "in", "ev", "Name", "First name", "Group", "Age", "Gender"
    )];
    lines.extend(
        listing
            .iter()
            .enumerate()
            .map(|(i, person)| person_line(i + 1, person)),
    );
    lines
}

pub fn counts_line(label: &str, counts: &Counts) -> String {
    format!(
        "{}: {} present, {} evacuated, {} total",
        label, counts.present, counts.evacuated, counts.total
    )
}

/// The last `tail` entries (all of them for `None`), oldest first
pub fn log_lines(log: &[EventLogEntry], tail: Option<usize>) -> Vec<String> {
    let start = tail.map(|n| log.len().saturating_sub(n)).unwrap_or(0);
    log[start..].iter().map(EventLogEntry::display_line).collect()
}
