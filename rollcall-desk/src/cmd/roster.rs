//! Read-only views: `list`, `counts`, `log`

use clap::Args;
use rollcall_common::{Counts, Partition, RosterManager, RosterSession};

use super::Selection;
use crate::render;

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub selection: Selection,
}

#[derive(Args, Debug)]
pub struct LogArgs {
    /// Only the most recent N entries
    #[arg(long)]
    pub tail: Option<usize>,
}

pub fn run_list(args: &ListArgs, session: &RosterSession) {
    let listing = args.selection.listing(session.roster());
    for line in render::listing_lines(&listing) {
        println!("{}", line);
    }
}

/// Totals for one partition
pub fn partition_counts(roster: &RosterManager, partition: Partition) -> Counts {
    Counts {
        total: roster.records(partition).len(),
        present: roster.count_present(Some(partition)),
        evacuated: roster.count_evacuated(Some(partition)),
    }
}

pub fn counts_lines(roster: &RosterManager) -> Vec<String> {
    let mut lines: Vec<String> = Partition::ALL
        .iter()
        .map(|p| render::counts_line(p.label(), &partition_counts(roster, *p)))
        .collect();
    lines.push(render::counts_line("All", &roster.counts()));
    lines
}

pub fn run_counts(session: &RosterSession) {
    for line in counts_lines(session.roster()) {
        println!("{}", line);
    }
}

pub fn run_log(args: &LogArgs, session: &RosterSession) {
    for line in render::log_lines(session.log(), args.tail) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_common::{Age, PersonRecord};

    #[test]
    fn test_counts_per_partition_and_total() {
        let mut roster = RosterManager::new();
        let mut present = PersonRecord::new("A", "a", "g", Age::Years(1), "f");
        present.present = true;
        present.evacuated = true;
        roster.replace_partition(
            Partition::Guest,
            vec![present, PersonRecord::new("B", "b", "g", Age::Years(2), "m")],
        );
        roster.replace_partition(
            Partition::Team,
            vec![PersonRecord::new("C", "c", "g", Age::Years(3), "f")],
        );

        let lines = counts_lines(&roster);
        assert_eq!(lines[0], "Guests: 1 present, 1 evacuated, 2 total");
        assert_eq!(lines[1], "Team: 0 present, 0 evacuated, 1 total");
        assert_eq!(lines[2], "All: 1 present, 1 evacuated, 3 total");
    }
}
