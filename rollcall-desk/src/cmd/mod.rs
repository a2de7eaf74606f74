//! Desk subcommands
//!
//! Commands that act on one person address it by the row number printed by
//! `rollcall list`, given the same partition, query and sort. The row is
//! resolved to a person id against a fresh listing before anything changes.

pub mod edit;
pub mod import;
pub mod roster;
pub mod watch;

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use rollcall_common::{Listing, Partition, PersonId, RosterManager, SortKey};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    #[default]
    Group,
    Name,
    FirstName,
    Age,
    Gender,
    Present,
    Evacuated,
    Note,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Group => SortKey::Group,
            SortArg::Name => SortKey::Name,
            SortArg::FirstName => SortKey::FirstName,
            SortArg::Age => SortKey::Age,
            SortArg::Gender => SortKey::Gender,
            SortArg::Present => SortKey::Present,
            SortArg::Evacuated => SortKey::Evacuated,
            SortArg::Note => SortKey::Note,
        }
    }
}

/// Which rows are shown, and in what order
#[derive(Args, Debug, Clone, Default)]
pub struct Selection {
    /// Restrict to one partition (guest or team)
    #[arg(short, long)]
    pub partition: Option<Partition>,

    /// Case-insensitive match on name, first name or group
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Sort column
    #[arg(long, value_enum, default_value_t = SortArg::Group)]
    pub sort: SortArg,
}

impl Selection {
    pub fn listing(&self, roster: &RosterManager) -> Listing {
        let matches = roster.search(&self.query, self.partition);
        let rows = roster.sort_by(Some(matches), self.sort.into());
        Listing::new(self.partition, rows)
    }
}

/// Person shown at 1-based `row` of `listing`
pub fn pick(listing: &Listing, row: usize) -> Result<PersonId> {
    if row == 0 {
        bail!("Row numbers start at 1");
    }
    match listing.id_at(row - 1) {
        Some(id) => Ok(id),
        None => bail!("No row {} (listing has {} rows)", row, listing.len()),
    }
}

/// 1-based row of `id` in `listing`, the inverse of [`pick`]
pub fn row_of(listing: &Listing, id: PersonId) -> Option<usize> {
    listing.iter().position(|p| p.id == id).map(|i| i + 1)
}
