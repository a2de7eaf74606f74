//! In-memory roster for a session
//!
//! The manager owns both partitions and is the only place status flags are
//! mutated. All mutation is addressed by `PersonId`; presentation code that
//! works with row positions resolves them through a [`Listing`] first.

mod listing;

pub use listing::Listing;

use std::cmp::Ordering;
use tracing::debug;

use crate::events::StatusChange;
use crate::partition::Partition;
use crate::person::{Age, PersonId, PersonRecord};
use crate::store::decode::decode_flag;

/// One imported row: name, first name, group, age, gender, then optionally
/// present, evacuated and note
pub type Row = Vec<String>;

/// Minimum number of fields a row needs to become a record
pub const MIN_ROW_FIELDS: usize = 5;

/// Outcome of a bulk load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub skipped: usize,
}

/// Running totals shown next to the roster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub present: usize,
    pub evacuated: usize,
}

/// Sortable roster columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Group,
    Name,
    FirstName,
    Age,
    Gender,
    /// Present first
    Present,
    /// Evacuated first
    Evacuated,
    Note,
}

#[derive(Debug, Default)]
pub struct RosterManager {
    guests: Vec<PersonRecord>,
    team: Vec<PersonRecord>,
}

impl RosterManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn bucket(&self, partition: Partition) -> &Vec<PersonRecord> {
        match partition {
            Partition::Guest => &self.guests,
            Partition::Team => &self.team,
        }
    }

    fn bucket_mut(&mut self, partition: Partition) -> &mut Vec<PersonRecord> {
        match partition {
            Partition::Guest => &mut self.guests,
            Partition::Team => &mut self.team,
        }
    }

    fn find_mut(&mut self, id: PersonId) -> Option<(Partition, &mut PersonRecord)> {
        if let Some(p) = self.guests.iter_mut().find(|p| p.id == id) {
            return Some((Partition::Guest, p));
        }
        self.team
            .iter_mut()
            .find(|p| p.id == id)
            .map(|p| (Partition::Team, p))
    }

    /// Replace `partition` with records built from `rows`
    pub fn load<I>(&mut self, partition: Partition, rows: I) -> LoadSummary
    where
        I: IntoIterator<Item = Row>,
    {
        self.bucket_mut(partition).clear();
        self.append(partition, rows)
    }

    /// Add records built from `rows` to the end of `partition`
    pub fn append<I>(&mut self, partition: Partition, rows: I) -> LoadSummary
    where
        I: IntoIterator<Item = Row>,
    {
        let mut summary = LoadSummary::default();
        let bucket = self.bucket_mut(partition);
        for row in rows {
            match record_from_row(&row) {
                Some(record) => {
                    bucket.push(record);
                    summary.loaded += 1;
                }
                None => summary.skipped += 1,
            }
        }
        debug!(
            partition = %partition,
            loaded = summary.loaded,
            skipped = summary.skipped,
            "Loaded roster rows"
        );
        summary
    }

    /// Install records read back from a store
    pub fn replace_partition(&mut self, partition: Partition, records: Vec<PersonRecord>) {
        *self.bucket_mut(partition) = records;
    }

    /// Append a placeholder record and return its id
    pub fn add_entry(&mut self, partition: Partition) -> PersonId {
        let record = PersonRecord::placeholder();
        let id = record.id;
        self.bucket_mut(partition).push(record);
        id
    }

    pub fn clear(&mut self) {
        self.guests.clear();
        self.team.clear();
    }

    pub fn records(&self, partition: Partition) -> &[PersonRecord] {
        self.bucket(partition)
    }

    /// Full roster: guests followed by team
    pub fn iter(&self) -> impl Iterator<Item = &PersonRecord> {
        self.guests.iter().chain(self.team.iter())
    }

    fn iter_tagged(&self) -> impl Iterator<Item = (Partition, &PersonRecord)> {
        self.guests
            .iter()
            .map(|p| (Partition::Guest, p))
            .chain(self.team.iter().map(|p| (Partition::Team, p)))
    }

    pub fn get(&self, id: PersonId) -> Option<&PersonRecord> {
        self.iter().find(|p| p.id == id)
    }

    pub fn partition_of(&self, id: PersonId) -> Option<Partition> {
        self.iter_tagged().find(|(_, p)| p.id == id).map(|(t, _)| t)
    }

    pub fn len(&self) -> usize {
        self.guests.len() + self.team.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flip presence; leaving also clears evacuation
    pub fn toggle_presence(&mut self, id: PersonId) -> Option<StatusChange> {
        let (_, person) = self.find_mut(id)?;
        person.present = !person.present;
        if person.present {
            Some(StatusChange::Arrived)
        } else {
            person.evacuated = false;
            Some(StatusChange::Left)
        }
    }

    /// Flip evacuation; refused for anyone not marked present
    pub fn toggle_evacuated(&mut self, id: PersonId) -> Option<StatusChange> {
        let (_, person) = self.find_mut(id)?;
        if !person.present {
            debug!(%id, "Ignoring evacuation toggle for absent person");
            return None;
        }
        person.evacuated = !person.evacuated;
        if person.evacuated {
            Some(StatusChange::Evacuated)
        } else {
            Some(StatusChange::EvacuationCleared)
        }
    }

    /// Replace the note text; returns false for an unknown id
    pub fn update_note(&mut self, id: PersonId, text: impl Into<String>) -> bool {
        match self.find_mut(id) {
            Some((_, person)) => {
                person.note = text.into();
                true
            }
            None => false,
        }
    }

    fn scoped(&self, partition: Option<Partition>) -> Box<dyn Iterator<Item = &PersonRecord> + '_> {
        match partition {
            Some(p) => Box::new(self.bucket(p).iter()),
            None => Box::new(self.iter()),
        }
    }

    pub fn count_present(&self, partition: Option<Partition>) -> usize {
        self.scoped(partition).filter(|p| p.present).count()
    }

    pub fn count_evacuated(&self, partition: Option<Partition>) -> usize {
        self.scoped(partition).filter(|p| p.evacuated).count()
    }

    /// Totals over both partitions
    pub fn counts(&self) -> Counts {
        Counts {
            total: self.len(),
            present: self.count_present(None),
            evacuated: self.count_evacuated(None),
        }
    }

    /// Case-insensitive substring match on name, first name or group
    pub fn search(&self, query: &str, partition: Option<Partition>) -> Vec<PersonRecord> {
        let needle = query.to_lowercase();
        self.iter_tagged()
            .filter(|(tag, _)| partition.map_or(true, |p| p == *tag))
            .filter(|(_, p)| {
                p.name.to_lowercase().contains(&needle)
                    || p.first_name.to_lowercase().contains(&needle)
                    || p.group.to_lowercase().contains(&needle)
            })
            .map(|(_, p)| p.clone())
            .collect()
    }

    /// Stable, case-insensitive ascending sort by group
    ///
    /// Sorts `records` if given, otherwise a copy of the full roster.
    pub fn sort_by_group(&self, records: Option<Vec<PersonRecord>>) -> Vec<PersonRecord> {
        self.sort_by(records, SortKey::Group)
    }

    pub fn sort_by(&self, records: Option<Vec<PersonRecord>>, key: SortKey) -> Vec<PersonRecord> {
        let mut records = records.unwrap_or_else(|| self.iter().cloned().collect());
        records.sort_by(|a, b| compare_by(a, b, key));
        records
    }

    /// Search then group-sort, ready for rendering
    pub fn listing(&self, partition: Option<Partition>, query: &str) -> Listing {
        let rows = self.sort_by_group(Some(self.search(query, partition)));
        Listing::new(partition, rows)
    }
}

fn record_from_row(row: &[String]) -> Option<PersonRecord> {
    if row.len() < MIN_ROW_FIELDS {
        return None;
    }
    let mut record = PersonRecord::new(
        row[0].as_str(),
        row[1].as_str(),
        row[2].as_str(),
        Age::from_field(&row[3]),
        row[4].as_str(),
    );
    record.present = row.get(5).map(|f| decode_flag(f)).unwrap_or(false);
    record.evacuated = record.present && row.get(6).map(|f| decode_flag(f)).unwrap_or(false);
    if let Some(note) = row.get(7) {
        record.note = note.clone();
    }
    Some(record)
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn compare_by(a: &PersonRecord, b: &PersonRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Group => compare_text(&a.group, &b.group),
        SortKey::Name => compare_text(&a.name, &b.name),
        SortKey::FirstName => compare_text(&a.first_name, &b.first_name),
        SortKey::Gender => compare_text(&a.gender, &b.gender),
        SortKey::Note => compare_text(&a.note, &b.note),
        SortKey::Present => b.present.cmp(&a.present),
        SortKey::Evacuated => b.evacuated.cmp(&a.evacuated),
        // Numeric ages first, then free text
        SortKey::Age => match (a.age.years(), b.age.years()) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => compare_text(&a.age.to_string(), &b.age.to_string()),
        },
    }
}
