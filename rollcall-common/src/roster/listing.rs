//! Rendered roster snapshots
//!
//! A listing is what a presentation layer draws: filtered, sorted, frozen.
//! Row positions are only meaningful against the listing they came from, so
//! callers turn a visible row into a `PersonId` here and mutate by id.

use crate::partition::Partition;
use crate::person::{PersonId, PersonRecord};

#[derive(Debug, Clone, Default)]
pub struct Listing {
    partition: Option<Partition>,
    rows: Vec<PersonRecord>,
}

impl Listing {
    pub fn new(partition: Option<Partition>, rows: Vec<PersonRecord>) -> Self {
        Self { partition, rows }
    }

    /// Id of the record shown at `row` (zero-based); `None` past the end
    pub fn id_at(&self, row: usize) -> Option<PersonId> {
        self.rows.get(row).map(|r| r.id)
    }

    pub fn partition(&self) -> Option<Partition> {
        self.partition
    }

    pub fn rows(&self) -> &[PersonRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersonRecord> {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::Age;

    #[test]
    fn test_id_at_maps_rows() {
        let a = PersonRecord::new("A", "a", "g", Age::Years(1), "x");
        let b = PersonRecord::new("B", "b", "g", Age::Years(2), "x");
        let (ida, idb) = (a.id, b.id);
        let listing = Listing::new(Some(Partition::Guest), vec![a, b]);

        assert_eq!(listing.id_at(0), Some(ida));
        assert_eq!(listing.id_at(1), Some(idb));
        assert_eq!(listing.id_at(2), None);
        assert_eq!(listing.len(), 2);
        assert_eq!(listing.partition(), Some(Partition::Guest));
    }
}
