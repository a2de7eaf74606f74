//! Person record: one tracked individual and their status fields

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Process-unique identifier of a person record
///
/// Generated at construction and never reused within a process. Records
/// reloaded from a store get fresh ids, so ids are a session-local address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(Uuid);

impl PersonId {
    pub fn generate() -> Self {
        PersonId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for PersonId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(PersonId)
    }
}

/// Age as delivered by the import source: a number of years or free text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Age {
    Years(i64),
    Text(String),
}

impl Age {
    /// Interpret an imported field
    ///
    /// Integers and whole floats (spreadsheet cells like `42.0`) become
    /// `Years`; everything else is kept verbatim.
    pub fn from_field(field: &str) -> Self {
        let trimmed = field.trim();
        if let Ok(years) = trimmed.parse::<i64>() {
            return Age::Years(years);
        }
        if let Ok(value) = trimmed.parse::<f64>() {
            if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
                return Age::Years(value as i64);
            }
        }
        Age::Text(field.to_string())
    }

    /// Numeric view used when sorting by age
    pub fn years(&self) -> Option<i64> {
        match self {
            Age::Years(y) => Some(*y),
            Age::Text(t) => t.trim().parse().ok(),
        }
    }
}

impl Default for Age {
    fn default() -> Self {
        Age::Years(0)
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Age::Years(y) => write!(f, "{}", y),
            Age::Text(t) => f.write_str(t),
        }
    }
}

impl Serialize for Age {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Age::Years(y) => serializer.serialize_i64(*y),
            Age::Text(t) => serializer.serialize_str(t),
        }
    }
}

impl<'de> Deserialize<'de> for Age {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AgeVisitor;

        impl<'de> Visitor<'de> for AgeVisitor {
            type Value = Age;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an integer or a string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Age, E> {
                Ok(Age::Years(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Age, E> {
                Ok(i64::try_from(v)
                    .map(Age::Years)
                    .unwrap_or_else(|_| Age::Text(v.to_string())))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Age, E> {
                Ok(Age::from_field(&v.to_string()))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Age, E> {
                Ok(Age::Text(v.to_string()))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Age, E> {
                Ok(Age::Text(String::new()))
            }
        }

        deserializer.deserialize_any(AgeVisitor)
    }
}

/// One tracked individual
///
/// Invariant: `evacuated` is only ever true while `present` is true.
/// `RosterManager` maintains it; constructing a record directly with both
/// flags set inconsistently is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: PersonId,
    /// Last name
    pub name: String,
    pub first_name: String,
    /// Travel or work group, the default sort key
    pub group: String,
    pub age: Age,
    pub gender: String,
    pub present: bool,
    pub evacuated: bool,
    pub note: String,
}

impl PersonRecord {
    pub fn new(
        name: impl Into<String>,
        first_name: impl Into<String>,
        group: impl Into<String>,
        age: Age,
        gender: impl Into<String>,
    ) -> Self {
        Self {
            id: PersonId::generate(),
            name: name.into(),
            first_name: first_name.into(),
            group: group.into(),
            age,
            gender: gender.into(),
            present: false,
            evacuated: false,
            note: String::new(),
        }
    }

    /// Blank record created by "add entry"
    pub fn placeholder() -> Self {
        Self::new("New", "Entry", "Group", Age::Years(0), "Unknown")
    }

    /// "First Last", as written to the event log
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.name)
    }

    /// Field-for-field equality ignoring `id`
    pub fn same_fields(&self, other: &PersonRecord) -> bool {
        self.name == other.name
            && self.first_name == other.first_name
            && self.group == other.group
            && self.age == other.age
            && self.gender == other.gender
            && self.present == other.present
            && self.evacuated == other.evacuated
            && self.note == other.note
    }
}
