//! Shared API request/response types
//!
//! Payloads are field-for-field mirrors of `PersonRecord` and
//! `EventLogEntry`. Ids never travel over the wire: every side that rebuilds
//! records from a payload assigns fresh ids.
//!
//! # Endpoints
//!
//! - `GET /individuals/{partition}` → `Vec<PersonPayload>`
//! - `POST /individuals/{partition}` ← `Vec<PersonPayload>` (full overwrite)
//! - `GET /log` → `Vec<EventLogEntry>`
//! - `POST /log` ← `AppendLogRequest`
//! - `POST /clear`

use serde::{Deserialize, Serialize};

use crate::person::{Age, PersonRecord};
use crate::store::decode::deserialize_flag;

/// Person record as transferred over HTTP
///
/// # Examples
///
/// ```
/// use rollcall_common::api::types::PersonPayload;
///
/// let payload: PersonPayload = serde_json::from_str(
///     r#"{"name":"Smith","first_name":"Anna","group":"Blue","age":34,
///         "gender":"f","present":"yes","evacuated":0,"note":""}"#,
/// ).unwrap();
/// assert!(payload.present);
/// assert!(!payload.evacuated);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonPayload {
    pub name: String,
    pub first_name: String,
    pub group: String,
    pub age: Age,
    pub gender: String,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub present: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub evacuated: bool,
    #[serde(default)]
    pub note: String,
}

impl From<&PersonRecord> for PersonPayload {
    fn from(p: &PersonRecord) -> Self {
        Self {
            name: p.name.clone(),
            first_name: p.first_name.clone(),
            group: p.group.clone(),
            age: p.age.clone(),
            gender: p.gender.clone(),
            present: p.present,
            evacuated: p.evacuated,
            note: p.note.clone(),
        }
    }
}

impl PersonPayload {
    /// Rebuild a record with a fresh id; evacuated is dropped for absent people
    pub fn into_record(self) -> PersonRecord {
        let mut record = PersonRecord::new(
            self.name,
            self.first_name,
            self.group,
            self.age,
            self.gender,
        );
        record.present = self.present;
        record.evacuated = self.present && self.evacuated;
        record.note = self.note;
        record
    }
}

/// Body of `POST /log`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppendLogRequest {
    pub full_name: String,
    pub group: String,
    pub status_text: String,
}

/// Error body returned by rollcall-server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
