use std::collections::BTreeMap;
use std::fmt;

use uuid::Uuid;

/// Session-local identity of a record. Never sent to the spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(pub String);

impl ClientId {
    pub fn generate() -> Self {
        ClientId(Uuid::new_v4().simple().to_string())
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 1-based spreadsheet row, the key for update and delete mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowIndex(pub u32);

impl From<RowIndex> for u32 {
    fn from(value: RowIndex) -> Self {
        value.0
    }
}

impl fmt::Display for RowIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncState {
    #[default]
    Confirmed,
    /// The endpoint accepted the request but did not report an outcome.
    Unconfirmed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRecord {
    pub client_id: ClientId,
    pub row_index: Option<RowIndex>,
    pub sync: SyncState,
    pub values: BTreeMap<String, String>,
}

impl ServiceRecord {
    pub fn new(row_index: Option<RowIndex>) -> Self {
        Self {
            client_id: ClientId::generate(),
            row_index,
            sync: SyncState::Confirmed,
            values: BTreeMap::new(),
        }
    }

    pub fn get(&self, field_id: &str) -> &str {
        self.values.get(field_id).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field_id: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field_id.into(), value.into());
    }

    #[cfg(test)]
    pub fn with_value(mut self, field_id: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field_id, value);
        self
    }
}
