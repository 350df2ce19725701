use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::cell::CellValue;
use crate::domain::entities::field::ColumnType;
use crate::domain::entities::service::RowIndex;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("Failed to fetch data: {0}")]
    Status(u16),
    #[error("Failed to load service data: {0}")]
    Transport(String),
    #[error("Malformed sheet export: {0}")]
    Malformed(String),
    #[error("No data found in the sheet")]
    NoData,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Could not determine the row index for {0} this service")]
    MissingRowIndex(&'static str),
    #[error("endpoint answered with status {0}")]
    Status(u16),
    #[error("{0}")]
    Transport(String),
    #[error("rejected by the sheet script: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub label: String,
    pub column_type: ColumnType,
}

/// Spreadsheet export with the wrapper removed but no interpretation applied:
/// every column, including the trailing control column, and every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<RawColumn>,
    pub rows: Vec<Vec<CellValue>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Insert { row_data: Vec<String> },
    Update { row_index: RowIndex, row_data: Vec<String> },
    Delete { row_index: RowIndex },
}

impl Mutation {
    pub fn action(&self) -> &'static str {
        match self {
            Mutation::Insert { .. } => "insert",
            Mutation::Update { .. } => "update",
            Mutation::Delete { .. } => "delete",
        }
    }

    pub fn row_index(&self) -> Option<RowIndex> {
        match self {
            Mutation::Insert { .. } => None,
            Mutation::Update { row_index, .. } | Mutation::Delete { row_index } => Some(*row_index),
        }
    }

    pub fn row_data(&self) -> Option<&[String]> {
        match self {
            Mutation::Insert { row_data } | Mutation::Update { row_data, .. } => Some(row_data),
            Mutation::Delete { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationAck {
    /// The script reported success; inserts may carry the new sheet row.
    Confirmed { row_index: Option<RowIndex> },
    /// The request went through but the response carried no verdict.
    Unconfirmed,
}

#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch_table(&self) -> Result<RawTable, LoadError>;
}

#[async_trait]
pub trait MutationSink: Send + Sync {
    async fn submit(&self, mutation: Mutation) -> Result<MutationAck, SubmissionError>;
}
