use serde::{Deserialize, Serialize};

/// Column type as reported by the spreadsheet export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColumnType {
    #[default]
    String,
    Number,
    Boolean,
    Date,
    DateTime,
    TimeOfDay,
    Other,
}

impl ColumnType {
    pub fn from_export(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "string" => ColumnType::String,
            "number" => ColumnType::Number,
            "boolean" => ColumnType::Boolean,
            "date" => ColumnType::Date,
            "datetime" => ColumnType::DateTime,
            "timeofday" => ColumnType::TimeOfDay,
            _ => ColumnType::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub id: String,
    pub label: String,
    pub column_type: ColumnType,
}

impl FieldDescriptor {
    /// Builds the descriptor for the column at `index` of the raw export.
    /// Ids stay tied to the raw position so records survive header reordering.
    pub fn at(index: usize, label: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            id: format!("col{index}"),
            label: label.into(),
            column_type,
        }
    }

    pub fn lower_label(&self) -> String {
        self.label.to_lowercase()
    }
}

/// Semantic role of a column. Drives table layout, form widgets and the
/// derived category/price statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    Serial,
    Identifier,
    Duration,
    Price,
    Category,
    Description,
    Text,
}

impl FieldRole {
    pub fn is_read_only(self) -> bool {
        matches!(self, FieldRole::Identifier)
    }
}
