use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::entities::catalog::Category;
use crate::domain::entities::field::FieldRole;
use crate::domain::entities::service::ServiceRecord;
use crate::domain::format::{digits_only, strip_thousands};
use crate::domain::schema::FieldSchema;

/// Option value that switches a category field to free text.
pub const ADD_NEW_CATEGORY: &str = "new-category";
pub const SERIAL_PREFIX: &str = "SD-";

static FIRST_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid integer pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldWidget {
    ReadOnly,
    Duration,
    Price,
    CategoryChoice(Vec<String>),
    Description,
    Text,
}

pub fn widget_for(role: FieldRole, categories: &[Category], free_text: bool) -> FieldWidget {
    match role {
        FieldRole::Identifier => FieldWidget::ReadOnly,
        FieldRole::Duration => FieldWidget::Duration,
        FieldRole::Price => FieldWidget::Price,
        FieldRole::Category if !free_text && !categories.is_empty() => FieldWidget::CategoryChoice(
            categories.iter().map(|category| category.name.clone()).collect(),
        ),
        FieldRole::Description => FieldWidget::Description,
        FieldRole::Category | FieldRole::Serial | FieldRole::Text => FieldWidget::Text,
    }
}

/// `"45"` and `"45min"` both become `"45 min"`; input without digits clears
/// the value.
pub fn format_duration_input(raw: &str) -> String {
    let digits = digits_only(raw);
    if digits.is_empty() {
        String::new()
    } else {
        format!("{digits} min")
    }
}

/// Next serial after the largest number found in existing serial values,
/// zero-padded to three digits.
pub fn next_serial<'a>(existing: impl IntoIterator<Item = &'a str>) -> String {
    let max = existing
        .into_iter()
        .filter_map(|value| FIRST_INTEGER.find(value))
        .filter_map(|found| found.as_str().parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("{SERIAL_PREFIX}{:03}", max + 1)
}

/// Values in field order, as sent to the mutation endpoint.
pub fn row_data(schema: &FieldSchema, record: &ServiceRecord) -> Vec<String> {
    schema
        .fields()
        .iter()
        .map(|field| record.get(&field.id).to_string())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub mode: FormMode,
    pub draft: ServiceRecord,
    pub free_text_categories: BTreeSet<String>,
}

impl FormState {
    pub fn create(schema: &FieldSchema, records: &[ServiceRecord]) -> Self {
        let mut draft = ServiceRecord::new(None);
        for field in schema.fields() {
            draft.set(field.id.clone(), "");
        }
        if let Some(serial_field) = schema.serial_field() {
            let serial = next_serial(records.iter().map(|record| record.get(serial_field)));
            draft.set(serial_field, serial);
        }
        Self {
            mode: FormMode::Create,
            draft,
            free_text_categories: BTreeSet::new(),
        }
    }

    pub fn edit(record: &ServiceRecord) -> Self {
        Self {
            mode: FormMode::Edit,
            draft: record.clone(),
            free_text_categories: BTreeSet::new(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add New Service",
            FormMode::Edit => "Edit Service",
        }
    }

    pub fn widget(&self, schema: &FieldSchema, field_id: &str, categories: &[Category]) -> FieldWidget {
        widget_for(
            schema.role(field_id),
            categories,
            self.free_text_categories.contains(field_id),
        )
    }

    /// Value shown inside the input element for a field.
    pub fn input_value(&self, schema: &FieldSchema, field_id: &str) -> String {
        let stored = self.draft.get(field_id);
        match schema.role(field_id) {
            FieldRole::Duration => digits_only(stored),
            FieldRole::Price => strip_thousands(stored),
            _ => stored.to_string(),
        }
    }

    pub fn apply_input(&mut self, schema: &FieldSchema, field_id: &str, raw: &str) {
        let role = schema.role(field_id);
        if role.is_read_only() {
            return;
        }
        let value = match role {
            FieldRole::Duration => format_duration_input(raw),
            FieldRole::Category if raw == ADD_NEW_CATEGORY => {
                self.free_text_categories.insert(field_id.to_string());
                String::new()
            }
            _ => raw.to_string(),
        };
        self.draft.set(field_id, value);
    }
}
