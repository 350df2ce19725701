use std::collections::BTreeMap;

use crate::domain::entities::field::{FieldDescriptor, FieldRole};
use crate::domain::headers::is_serial_label;

/// Role assignments supplied by configuration, keyed by column label
/// (matched case-insensitively).
pub type RoleOverrides = BTreeMap<String, FieldRole>;

/// Role a column gets from its label alone. Identifier-like labels (any
/// label containing "no") win over every other keyword, so "Serial No" is an
/// identifier while a bare "Serial" stays an editable serial field.
pub fn role_from_label(label: &str) -> FieldRole {
    let lower = label.to_lowercase();
    if lower.contains("no") {
        FieldRole::Identifier
    } else if is_serial_label(&lower) {
        FieldRole::Serial
    } else if lower.contains("duration") {
        FieldRole::Duration
    } else if lower.contains("price") {
        FieldRole::Price
    } else if lower.contains("category") {
        FieldRole::Category
    } else if lower.contains("description") {
        FieldRole::Description
    } else {
        FieldRole::Text
    }
}

/// Ordered fields plus the semantic role of every column, resolved once per
/// load so that rendering and statistics never re-inspect label text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSchema {
    fields: Vec<FieldDescriptor>,
    roles: BTreeMap<String, FieldRole>,
    serial: Option<String>,
    category: Option<String>,
    price: Option<String>,
}

impl FieldSchema {
    pub fn resolve(fields: Vec<FieldDescriptor>, overrides: &RoleOverrides) -> Self {
        let overrides: BTreeMap<String, FieldRole> = overrides
            .iter()
            .map(|(label, role)| (label.trim().to_lowercase(), *role))
            .collect();

        let mut roles = BTreeMap::new();
        let mut explicit = BTreeMap::new();
        for field in &fields {
            let lower = field.label.trim().to_lowercase();
            let role = match overrides.get(&lower) {
                Some(role) => {
                    explicit.insert(field.id.clone(), *role);
                    *role
                }
                None => role_from_label(&field.label),
            };
            roles.insert(field.id.clone(), role);
        }

        let find = |role: FieldRole, matches_label: &dyn Fn(&str) -> bool| {
            fields
                .iter()
                .find(|field| explicit.get(&field.id) == Some(&role))
                .or_else(|| {
                    fields.iter().find(|field| {
                        !explicit.contains_key(&field.id) && matches_label(&field.label)
                    })
                })
                .map(|field| field.id.clone())
        };

        let serial = find(FieldRole::Serial, &is_serial_label);
        let category = find(FieldRole::Category, &|label: &str| {
            label.to_lowercase().contains("category")
        });
        let price = find(FieldRole::Price, &|label: &str| label.to_lowercase().contains("price"));

        Self {
            fields,
            roles,
            serial,
            category,
            price,
        }
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn role(&self, field_id: &str) -> FieldRole {
        self.roles.get(field_id).copied().unwrap_or(FieldRole::Text)
    }

    pub fn serial_field(&self) -> Option<&str> {
        self.serial.as_deref()
    }

    pub fn category_field(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn price_field(&self) -> Option<&str> {
        self.price.as_deref()
    }
}
