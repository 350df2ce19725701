use crate::domain::entities::service::ServiceRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    pub fn title(&self) -> String {
        match self {
            CategoryFilter::All => "All Services".to_string(),
            CategoryFilter::Named(name) => format!("{name} Services"),
        }
    }

    fn matches(&self, record: &ServiceRecord, category_field: Option<&str>) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => {
                category_field.is_some_and(|field_id| record.get(field_id) == name)
            }
        }
    }
}

fn matches_search(record: &ServiceRecord, needle: &str) -> bool {
    needle.is_empty()
        || record
            .values
            .values()
            .any(|value| value.to_lowercase().contains(needle))
}

/// Records passing both the category filter and the free-text search, in
/// input order.
pub fn visible<'a>(
    records: &'a [ServiceRecord],
    category_field: Option<&str>,
    filter: &CategoryFilter,
    search: &str,
) -> Vec<&'a ServiceRecord> {
    let needle = search.to_lowercase();
    records
        .iter()
        .filter(|record| filter.matches(record, category_field))
        .filter(|record| matches_search(record, &needle))
        .collect()
}
