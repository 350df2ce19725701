use crate::domain::entities::catalog::{Category, Stats, NO_CATEGORY};
use crate::domain::entities::service::{ClientId, ServiceRecord};
use crate::domain::filter::{visible, CategoryFilter};
use crate::domain::format::parse_price;
use crate::domain::schema::FieldSchema;

/// Everything the catalog screen shows, replaced wholesale on load and
/// patched by [`reduce`] afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogState {
    pub schema: FieldSchema,
    pub records: Vec<ServiceRecord>,
    pub categories: Vec<Category>,
    pub stats: Stats,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
    Loaded(CatalogState),
    Created(ServiceRecord),
    Updated(ServiceRecord),
    Deleted(ServiceRecord),
    CategoryAdded(String),
}

impl CatalogState {
    pub fn from_records(schema: FieldSchema, records: Vec<ServiceRecord>) -> Self {
        let categories = derive_categories(&schema, &records);
        let stats = compute_stats(&schema, &records, &categories);
        Self {
            schema,
            records,
            categories,
            stats,
        }
    }

    pub fn category_of<'a>(&self, record: &'a ServiceRecord) -> Option<&'a str> {
        self.schema
            .category_field()
            .map(|field_id| record.get(field_id))
            .filter(|name| !name.is_empty())
    }

    pub fn visible(&self, filter: &CategoryFilter, search: &str) -> Vec<&ServiceRecord> {
        visible(&self.records, self.schema.category_field(), filter, search)
    }

    pub fn find(&self, client_id: &ClientId) -> Option<&ServiceRecord> {
        self.records.iter().find(|record| &record.client_id == client_id)
    }
}

/// Distinct non-empty category values in first-seen order with their counts.
pub fn derive_categories(schema: &FieldSchema, records: &[ServiceRecord]) -> Vec<Category> {
    let Some(field_id) = schema.category_field() else {
        return Vec::new();
    };
    let mut categories: Vec<Category> = Vec::new();
    for record in records {
        let name = record.get(field_id);
        if name.is_empty() {
            continue;
        }
        match categories.iter_mut().find(|category| category.name == name) {
            Some(category) => category.count += 1,
            None => categories.push(Category {
                id: categories.len() as u32 + 1,
                name: name.to_string(),
                count: 1,
            }),
        }
    }
    categories
}

/// The average divides by the total record count, not by the number of
/// parseable prices.
pub fn compute_stats(schema: &FieldSchema, records: &[ServiceRecord], categories: &[Category]) -> Stats {
    let avg_price = match schema.price_field() {
        Some(field_id) if !records.is_empty() => {
            let total: f64 = records
                .iter()
                .filter_map(|record| parse_price(record.get(field_id)))
                .sum();
            total / records.len() as f64
        }
        _ => 0.0,
    };

    Stats {
        total_services: records.len(),
        avg_price,
        most_popular: most_popular(categories),
    }
}

/// Highest count wins; ties keep the first category seen.
pub fn most_popular(categories: &[Category]) -> String {
    let mut best: Option<&Category> = None;
    for category in categories {
        if category.count > best.map(|b| b.count).unwrap_or(0) {
            best = Some(category);
        }
    }
    best.map(|category| category.name.clone())
        .unwrap_or_else(|| NO_CATEGORY.to_string())
}

fn increment_category(categories: &mut Vec<Category>, name: &str) {
    match categories.iter_mut().find(|category| category.name == name) {
        Some(category) => category.count += 1,
        None => categories.push(Category {
            id: categories.len() as u32 + 1,
            name: name.to_string(),
            count: 1,
        }),
    }
}

fn decrement_category(categories: &mut Vec<Category>, name: &str) {
    if let Some(category) = categories.iter_mut().find(|category| category.name == name) {
        category.count = category.count.saturating_sub(1);
    }
    categories.retain(|category| category.name != name || category.count > 0);
}

pub fn reduce(mut state: CatalogState, event: CatalogEvent) -> CatalogState {
    match event {
        CatalogEvent::Loaded(loaded) => loaded,
        CatalogEvent::Created(record) => {
            if let Some(name) = state.category_of(&record).map(str::to_string) {
                increment_category(&mut state.categories, &name);
            }
            state.records.insert(0, record);
            state.stats.total_services += 1;
            state
        }
        CatalogEvent::Updated(record) => {
            let Some(position) = state
                .records
                .iter()
                .position(|existing| existing.client_id == record.client_id)
            else {
                return state;
            };
            let previous = state.category_of(&state.records[position]).map(str::to_string);
            let next = state.category_of(&record).map(str::to_string);
            if previous != next {
                if let Some(name) = previous {
                    decrement_category(&mut state.categories, &name);
                }
                if let Some(name) = next {
                    increment_category(&mut state.categories, &name);
                }
            }
            state.records[position] = record;
            state
        }
        CatalogEvent::Deleted(record) => {
            let before = state.records.len();
            state
                .records
                .retain(|existing| existing.client_id != record.client_id);
            if state.records.len() == before {
                return state;
            }
            if let Some(name) = state.category_of(&record).map(str::to_string) {
                decrement_category(&mut state.categories, &name);
            }
            state.stats.total_services = state.stats.total_services.saturating_sub(1);
            state
        }
        CatalogEvent::CategoryAdded(name) => {
            let name = name.trim();
            if !name.is_empty() && !state.categories.iter().any(|category| category.name == name) {
                let id = state.categories.len() as u32 + 1;
                state.categories.push(Category {
                    id,
                    name: name.to_string(),
                    count: 0,
                });
            }
            state
        }
    }
}
