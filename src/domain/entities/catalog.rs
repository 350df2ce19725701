pub const NO_CATEGORY: &str = "None";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: u32,
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stats {
    pub total_services: usize,
    pub avg_price: f64,
    pub most_popular: String,
}
