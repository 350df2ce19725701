use dioxus::prelude::{use_signal, Signal};

use crate::domain::catalog_state::CatalogState;
use crate::domain::delete::DeleteFlow;
use crate::domain::filter::CategoryFilter;
use crate::domain::form::FormState;
use crate::domain::notification::{NotificationTimings, Notifier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed(String),
}

pub struct AppState {
    pub catalog: Signal<CatalogState>,
    pub load_status: Signal<LoadStatus>,
    pub loaded_at: Signal<Option<String>>,
    pub reload_token: Signal<u64>,
    pub selected_category: Signal<CategoryFilter>,
    pub search: Signal<String>,
    pub form: Signal<Option<FormState>>,
    pub delete_flow: Signal<DeleteFlow>,
    pub submitting: Signal<bool>,
    pub notifier: Signal<Notifier>,
    pub new_category_name: Signal<String>,
}

impl AppState {
    pub fn new(timings: NotificationTimings) -> Self {
        Self {
            catalog: use_signal(CatalogState::default),
            load_status: use_signal(|| LoadStatus::Loading),
            loaded_at: use_signal(|| None::<String>),
            reload_token: use_signal(|| 0_u64),
            selected_category: use_signal(CategoryFilter::default),
            search: use_signal(String::new),
            form: use_signal(|| None::<FormState>),
            delete_flow: use_signal(DeleteFlow::default),
            submitting: use_signal(|| false),
            notifier: use_signal(|| Notifier::new(timings)),
            new_category_name: use_signal(String::new),
        }
    }
}
