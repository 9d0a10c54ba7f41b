use std::sync::Arc;

use dioxus::prelude::{use_signal, Signal};

use crate::domain::entities::table::TableDefaults;
use crate::domain::table::sort::SortPriorities;
use crate::infra::location::memory::MemoryLocation;
use crate::usecase::services::query_service::LoadState;
use crate::usecase::services::table_service::TableService;

pub const APP_PATH: &str = "/claims";

pub struct AppState {
    pub table: Signal<TableService>,
    pub load_state: Signal<LoadState>,
    pub busy: Signal<bool>,
    pub status: Signal<String>,
    pub link_input: Signal<String>,
    pub show_share: Signal<bool>,
}

impl AppState {
    pub fn new(initial_query: &str, defaults: TableDefaults, priorities: SortPriorities) -> Self {
        Self {
            table: use_signal(|| {
                let location = Arc::new(MemoryLocation::new(APP_PATH, initial_query));
                TableService::from_location(location, defaults, priorities)
            }),
            load_state: use_signal(|| LoadState::Loading),
            busy: use_signal(|| false),
            status: use_signal(|| "Ready".to_string()),
            link_input: use_signal(String::new),
            show_share: use_signal(|| false),
        }
    }
}
