use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use dioxus::prelude::*;
use rfd::FileDialog;

use crate::config::AppConfig;
use crate::domain::entities::claim::{Claim, ClaimStatus, PmsSyncStatus};
use crate::domain::entities::table::{ClaimFilters, EnumFilter, ALL_SENTINEL};
use crate::domain::table::columns::{claim_columns, CellDisplay, CellKind};
use crate::domain::table::paginate::PageNavigation;
use crate::domain::table::pipeline::TableView;
use crate::domain::table::sort::SortPriorities;
use crate::infra::source::generated::GeneratedClaimSource;
use crate::infra::sqlite::repo::SqliteRepo;
use crate::platform::desktop::blocking::run_blocking;
use crate::ui::debounce::{debounce_delay, Debouncer};
use crate::ui::state::app_state::AppState;
use crate::ui::styles::{
    badge_style, body_cell_style, pagination_bar_style, root_container_style,
    sort_indicator, sortable_header_cell_style, table_container_style, table_header_cell_style,
    toolbar_style,
};
use crate::usecase::ports::repo::ImportResult;
use crate::usecase::services::import_service::ImportService;
use crate::usecase::services::query_service::{LoadState, QueryService};
use crate::usecase::services::table_service::TableService;

/// Everything the window needs that is decided before launch.
#[derive(Debug, Clone)]
pub struct LaunchContext {
    pub config: AppConfig,
    pub db_path: Option<PathBuf>,
    pub initial_query: String,
}

/// Loads the claim set plus a status line naming where it came from.
fn load_claims(launch: &LaunchContext) -> (LoadState, String) {
    let generated = GeneratedClaimSource::new(launch.config.generated_rows, launch.config.seed);
    let Some(db_path) = launch.db_path.clone() else {
        let loaded = QueryService::new(Arc::new(generated)).load();
        return (loaded, "Showing generated claims".to_string());
    };

    let repo = Arc::new(SqliteRepo { db_path });
    let import = ImportService::new(repo.clone());
    if let Err(err) = import.seed_if_empty(&generated) {
        tracing::warn!(error = %format!("{err:#}"), "failed to prepare claim store");
        return (LoadState::Failed(format!("{err:#}")), "Load failed".to_string());
    }
    let loaded = QueryService::new(repo).load();
    let status = match import.last_import() {
        Ok(Some(last)) => format!("{} claims from {}", last.row_count, last.source_path),
        Ok(None) => "Ready".to_string(),
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "failed to read import history");
            "Ready".to_string()
        }
    };
    (loaded, status)
}

fn import_claims(db_path: Option<&Path>, file: &Path) -> Result<ImportResult> {
    let db_path = db_path.ok_or_else(|| anyhow!("no claim store available for import"))?;
    let repo = Arc::new(SqliteRepo {
        db_path: db_path.to_path_buf(),
    });
    ImportService::new(repo).import_file(file)
}

fn enum_options<T: Copy + std::fmt::Display>(
    values: &[T],
    label: fn(T) -> &'static str,
) -> Vec<(String, String)> {
    std::iter::once((ALL_SENTINEL.to_string(), "All".to_string()))
        .chain(values.iter().map(|value| (value.to_string(), label(*value).to_string())))
        .collect()
}

#[component]
pub fn App() -> Element {
    let launch = use_context::<LaunchContext>();
    let priorities = launch.config.sort_priorities().unwrap_or_else(|err| {
        tracing::warn!(%err, "invalid priority lists, using defaults");
        SortPriorities::default()
    });
    let AppState {
        mut table,
        mut load_state,
        mut busy,
        mut status,
        mut link_input,
        mut show_share,
    } = AppState::new(
        &launch.initial_query,
        launch.config.table_defaults(),
        priorities,
    );

    let mut refresh = move |label: &'static str, launch: &LaunchContext| {
        let (loaded, source) = run_blocking(label, || load_claims(launch));
        load_state.set(loaded);
        status.set(source);
    };

    let loader = launch.clone();
    use_effect(move || refresh("load claims", &loader));

    let retry_launch = launch.clone();
    let reload_launch = launch.clone();
    let import_launch = launch.clone();
    let page_size_options = launch.config.page_size_options.clone();
    let filter_debounce_ms = launch.config.filter_debounce_ms;

    let content = match load_state() {
        LoadState::Loading => rsx! {
            div { style: "padding: 24px; color: #666;", "Loading claims..." }
        },
        LoadState::Failed(message) => rsx! {
            div { style: "padding: 24px; color: #b91c1c; display: flex; gap: 12px; align-items: center;",
                span { "Failed to load claims: {message}" }
                button {
                    onclick: move |_| {
                        load_state.set(LoadState::Loading);
                        refresh("retry load", &retry_launch);
                    },
                    "Retry"
                }
            }
        },
        LoadState::Ready(claims) => rsx! {
            ClaimsTable { table, claims, page_size_options, status }
        },
    };

    let share_href = table.read().href();

    rsx! {
        div { style: "{root_container_style()}",
            h2 { style: "margin: 0 0 8px 0;", "Claims" }

            div { style: "{toolbar_style()}",
                button {
                    disabled: busy(),
                    onclick: move |_| {
                        table.write().reset();
                        status.set("Filters and sorting reset".to_string());
                    },
                    "Reset"
                }
                button {
                    disabled: busy(),
                    onclick: move |_| {
                        table.write().reload();
                        refresh("reload claims", &reload_launch);
                    },
                    "Reload"
                }
                button {
                    onclick: move |_| {
                        let next = !show_share();
                        show_share.set(next);
                    },
                    "Share"
                }
                button {
                    disabled: busy(),
                    onclick: move |_| {
                        let Some(file) = FileDialog::new()
                            .add_filter("Claims", &["csv", "xlsx"])
                            .pick_file()
                        else {
                            return;
                        };
                        busy.set(true);
                        let result = run_blocking("import claims", || {
                            import_claims(import_launch.db_path.as_deref(), &file)
                        });
                        match result {
                            Ok(imported) => {
                                tracing::info!(rows = imported.row_count, "import finished");
                                refresh("reload claims", &import_launch);
                            }
                            Err(err) => {
                                tracing::warn!(error = %format!("{err:#}"), "import failed");
                                status.set(format!("Import failed: {err:#}"));
                            }
                        }
                        busy.set(false);
                    },
                    "Import..."
                }
                input {
                    r#type: "text",
                    placeholder: "Paste a shared link",
                    value: "{link_input}",
                    oninput: move |evt| link_input.set(evt.value()),
                }
                button {
                    disabled: link_input().trim().is_empty(),
                    onclick: move |_| {
                        let link = link_input();
                        table.write().open_link(link.trim());
                        link_input.set(String::new());
                        status.set("Opened shared link".to_string());
                    },
                    "Open link"
                }
                span { style: "color: #666; font-size: 12px;", "{status}" }
            }

            if show_share() {
                div { style: "margin-bottom: 8px; display: flex; gap: 8px; align-items: center;",
                    span { "Link:" }
                    input {
                        r#type: "text",
                        readonly: true,
                        style: "flex: 1;",
                        value: "{share_href}",
                    }
                }
            }

            FiltersBar { table, filter_debounce_ms }

            {content}
        }
    }
}

#[component]
fn FiltersBar(mut table: Signal<TableService>, filter_debounce_ms: u64) -> Element {
    let mut debouncer = use_signal(Debouncer::default);
    let mut draft = use_signal(ClaimFilters::default);

    let committed = table.read().state().filters.clone();
    // While a text edit waits out the debounce the inputs show the draft.
    let shown = if debouncer.read().is_pending() {
        draft()
    } else {
        committed
    };
    let status_options = enum_options(&ClaimStatus::ALL, ClaimStatus::label);
    let pms_options = enum_options(&PmsSyncStatus::ALL, PmsSyncStatus::label);
    let selected_status = shown.status.to_string();
    let selected_pms = shown.pms_sync_status.to_string();

    let pending_or_committed = move || {
        if debouncer.peek().is_pending() {
            draft.peek().clone()
        } else {
            table.peek().state().filters.clone()
        }
    };
    let mut edit_text = move |edit: fn(&mut ClaimFilters, String), value: String| {
        let mut next = pending_or_committed();
        edit(&mut next, value);
        draft.set(next);
        let token = debouncer.write().schedule();
        let scheduled_over = table.peek().state().filters.clone();
        spawn(async move {
            tokio::time::sleep(debounce_delay(filter_debounce_ms)).await;
            // A reset or opened link in the meantime wins over the stale draft.
            let unchanged = table.peek().state().filters == scheduled_over;
            if debouncer.write().settle(token) && unchanged {
                let filters = draft.peek().clone();
                table.write().apply_filters(filters);
            }
        });
    };

    // Selects commit at once, taking any pending text edit with them.
    let mut commit_now = move |edit: Box<dyn FnOnce(&mut ClaimFilters)>| {
        let mut next = pending_or_committed();
        edit(&mut next);
        debouncer.write().cancel();
        table.write().apply_filters(next);
    };

    rsx! {
        div { style: "{toolbar_style()}",
            input {
                r#type: "text",
                placeholder: "Patient",
                value: "{shown.patient}",
                oninput: move |evt| edit_text(|filters, value| filters.patient = value, evt.value()),
            }
            input {
                r#type: "text",
                placeholder: "Insurance carrier",
                value: "{shown.insurance_carrier}",
                oninput: move |evt| {
                    edit_text(|filters, value| filters.insurance_carrier = value, evt.value())
                },
            }
            input {
                r#type: "text",
                placeholder: "Provider",
                value: "{shown.provider}",
                oninput: move |evt| edit_text(|filters, value| filters.provider = value, evt.value()),
            }
            label { "Status "
                select {
                    onchange: move |evt| {
                        let status = evt.value().parse::<EnumFilter<ClaimStatus>>().unwrap_or_default();
                        commit_now(Box::new(move |filters| filters.status = status));
                    },
                    for (value, label) in status_options {
                        option { selected: value == selected_status, value: "{value}", "{label}" }
                    }
                }
            }
            label { "PMS sync "
                select {
                    onchange: move |evt| {
                        let pms_sync_status = evt
                            .value()
                            .parse::<EnumFilter<PmsSyncStatus>>()
                            .unwrap_or_default();
                        commit_now(Box::new(move |filters| filters.pms_sync_status = pms_sync_status));
                    },
                    for (value, label) in pms_options {
                        option { selected: value == selected_pms, value: "{value}", "{label}" }
                    }
                }
            }
        }
    }
}

#[component]
fn ClaimsTable(
    mut table: Signal<TableService>,
    claims: Arc<Vec<Claim>>,
    page_size_options: Vec<usize>,
    status: Signal<String>,
) -> Element {
    let columns = claim_columns();
    let service = table.read();
    let view = service.view(&claims);
    let current_sort = service.state().sort;
    let page_size = service.state().pagination.page_size;
    drop(service);

    let headers: Vec<_> = columns
        .iter()
        .map(|column| {
            let indicator = column.sort_field.map(|field| {
                let active = current_sort
                    .filter(|sort| sort.field == field)
                    .map(|sort| sort.direction);
                sort_indicator(active)
            });
            (column.key, column.label, column.sortable(), indicator.unwrap_or_default())
        })
        .collect();

    let rows: Vec<(String, Vec<(CellDisplay, bool)>)> = view
        .rows()
        .iter()
        .map(|claim| {
            let cells = columns
                .iter()
                .map(|column| (column.render(claim), column.kind == CellKind::Currency))
                .collect();
            (claim.id.0.clone(), cells)
        })
        .collect();

    let filtered_count = view.filtered_count();
    let navigation = match &view {
        TableView::NoRows => None,
        TableView::Page(page) => Some(page.navigation),
    };
    let column_count = columns.len();

    rsx! {
        div { style: "{table_container_style()}",
            table { style: "border-collapse: collapse; width: 100%; background: #fff;",
                thead {
                    tr {
                        for (key, label, sortable, indicator) in headers {
                            if sortable {
                                th {
                                    style: "{sortable_header_cell_style()}",
                                    onclick: move |_| {
                                        table.write().apply_sort_column(key);
                                    },
                                    "{label} {indicator}"
                                }
                            } else {
                                th { style: "{table_header_cell_style()}", "{label}" }
                            }
                        }
                    }
                }
                tbody {
                    if navigation.is_none() {
                        tr {
                            td { colspan: "{column_count}", style: "padding: 24px; text-align: center; color: #666;",
                                "No claims match the current filters. "
                                button {
                                    onclick: move |_| table.write().reset(),
                                    "Reset filters"
                                }
                            }
                        }
                    }
                    for (id, cells) in rows {
                        tr { key: "{id}",
                            for (cell, numeric) in cells {
                                ClaimCell { cell, numeric }
                            }
                        }
                    }
                }
            }
        }
        {navigation.map(|navigation| rsx! {
            PaginationBar { table, navigation, filtered_count, page_size, page_size_options, status }
        })}
    }
}

#[component]
fn ClaimCell(cell: CellDisplay, numeric: bool) -> Element {
    rsx! {
        td { style: "{body_cell_style(numeric)}",
            div { "{cell.primary}" }
            {cell.secondary.map(|secondary| rsx! {
                div { style: "color: #777; font-size: 11px;", "{secondary}" }
            })}
            {cell.badge.map(|badge| rsx! {
                span { style: "{badge_style(badge.tone)}", "{badge.label}" }
            })}
        }
    }
}

#[component]
fn PaginationBar(
    mut table: Signal<TableService>,
    navigation: PageNavigation,
    filtered_count: usize,
    page_size: usize,
    page_size_options: Vec<usize>,
    mut status: Signal<String>,
) -> Element {
    let mut go_to = move |page: usize| {
        if let Err(err) = table.write().change_page(page, filtered_count) {
            status.set(err.to_string());
        }
    };
    let PageNavigation {
        page,
        total_pages,
        can_first,
        can_previous,
        can_next,
        can_last,
    } = navigation;

    rsx! {
        div { style: "{pagination_bar_style()}",
            span { style: "color: #666;", "{filtered_count} claims" }
            label { "Rows per page "
                select {
                    onchange: move |evt| {
                        let Ok(size) = evt.value().parse::<usize>() else {
                            return;
                        };
                        if let Err(err) = table.write().change_page_size(size) {
                            status.set(err.to_string());
                        }
                    },
                    for size in page_size_options {
                        option { selected: size == page_size, value: "{size}", "{size}" }
                    }
                }
            }
            button { disabled: !can_first, onclick: move |_| go_to(1), "First" }
            button { disabled: !can_previous, onclick: move |_| go_to(page.saturating_sub(1)), "Previous" }
            span { "Page {page} of {total_pages}" }
            button { disabled: !can_next, onclick: move |_| go_to(page + 1), "Next" }
            button { disabled: !can_last, onclick: move |_| go_to(total_pages), "Last" }
        }
    }
}
