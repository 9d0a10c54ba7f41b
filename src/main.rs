use anyhow::{Context, Result};

use claims_table::app::{App, LaunchContext};
use claims_table::config::{default_db_path, default_webview_data_dir, AppConfig};
use claims_table::logging;

fn main() -> Result<()> {
    logging::init();

    let config = AppConfig::load_default().context("failed to load configuration")?;
    let db_path = default_db_path()
        .inspect_err(|err| tracing::warn!(%err, "no claim store, using generated claims only"))
        .ok();
    // First argument is a query string or a shared link.
    let initial_query = std::env::args()
        .nth(1)
        .map(|arg| claims_table::domain::table::query::query_from_link(&arg).to_string())
        .unwrap_or_default();
    let webview_data_dir = default_webview_data_dir()?;

    tracing::info!(?db_path, query = %initial_query, "starting claims table");

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(dioxus::desktop::WindowBuilder::new().with_title("Claims"))
                .with_data_directory(webview_data_dir),
        )
        .with_context(LaunchContext {
            config,
            db_path,
            initial_query,
        })
        .launch(App);
    Ok(())
}
