use crate::domain::entities::table::SortDirection;
use crate::domain::table::columns::BadgeTone;

pub fn root_container_style() -> &'static str {
    "font-family: 'Inter', sans-serif; padding: 12px; background: #fff; height: 100vh; \
     display: flex; flex-direction: column; overflow: hidden; box-sizing: border-box;"
}

pub fn toolbar_style() -> &'static str {
    "display: flex; gap: 8px; align-items: center; flex-wrap: wrap; margin-bottom: 12px;"
}

pub fn table_container_style() -> &'static str {
    "flex: 1; min-height: 0; overflow: auto; border: 1px solid #ddd; border-radius: 6px;"
}

pub fn table_header_cell_style() -> &'static str {
    "position: sticky; top: 0; z-index: 10; background: #f6f7f9; border-bottom: 1px solid #ccc; \
     padding: 8px; text-align: left; white-space: nowrap;"
}

pub fn sortable_header_cell_style() -> String {
    format!("{} cursor: pointer; user-select: none;", table_header_cell_style())
}

pub fn body_cell_style(numeric: bool) -> String {
    let align = if numeric { "right" } else { "left" };
    format!("border-bottom: 1px solid #eee; padding: 6px 8px; text-align: {align}; vertical-align: top;")
}

pub fn pagination_bar_style() -> &'static str {
    "display: flex; gap: 8px; align-items: center; justify-content: flex-end; padding-top: 8px;"
}

pub fn badge_style(tone: BadgeTone) -> String {
    let (background, color) = match tone {
        BadgeTone::Info => ("#e6f0ff", "#1d4ed8"),
        BadgeTone::Warning => ("#fff4e0", "#b45309"),
        BadgeTone::Success => ("#e7f8ec", "#15803d"),
        BadgeTone::Danger => ("#fde8e8", "#b91c1c"),
        BadgeTone::Neutral => ("#f0f0f0", "#555"),
    };
    format!(
        "display: inline-block; padding: 1px 6px; border-radius: 10px; font-size: 11px; \
         background: {background}; color: {color};"
    )
}

/// Arrow shown next to a sortable header label.
pub fn sort_indicator(active: Option<SortDirection>) -> &'static str {
    match active {
        Some(SortDirection::Asc) => "▲",
        Some(SortDirection::Desc) => "▼",
        None => "↕",
    }
}
