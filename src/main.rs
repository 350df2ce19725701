use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::domain::format::format_price;
use crate::domain::notification::NotificationKind;

mod app;
mod config;
mod domain;
mod infra;
mod platform;
mod ui;
mod usecase;

#[cfg(test)]
mod tests;

const APP_TITLE: &str = "Services Management";
const STATS_TITLE: &str = "Service Statistics";

fn main() {
    if let Err(err) = dioxus::logger::init(dioxus::logger::tracing::Level::INFO) {
        eprintln!("logger already initialised: {err}");
    }

    let webview_data_dir =
        default_webview_data_dir().expect("should resolve and create WebView2 data directory");

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(dioxus::desktop::WindowBuilder::new().with_title(APP_TITLE))
                .with_data_directory(webview_data_dir),
        )
        .launch(app::App);
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "hellhbbd", "services-admin")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))
}

fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview2");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview dir: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}

fn default_webview_data_dir() -> Result<PathBuf> {
    ensure_webview_data_dir(project_dirs()?.data_local_dir())
}

fn format_avg_price(value: f64) -> String {
    format!("₹{}", format_price(value))
}

fn is_description_label(label: &str) -> bool {
    label.to_lowercase() == "description"
}

fn root_container_style() -> &'static str {
    "height: 100vh; display: flex; flex-direction: column; gap: 16px; padding: 16px; box-sizing: border-box; overflow: hidden; font-family: sans-serif;"
}

fn panel_style() -> &'static str {
    "background: #fff; border: 1px solid #e5e7eb; border-radius: 8px; padding: 16px;"
}

fn table_container_style() -> &'static str {
    "flex: 1; min-height: 0; overflow: auto; border: 1px solid #e5e7eb; border-radius: 8px;"
}

fn table_header_cell_style() -> &'static str {
    "position: sticky; top: 0; z-index: 1; background: #f9fafb; padding: 10px 16px; text-align: left; font-size: 12px; text-transform: uppercase; color: #6b7280; border-bottom: 1px solid #e5e7eb;"
}

fn table_cell_style(truncate: bool) -> &'static str {
    if truncate {
        "padding: 10px 16px; max-width: 28rem; white-space: nowrap; overflow: hidden; text-overflow: ellipsis; color: #6b7280;"
    } else {
        "padding: 10px 16px; white-space: nowrap; color: #111827;"
    }
}

fn row_style(unconfirmed: bool) -> &'static str {
    if unconfirmed {
        "border-bottom: 1px solid #e5e7eb; background: #fffbeb;"
    } else {
        "border-bottom: 1px solid #e5e7eb;"
    }
}

fn category_button_style(selected: bool) -> &'static str {
    if selected {
        "width: 100%; text-align: left; padding: 10px 14px; border: none; border-radius: 6px; background: #fdf2f8; color: #db2777; cursor: pointer;"
    } else {
        "width: 100%; text-align: left; padding: 10px 14px; border: none; border-radius: 6px; background: #f9fafb; color: #374151; cursor: pointer;"
    }
}

fn input_style(read_only: bool) -> &'static str {
    if read_only {
        "padding: 6px 8px; border: 1px solid #d1d5db; border-radius: 6px; background: #f3f4f6;"
    } else {
        "padding: 6px 8px; border: 1px solid #d1d5db; border-radius: 6px; background: #fff;"
    }
}

fn modal_overlay_style() -> &'static str {
    "position: fixed; inset: 0; background: rgba(0,0,0,0.5); display: flex; align-items: center; justify-content: center; padding: 16px; z-index: 1000;"
}

fn modal_card_style() -> &'static str {
    "background: #fff; border-radius: 8px; box-shadow: 0 10px 24px rgba(0,0,0,0.15); width: 100%; max-width: 56rem; max-height: 90vh; overflow: auto; padding: 24px;"
}

fn notification_style(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Success => {
            "position: fixed; top: 16px; right: 16px; z-index: 1200; padding: 12px 16px; border-radius: 6px; background: #ecfdf5; color: #065f46; border: 1px solid #a7f3d0;"
        }
        NotificationKind::Warning => {
            "position: fixed; top: 16px; right: 16px; z-index: 1200; padding: 12px 16px; border-radius: 6px; background: #fffbeb; color: #92400e; border: 1px solid #fde68a;"
        }
        NotificationKind::Error => {
            "position: fixed; top: 16px; right: 16px; z-index: 1200; padding: 12px 16px; border-radius: 6px; background: #fef2f2; color: #991b1b; border: 1px solid #fecaca;"
        }
    }
}
