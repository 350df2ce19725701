use std::sync::Arc;

use anyhow::{Context, Result};
use dioxus::prelude::*;
use rfd::FileDialog;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::domain::catalog_state::{reduce, CatalogEvent, CatalogState};
use crate::domain::delete::ConfirmOutcome;
use crate::domain::entities::catalog::{Category, Stats};
use crate::domain::entities::field::FieldDescriptor;
use crate::domain::entities::service::{ServiceRecord, SyncState};
use crate::domain::filter::CategoryFilter;
use crate::domain::form::{FieldWidget, FormMode, FormState, ADD_NEW_CATEGORY};
use crate::domain::notification::{Notification, NotificationKind, Notifier};
use crate::domain::schema::FieldSchema;
use crate::infra::gviz::client::GvizClient;
use crate::infra::script::client::AppsScriptClient;
use crate::platform::desktop::timer::sleep;
use crate::ui::state::app_state::{AppState, LoadStatus};
use crate::usecase::ports::sheet::{MutationAck, SubmissionError};
use crate::usecase::services::export_service::ExportService;
use crate::usecase::services::load_service::LoadService;
use crate::usecase::services::mutation_service::MutationService;
use crate::{
    category_button_style, format_avg_price, input_style, is_description_label, modal_card_style,
    modal_overlay_style, notification_style, panel_style, root_container_style, row_style,
    table_cell_style, table_container_style, table_header_cell_style, STATS_TITLE,
};

#[derive(Clone)]
struct AppServices {
    config: Arc<AppConfig>,
    loader: Arc<LoadService>,
    mutations: Arc<MutationService>,
    exporter: Arc<ExportService>,
}

impl AppServices {
    fn from_config(config: AppConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("failed to build http client")?;
        let source = GvizClient::new(http.clone(), &config.sheet_id, &config.sheet_name)?;
        let sink = AppsScriptClient::new(http, config.script_url()?, config.sheet_name.clone());
        info!(sheet = %config.sheet_name, "services admin configured");
        Ok(Self {
            loader: Arc::new(LoadService::new(Arc::new(source), config.roles.clone())),
            mutations: Arc::new(MutationService::new(Arc::new(sink))),
            exporter: Arc::new(ExportService::new(&config.sheet_name)),
            config: Arc::new(config),
        })
    }
}

fn dispatch(mut catalog: Signal<CatalogState>, event: CatalogEvent) {
    let current = catalog.peek().clone();
    catalog.set(reduce(current, event));
}

/// Shows a notification and clears it after its ttl, unless a newer one
/// replaced it in the meantime.
fn notify(mut notifier: Signal<Notifier>, kind: NotificationKind, message: impl Into<String>) {
    let shown = notifier.write().show(kind, message);
    spawn(async move {
        sleep(shown.ttl).await;
        notifier.write().dismiss(shown.id);
    });
}

fn report_saved(notifier: Signal<Notifier>, sync: SyncState, message: &str) {
    match sync {
        SyncState::Confirmed => notify(notifier, NotificationKind::Success, message),
        SyncState::Unconfirmed => notify(
            notifier,
            NotificationKind::Warning,
            format!("{message} The sheet did not confirm the change."),
        ),
    }
}

fn service_id_caption(fields: &[FieldDescriptor], record: &ServiceRecord) -> Option<String> {
    fields
        .iter()
        .find(|field| field.lower_label().contains("id"))
        .map(|field| record.get(&field.id).to_string())
        .filter(|value| !value.is_empty())
}

#[component]
fn NotificationBanner(notification: Notification) -> Element {
    let style = notification_style(notification.kind);
    rsx! {
        div { style: "{style}", role: "status", "{notification.message}" }
    }
}

#[component]
fn CategoryPanel(
    categories: Vec<Category>,
    total: usize,
    selected: CategoryFilter,
    new_category_name: String,
    on_select: EventHandler<CategoryFilter>,
    on_name_input: EventHandler<String>,
    on_add: EventHandler<String>,
) -> Element {
    let all_style = category_button_style(selected == CategoryFilter::All);
    let name_for_add = new_category_name.clone();
    rsx! {
        div { style: panel_style(),
            h3 { style: "margin: 0 0 12px 0;", "Service Categories" }
            div { style: "display: flex; flex-direction: column; gap: 6px;",
                button {
                    style: "{all_style}",
                    onclick: move |_| on_select.call(CategoryFilter::All),
                    "All Services ({total})"
                }
                {categories.iter().map(|category| {
                    let is_selected = selected == CategoryFilter::Named(category.name.clone());
                    let style = category_button_style(is_selected);
                    let name = category.name.clone();
                    rsx!(
                        button {
                            key: "{category.name}",
                            style: "{style}",
                            onclick: move |_| on_select.call(CategoryFilter::Named(name.clone())),
                            "{category.name} ({category.count})"
                        }
                    )
                })}
            }
            div { style: "display: flex; gap: 6px; margin-top: 12px;",
                input {
                    style: input_style(false),
                    placeholder: "New category name",
                    value: "{new_category_name}",
                    oninput: move |event| on_name_input.call(event.value()),
                }
                button {
                    disabled: name_for_add.trim().is_empty(),
                    onclick: move |_| on_add.call(name_for_add.clone()),
                    "+ Add New Category"
                }
            }
        }
    }
}

#[component]
fn StatsPanel(stats: Stats, category_count: usize) -> Element {
    let avg_price = format_avg_price(stats.avg_price);
    rsx! {
        div { style: panel_style(),
            h3 { style: "margin: 0 0 12px 0;", "{STATS_TITLE}" }
            div { style: "display: grid; grid-template-columns: repeat(2, minmax(0, 1fr)); gap: 12px;",
                div {
                    p { style: "margin: 0; color: #6b7280;", "Total Services" }
                    p { style: "margin: 0; font-size: 22px; font-weight: 700;", "{stats.total_services}" }
                }
                div {
                    p { style: "margin: 0; color: #6b7280;", "Categories" }
                    p { style: "margin: 0; font-size: 22px; font-weight: 700;", "{category_count}" }
                }
                div {
                    p { style: "margin: 0; color: #6b7280;", "Avg. Price" }
                    p { style: "margin: 0; font-size: 22px; font-weight: 700;", "{avg_price}" }
                }
                div {
                    p { style: "margin: 0; color: #6b7280;", "Most Popular" }
                    p { style: "margin: 0; font-size: 22px; font-weight: 700;", "{stats.most_popular}" }
                }
            }
        }
    }
}

#[component]
fn ServiceRow(
    fields: Vec<FieldDescriptor>,
    record: ServiceRecord,
    busy: bool,
    on_edit: EventHandler<ServiceRecord>,
    on_delete: EventHandler<ServiceRecord>,
) -> Element {
    let unconfirmed = record.sync == SyncState::Unconfirmed;
    let style = row_style(unconfirmed);
    let row_title = if unconfirmed {
        "Not yet confirmed by the sheet"
    } else {
        ""
    };
    let edit_record = record.clone();
    let delete_record = record.clone();
    rsx! {
        tr { style: "{style}", title: "{row_title}",
            {fields.iter().map(|field| {
                let value = record.get(&field.id).to_string();
                let cell_style = table_cell_style(is_description_label(&field.label));
                rsx!(
                    td { key: "{field.id}", style: "{cell_style}", "{value}" }
                )
            })}
            td { style: table_cell_style(false),
                button {
                    disabled: busy,
                    style: "margin-right: 8px;",
                    onclick: move |_| on_edit.call(edit_record.clone()),
                    "Edit"
                }
                button {
                    disabled: busy,
                    onclick: move |_| on_delete.call(delete_record.clone()),
                    "Delete"
                }
            }
        }
    }
}

#[component]
fn ServiceTable(
    fields: Vec<FieldDescriptor>,
    records: Vec<ServiceRecord>,
    busy: bool,
    on_edit: EventHandler<ServiceRecord>,
    on_delete: EventHandler<ServiceRecord>,
) -> Element {
    let column_count = fields.len() + 1;
    rsx! {
        div { style: table_container_style(),
            table { style: "width: 100%; border-collapse: collapse;",
                thead {
                    tr {
                        {fields.iter().map(|field| rsx!(
                            th { key: "{field.id}", style: table_header_cell_style(), "{field.label}" }
                        ))}
                        th { style: table_header_cell_style(), "Actions" }
                    }
                }
                tbody {
                    if records.is_empty() {
                        tr {
                            td {
                                colspan: "{column_count}",
                                style: "padding: 24px; text-align: center; color: #6b7280;",
                                "No services found matching your criteria"
                            }
                        }
                    }
                    {records.iter().map(|record| rsx!(
                        ServiceRow {
                            key: "{record.client_id}",
                            fields: fields.clone(),
                            record: record.clone(),
                            busy,
                            on_edit,
                            on_delete,
                        }
                    ))}
                }
            }
        }
    }
}

#[component]
fn FormField(
    field: FieldDescriptor,
    widget: FieldWidget,
    value: String,
    disabled: bool,
    on_input: EventHandler<(String, String)>,
) -> Element {
    let field_id = field.id.clone();
    let input_id = format!("field-{}", field.id);
    let control = match widget {
        FieldWidget::ReadOnly => rsx! {
            input {
                id: "{input_id}",
                r#type: "text",
                readonly: true,
                value: "{value}",
                style: input_style(true),
            }
        },
        FieldWidget::Duration => rsx! {
            div { style: "display: flex; align-items: center; gap: 6px;",
                input {
                    id: "{input_id}",
                    r#type: "number",
                    min: "0",
                    placeholder: "45",
                    value: "{value}",
                    disabled,
                    style: input_style(false),
                    oninput: move |event| on_input.call((field_id.clone(), event.value())),
                }
                span { "min" }
            }
        },
        FieldWidget::Price => rsx! {
            input {
                id: "{input_id}",
                r#type: "number",
                min: "0",
                step: "0.01",
                value: "{value}",
                disabled,
                style: input_style(false),
                oninput: move |event| on_input.call((field_id.clone(), event.value())),
            }
        },
        FieldWidget::CategoryChoice(names) => rsx! {
            select {
                id: "{input_id}",
                disabled,
                style: input_style(false),
                onchange: move |event| on_input.call((field_id.clone(), event.value())),
                option { value: "", selected: value.is_empty(), "Select Category" }
                {names.iter().map(|name| rsx!(
                    option { key: "{name}", value: "{name}", selected: *name == value, "{name}" }
                ))}
                option { value: ADD_NEW_CATEGORY, "+ Add New Category" }
            }
        },
        FieldWidget::Description => rsx! {
            textarea {
                id: "{input_id}",
                rows: "3",
                value: "{value}",
                disabled,
                style: input_style(false),
                oninput: move |event| on_input.call((field_id.clone(), event.value())),
            }
        },
        FieldWidget::Text => rsx! {
            input {
                id: "{input_id}",
                r#type: "text",
                value: "{value}",
                disabled,
                style: input_style(false),
                oninput: move |event| on_input.call((field_id.clone(), event.value())),
            }
        },
    };

    rsx! {
        div { style: "display: flex; flex-direction: column; gap: 4px;",
            label { r#for: "{input_id}", style: "font-size: 13px; color: #374151;", "{field.label}" }
            {control}
        }
    }
}

#[component]
fn ServiceForm(
    form_state: FormState,
    schema: FieldSchema,
    categories: Vec<Category>,
    submitting: bool,
    on_input: EventHandler<(String, String)>,
    on_submit: EventHandler<()>,
    on_close: EventHandler<()>,
) -> Element {
    let title = form_state.title();
    let submit_label = match (form_state.mode, submitting) {
        (_, true) => "Saving...",
        (FormMode::Create, false) => "Save Service",
        (FormMode::Edit, false) => "Update Service",
    };
    rsx! {
        div { style: modal_overlay_style(),
            div { style: modal_card_style(),
                div { style: "display: flex; justify-content: space-between; align-items: center; margin-bottom: 16px;",
                    h3 { style: "margin: 0;", "{title}" }
                    button { disabled: submitting, onclick: move |_| on_close.call(()), "✕" }
                }
                div { style: "display: grid; grid-template-columns: repeat(2, minmax(0, 1fr)); gap: 12px;",
                    {schema.fields().iter().map(|field| {
                        let widget = form_state.widget(&schema, &field.id, &categories);
                        let value = form_state.input_value(&schema, &field.id);
                        rsx!(
                            FormField {
                                key: "{field.id}",
                                field: field.clone(),
                                widget,
                                value,
                                disabled: submitting,
                                on_input,
                            }
                        )
                    })}
                }
                div { style: "display: flex; justify-content: flex-end; gap: 8px; margin-top: 20px; padding-top: 16px; border-top: 1px solid #e5e7eb;",
                    button { r#type: "button", disabled: submitting, onclick: move |_| on_close.call(()), "Cancel" }
                    button { r#type: "button", disabled: submitting, onclick: move |_| on_submit.call(()), "{submit_label}" }
                }
            }
        }
    }
}

#[component]
fn DeleteModal(
    caption: String,
    deleting: bool,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    let confirm_label = if deleting { "Deleting..." } else { "Delete Service" };
    let narrow_card = format!("{} max-width: 28rem;", modal_card_style());
    rsx! {
        div { style: modal_overlay_style(),
            div { style: "{narrow_card}",
                h3 { style: "margin: 0 0 12px 0;", "Confirm Deletion" }
                p { style: "color: #4b5563;",
                    "Are you sure you want to delete this service? This action cannot be undone."
                }
                if !caption.is_empty() {
                    p { style: "font-weight: 600;", "Service ID: {caption}" }
                }
                div { style: "display: flex; justify-content: flex-end; gap: 8px; padding-top: 16px; border-top: 1px solid #e5e7eb;",
                    button { disabled: deleting, onclick: move |_| on_cancel.call(()), "Cancel" }
                    button {
                        disabled: deleting,
                        style: "background: #dc2626; color: #fff; border: none; border-radius: 6px; padding: 6px 14px;",
                        onclick: move |_| on_confirm.call(()),
                        "{confirm_label}"
                    }
                }
            }
        }
    }
}

#[component]
pub fn App() -> Element {
    let services = use_hook(|| {
        AppConfig::load()
            .and_then(AppServices::from_config)
            .map_err(|err| format!("{err:#}"))
    });
    let timings = services
        .as_ref()
        .map(|services| services.config.notification_timings())
        .unwrap_or_default();

    let AppState {
        catalog,
        mut load_status,
        mut loaded_at,
        mut reload_token,
        mut selected_category,
        mut search,
        mut form,
        mut delete_flow,
        mut submitting,
        notifier,
        mut new_category_name,
    } = AppState::new(timings);

    let services = match services {
        Ok(services) => services,
        Err(err) => {
            error!(error = %err, "failed to start services admin");
            return rsx! {
                div {
                    p { "Failed to load configuration: {err}" }
                }
            };
        }
    };

    let loader = services.loader.clone();
    use_effect(move || {
        let token = reload_token();
        let loader = loader.clone();
        *load_status.write() = LoadStatus::Loading;
        spawn(async move {
            info!(token, "loading services");
            match loader.load().await {
                Ok(loaded) => {
                    dispatch(catalog, CatalogEvent::Loaded(loaded));
                    *loaded_at.write() = Some(chrono::Local::now().format("%H:%M:%S").to_string());
                    *load_status.write() = LoadStatus::Ready;
                }
                Err(err) => {
                    dispatch(catalog, CatalogEvent::Loaded(CatalogState::default()));
                    *load_status.write() = LoadStatus::Failed(err.to_string());
                }
            }
        });
    });

    let mutations_for_submit = services.mutations.clone();
    let submit_form = move |_: ()| {
        if submitting() {
            return;
        }
        let Some(current) = form() else {
            return;
        };
        let mutations = mutations_for_submit.clone();
        *submitting.write() = true;
        spawn(async move {
            let schema = catalog.peek().schema.clone();
            match current.mode {
                FormMode::Create => match mutations.create(&schema, &current.draft).await {
                    Ok(record) => {
                        let sync = record.sync;
                        dispatch(catalog, CatalogEvent::Created(record));
                        *form.write() = None;
                        report_saved(notifier, sync, "Service added successfully!");
                    }
                    Err(err) => notify(
                        notifier,
                        NotificationKind::Error,
                        format!("Failed to add service: {err}"),
                    ),
                },
                FormMode::Edit => match mutations.update(&schema, &current.draft).await {
                    Ok(record) => {
                        let sync = record.sync;
                        dispatch(catalog, CatalogEvent::Updated(record));
                        *form.write() = None;
                        report_saved(notifier, sync, "Service updated successfully!");
                    }
                    Err(err) => notify(
                        notifier,
                        NotificationKind::Error,
                        format!("Failed to update service: {err}"),
                    ),
                },
            }
            *submitting.write() = false;
        });
    };

    let mutations_for_delete = services.mutations.clone();
    let confirm_delete = move |_: ()| {
        if submitting() {
            return;
        }
        let outcome = delete_flow.write().confirm();
        match outcome {
            ConfirmOutcome::NotPending => {}
            ConfirmOutcome::MissingRowIndex(_) => notify(
                notifier,
                NotificationKind::Error,
                format!(
                    "Failed to delete service: {}",
                    SubmissionError::MissingRowIndex("deleting")
                ),
            ),
            ConfirmOutcome::Proceed(record, _) => {
                let mutations = mutations_for_delete.clone();
                *submitting.write() = true;
                spawn(async move {
                    match mutations.delete(&record).await {
                        Ok(ack) => {
                            dispatch(catalog, CatalogEvent::Deleted(record));
                            let sync = match ack {
                                MutationAck::Confirmed { .. } => SyncState::Confirmed,
                                MutationAck::Unconfirmed => SyncState::Unconfirmed,
                            };
                            report_saved(notifier, sync, "Service deleted successfully!");
                        }
                        Err(err) => notify(
                            notifier,
                            NotificationKind::Error,
                            format!("Failed to delete service: {err}"),
                        ),
                    }
                    delete_flow.write().finish();
                    *submitting.write() = false;
                });
            }
        }
    };

    let exporter = services.exporter.clone();
    let export_csv = move |_| {
        let snapshot = catalog.peek().clone();
        let filter = selected_category.peek().clone();
        let term = search.peek().clone();
        let rows = snapshot.visible(&filter, &term);
        let Some(path) = FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name(exporter.default_file_name())
            .save_file()
        else {
            return;
        };
        match exporter.export_csv(&path, &snapshot.schema, &rows) {
            Ok(count) => notify(
                notifier,
                NotificationKind::Success,
                format!("Exported {count} services to {}", path.display()),
            ),
            Err(err) => {
                error!(error = %format!("{err:#}"), "csv export failed");
                notify(
                    notifier,
                    NotificationKind::Error,
                    format!("Failed to export services: {err:#}"),
                );
            }
        }
    };

    let catalog_snapshot = catalog();
    let filter = selected_category();
    let search_term = search();
    let visible_records: Vec<ServiceRecord> = catalog_snapshot
        .visible(&filter, &search_term)
        .into_iter()
        .cloned()
        .collect();
    let fields = catalog_snapshot.schema.fields().to_vec();
    let categories = catalog_snapshot.categories.clone();
    let category_count = categories.len();
    let total = catalog_snapshot.records.len();
    let title = filter.title();
    let status = load_status();
    let busy = submitting();
    let ready = status == LoadStatus::Ready;
    let loading = status == LoadStatus::Loading;
    let can_add = ready && !busy && !catalog_snapshot.schema.is_empty();
    let notification = notifier.read().current().cloned();
    let form_snapshot = form();
    let pending_delete = delete_flow
        .read()
        .pending()
        .map(|record| service_id_caption(&fields, record).unwrap_or_default());
    let deleting = delete_flow.read().is_deleting() || busy;
    let loaded_label = loaded_at().map(|at| format!("Last loaded {at}"));

    rsx! {
        div { style: root_container_style(),
            if let Some(notification) = notification {
                NotificationBanner { notification }
            }

            div { style: "display: flex; justify-content: space-between; align-items: center; gap: 12px;",
                h2 { style: "margin: 0;", "Services Management" }
                div { style: "display: flex; gap: 8px; align-items: center;",
                    input {
                        r#type: "text",
                        placeholder: "Search services...",
                        value: "{search_term}",
                        style: input_style(false),
                        oninput: move |event| search.set(event.value()),
                    }
                    button {
                        disabled: !can_add,
                        onclick: move |_| {
                            let snapshot = catalog.peek();
                            *form.write() = Some(FormState::create(&snapshot.schema, &snapshot.records));
                        },
                        "+ Add Service"
                    }
                    button { disabled: !ready, onclick: export_csv, "Export CSV" }
                    button {
                        disabled: loading,
                        onclick: move |_| *reload_token.write() += 1,
                        "Refresh"
                    }
                }
            }

            div { style: "display: grid; grid-template-columns: 1fr 2fr; gap: 16px;",
                CategoryPanel {
                    categories: categories.clone(),
                    total,
                    selected: filter.clone(),
                    new_category_name: new_category_name(),
                    on_select: move |value: CategoryFilter| selected_category.set(value),
                    on_name_input: move |value: String| new_category_name.set(value),
                    on_add: move |name: String| {
                        dispatch(catalog, CatalogEvent::CategoryAdded(name));
                        new_category_name.set(String::new());
                    },
                }
                StatsPanel { stats: catalog_snapshot.stats.clone(), category_count }
            }

            div { style: "display: flex; flex-direction: column; flex: 1; min-height: 0; gap: 8px;",
                div { style: "display: flex; justify-content: space-between; align-items: baseline;",
                    h3 { style: "margin: 0;", "{title}" }
                    if let Some(label) = loaded_label {
                        span { style: "font-size: 12px; color: #6b7280;", "{label}" }
                    }
                }
                {match status {
                    LoadStatus::Loading => rsx! {
                        p { style: "text-align: center; color: #2563eb;", "Loading services data..." }
                    },
                    LoadStatus::Failed(message) => rsx! {
                        div { style: "background: #fef2f2; color: #991b1b; padding: 16px; border-radius: 6px; text-align: center;",
                            "{message} "
                            button { onclick: move |_| *reload_token.write() += 1, "Try again" }
                        }
                    },
                    LoadStatus::Ready => rsx! {
                        ServiceTable {
                            fields: fields.clone(),
                            records: visible_records,
                            busy,
                            on_edit: move |record: ServiceRecord| {
                                let current = catalog.peek().find(&record.client_id).cloned().unwrap_or(record);
                                *form.write() = Some(FormState::edit(&current));
                            },
                            on_delete: move |record: ServiceRecord| delete_flow.write().request(record),
                        }
                    },
                }}
            }

            if let Some(form_state) = form_snapshot {
                ServiceForm {
                    form_state,
                    schema: catalog_snapshot.schema.clone(),
                    categories,
                    submitting: busy,
                    on_input: move |(field_id, value): (String, String)| {
                        let snapshot = catalog.peek();
                        if let Some(state) = form.write().as_mut() {
                            state.apply_input(&snapshot.schema, &field_id, &value);
                        }
                    },
                    on_submit: submit_form,
                    on_close: move |_: ()| *form.write() = None,
                }
            }

            if let Some(caption) = pending_delete {
                DeleteModal {
                    caption,
                    deleting,
                    on_confirm: confirm_delete,
                    on_cancel: move |_: ()| delete_flow.write().cancel(),
                }
            }
        }
    }
}
