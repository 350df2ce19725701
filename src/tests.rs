use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::{AppConfig, SCRIPT_URL_ENV, SHEET_ID_ENV, SHEET_NAME_ENV};
use crate::domain::catalog_state::{compute_stats, most_popular, reduce, CatalogEvent, CatalogState};
use crate::domain::delete::{ConfirmOutcome, DeleteFlow};
use crate::domain::entities::catalog::Category;
use crate::domain::entities::cell::CellValue;
use crate::domain::entities::field::{ColumnType, FieldDescriptor, FieldRole};
use crate::domain::entities::service::{RowIndex, ServiceRecord, SyncState};
use crate::domain::filter::CategoryFilter;
use crate::domain::form::{
    next_serial, row_data, widget_for, FieldWidget, FormState, ADD_NEW_CATEGORY,
};
use crate::domain::headers::resolve_headers;
use crate::domain::notification::{NotificationKind, NotificationTimings, Notifier};
use crate::domain::schema::{FieldSchema, RoleOverrides};
use crate::infra::export::csv::write_records;
use crate::infra::gviz::parse::parse_export;
use crate::infra::script::client::classify_reply;
use crate::usecase::ports::sheet::{
    LoadError, Mutation, MutationAck, MutationSink, RawColumn, RawTable, SheetSource,
    SubmissionError,
};
use crate::usecase::services::export_service::ExportService;
use crate::usecase::services::load_service::{build_catalog, LoadService};
use crate::usecase::services::mutation_service::MutationService;
use crate::*;

struct StaticSource(RawTable);

#[async_trait]
impl SheetSource for StaticSource {
    async fn fetch_table(&self) -> Result<RawTable, LoadError> {
        Ok(self.0.clone())
    }
}

struct RecordingSink {
    reply: Result<MutationAck, SubmissionError>,
    calls: Mutex<Vec<Mutation>>,
}

impl RecordingSink {
    fn replying(reply: Result<MutationAck, SubmissionError>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<Mutation> {
        self.calls.lock().expect("calls lock should not be poisoned").clone()
    }
}

#[async_trait]
impl MutationSink for RecordingSink {
    async fn submit(&self, mutation: Mutation) -> Result<MutationAck, SubmissionError> {
        self.calls
            .lock()
            .expect("calls lock should not be poisoned")
            .push(mutation);
        self.reply.clone()
    }
}

fn column(label: &str, column_type: ColumnType) -> RawColumn {
    RawColumn {
        label: label.to_string(),
        column_type,
    }
}

fn text(value: &str) -> CellValue {
    CellValue::Text(value.to_string())
}

fn service_row(name: &str, category: &str, price: f64, duration: &str, serial: &str) -> Vec<CellValue> {
    vec![
        text(name),
        text(category),
        CellValue::Number(price),
        text(duration),
        text(serial),
        CellValue::Empty,
    ]
}

fn sample_table() -> RawTable {
    RawTable {
        columns: vec![
            column("Service Name", ColumnType::String),
            column("Category", ColumnType::String),
            column("Price", ColumnType::Number),
            column("Duration", ColumnType::String),
            column("Serial No", ColumnType::String),
            column("", ColumnType::String),
        ],
        rows: vec![
            service_row("Facial", "Skin", 100.0, "45 min", "SD-001"),
            service_row("Haircut", "Hair", 200.0, "30 min", "SD-002"),
            vec![CellValue::Empty; 6],
            service_row("Spa Ritual", "Skin", 300.0, "60 min", "SD-007"),
        ],
    }
}

fn sample_catalog() -> CatalogState {
    build_catalog(sample_table(), &RoleOverrides::new()).expect("sample table should load")
}

fn field_id(catalog: &CatalogState, label: &str) -> String {
    catalog
        .schema
        .fields()
        .iter()
        .find(|field| field.label == label)
        .map(|field| field.id.clone())
        .expect("field should exist")
}

fn record_named<'a>(catalog: &'a CatalogState, name: &str) -> &'a ServiceRecord {
    let name_id = field_id(catalog, "Service Name");
    catalog
        .records
        .iter()
        .find(|record| record.get(&name_id) == name)
        .expect("record should exist")
}

#[tokio::test]
async fn load_service_builds_catalog_from_export() {
    let service = LoadService::new(Arc::new(StaticSource(sample_table())), RoleOverrides::new());

    let catalog = service.load().await.expect("load should succeed");

    let labels: Vec<&str> = catalog
        .schema
        .fields()
        .iter()
        .map(|field| field.label.as_str())
        .collect();
    assert_eq!(
        labels,
        vec!["Serial No", "Service Name", "Category", "Price", "Duration"]
    );
    assert_eq!(catalog.records.len(), 3, "blank rows should be skipped");
    assert_eq!(catalog.stats.total_services, 3);
    assert_eq!(catalog.stats.avg_price, 200.0);
    assert_eq!(catalog.stats.most_popular, "Skin");
    assert_eq!(
        catalog.categories,
        vec![
            Category {
                id: 1,
                name: "Skin".to_string(),
                count: 2,
            },
            Category {
                id: 2,
                name: "Hair".to_string(),
                count: 1,
            },
        ]
    );
}

#[test]
fn row_indices_number_kept_rows_from_sheet_row_two() {
    let catalog = sample_catalog();

    let indices: Vec<Option<RowIndex>> = catalog.records.iter().map(|record| record.row_index).collect();

    assert_eq!(
        indices,
        vec![Some(RowIndex(2)), Some(RowIndex(3)), Some(RowIndex(4))]
    );
    assert_eq!(record_named(&catalog, "Spa Ritual").row_index, Some(RowIndex(4)));
}

#[test]
fn control_column_is_not_stored_on_records() {
    let catalog = sample_catalog();

    for record in &catalog.records {
        assert_eq!(record.values.len(), 5, "record values: {:?}", record.values);
    }
}

#[test]
fn first_row_supplies_headers_when_columns_are_unlabelled() {
    let table = RawTable {
        columns: vec![
            column("", ColumnType::String),
            column("", ColumnType::Number),
            column("", ColumnType::String),
        ],
        rows: vec![
            vec![text("Name"), text("Price"), CellValue::Empty],
            vec![text("Facial"), CellValue::Number(1234.5), CellValue::Empty],
        ],
    };

    let catalog = build_catalog(table, &RoleOverrides::new()).expect("should load");

    let labels: Vec<&str> = catalog
        .schema
        .fields()
        .iter()
        .map(|field| field.label.as_str())
        .collect();
    assert_eq!(labels, vec!["Name", "Price"]);
    assert_eq!(catalog.records.len(), 1);
    assert_eq!(catalog.records[0].row_index, Some(RowIndex(2)));
    assert_eq!(catalog.records[0].get("col1"), "1,234.5");
}

#[test]
fn unlabelled_table_without_header_row_has_no_data() {
    let table = RawTable {
        columns: vec![column("", ColumnType::String), column("", ColumnType::String)],
        rows: vec![vec![CellValue::Empty, CellValue::Empty]],
    };

    assert_eq!(
        build_catalog(table, &RoleOverrides::new()),
        Err(LoadError::NoData)
    );
}

#[test]
fn falsy_rows_are_skipped() {
    let mut table = sample_table();
    table.rows.insert(
        0,
        vec![
            CellValue::Number(0.0),
            CellValue::Bool(false),
            text(""),
            CellValue::Empty,
            CellValue::Empty,
            CellValue::Empty,
        ],
    );

    let catalog = build_catalog(table, &RoleOverrides::new()).expect("should load");

    assert_eq!(catalog.records.len(), 3);
    assert_eq!(catalog.records[0].row_index, Some(RowIndex(2)));
}

#[test]
fn numeric_cells_use_thousands_separators() {
    let mut table = sample_table();
    table.rows[0][2] = CellValue::Number(1300.0);
    table.rows[1][2] = text("2500");

    let catalog = build_catalog(table, &RoleOverrides::new()).expect("should load");
    let price_id = field_id(&catalog, "Price");

    assert_eq!(record_named(&catalog, "Facial").get(&price_id), "1,300");
    assert_eq!(record_named(&catalog, "Haircut").get(&price_id), "2,500");
    assert_eq!(catalog.stats.avg_price, (1300.0 + 2500.0 + 300.0) / 3.0);
}

#[test]
fn blank_and_boolean_number_cells_coerce_to_digits() {
    let mut table = sample_table();
    table.rows[0][2] = CellValue::Empty;
    table.rows[1][2] = CellValue::Bool(true);
    table.rows[3][2] = text("on request");

    let catalog = build_catalog(table, &RoleOverrides::new()).expect("should load");
    let price_id = field_id(&catalog, "Price");

    assert_eq!(record_named(&catalog, "Facial").get(&price_id), "0");
    assert_eq!(record_named(&catalog, "Haircut").get(&price_id), "1");
    assert_eq!(record_named(&catalog, "Spa Ritual").get(&price_id), "on request");
}

#[test]
fn gviz_body_loads_end_to_end() {
    let body = r#"/*O_o*/
google.visualization.Query.setResponse({"version":"0.6","status":"ok","table":{
"cols":[{"label":"Service ID","type":"string"},{"label":"Sr No","type":"number"},{"label":"Category","type":"string"},{"label":"","type":"string"}],
"rows":[{"c":[{"v":"S-1"},{"v":1},{"v":"Nails"},null]},{"c":[{"v":"S-2"},{"v":2},null,null]}]}});"#;

    let table = parse_export(body).expect("export should parse");
    let catalog = build_catalog(table, &RoleOverrides::new()).expect("should load");

    let labels: Vec<&str> = catalog
        .schema
        .fields()
        .iter()
        .map(|field| field.label.as_str())
        .collect();
    assert_eq!(labels, vec!["Sr No", "Service ID", "Category"]);
    assert_eq!(catalog.records.len(), 2);
    assert_eq!(catalog.categories.len(), 1);
    assert_eq!(catalog.stats.avg_price, 0.0, "no price column means zero");
}

#[test]
fn resolve_headers_moves_serial_then_service_id_first() {
    let raw = vec![
        FieldDescriptor::at(0, "Name", ColumnType::String),
        FieldDescriptor::at(1, "Service ID", ColumnType::String),
        FieldDescriptor::at(2, "Price", ColumnType::Number),
        FieldDescriptor::at(3, "S.No", ColumnType::String),
        FieldDescriptor::at(4, "Serial No", ColumnType::Number),
        FieldDescriptor::at(5, "Actions", ColumnType::String),
    ];

    let labels: Vec<String> = resolve_headers(&raw)
        .into_iter()
        .map(|field| field.label)
        .collect();

    assert_eq!(labels, vec!["Serial No", "Service ID", "Name", "Price", "S.No"]);
}

#[test]
fn filter_all_with_empty_search_returns_everything() {
    let catalog = sample_catalog();

    assert_eq!(catalog.visible(&CategoryFilter::All, "").len(), 3);
}

#[test]
fn filter_by_category_and_search() {
    let catalog = sample_catalog();

    let skin = catalog.visible(&CategoryFilter::Named("Skin".to_string()), "");
    assert_eq!(skin.len(), 2);

    let searched = catalog.visible(&CategoryFilter::All, "HAIR");
    assert_eq!(searched.len(), 1);

    let none = catalog.visible(&CategoryFilter::Named("Skin".to_string()), "haircut");
    assert!(none.is_empty());
}

#[test]
fn category_filter_titles() {
    assert_eq!(CategoryFilter::All.title(), "All Services");
    assert_eq!(
        CategoryFilter::Named("Hair".to_string()).title(),
        "Hair Services"
    );
}

#[test]
fn next_serial_follows_largest_existing_number() {
    assert_eq!(next_serial(["SD-001", "SD-007", "misc"]), "SD-008");
    assert_eq!(next_serial(Vec::<&str>::new()), "SD-001");
}

#[test]
fn create_form_prefills_serial_and_blanks_the_rest() {
    let catalog = sample_catalog();
    let serial_id = field_id(&catalog, "Serial No");
    let name_id = field_id(&catalog, "Service Name");

    let form = FormState::create(&catalog.schema, &catalog.records);

    assert_eq!(form.title(), "Add New Service");
    assert_eq!(form.draft.get(&serial_id), "SD-008");
    assert_eq!(form.draft.get(&name_id), "");
    assert_eq!(form.draft.row_index, None);
    assert_eq!(
        form.widget(&catalog.schema, &serial_id, &catalog.categories),
        FieldWidget::ReadOnly
    );
}

#[test]
fn duration_input_is_normalised() {
    let catalog = sample_catalog();
    let duration_id = field_id(&catalog, "Duration");
    let mut form = FormState::create(&catalog.schema, &catalog.records);

    form.apply_input(&catalog.schema, &duration_id, "45");
    assert_eq!(form.draft.get(&duration_id), "45 min");
    assert_eq!(form.input_value(&catalog.schema, &duration_id), "45");

    form.apply_input(&catalog.schema, &duration_id, "45min");
    assert_eq!(form.draft.get(&duration_id), "45 min");

    form.apply_input(&catalog.schema, &duration_id, "abc");
    assert_eq!(form.draft.get(&duration_id), "");
}

#[test]
fn read_only_fields_ignore_input() {
    let catalog = sample_catalog();
    let serial_id = field_id(&catalog, "Serial No");
    let mut form = FormState::edit(record_named(&catalog, "Facial"));

    form.apply_input(&catalog.schema, &serial_id, "SD-999");

    assert_eq!(form.title(), "Edit Service");
    assert_eq!(form.draft.get(&serial_id), "SD-001");
}

#[test]
fn plain_serial_label_is_editable_but_prefilled() {
    let fields = vec![
        FieldDescriptor::at(0, "Serial", ColumnType::String),
        FieldDescriptor::at(1, "Service Name", ColumnType::String),
    ];
    let schema = FieldSchema::resolve(fields, &RoleOverrides::new());
    let existing = vec![ServiceRecord::new(Some(RowIndex(2))).with_value("col0", "SD-004")];

    let mut form = FormState::create(&schema, &existing);

    assert_eq!(schema.serial_field(), Some("col0"));
    assert_eq!(form.draft.get("col0"), "SD-005");
    assert_eq!(form.widget(&schema, "col0", &[]), FieldWidget::Text);

    form.apply_input(&schema, "col0", "SD-100");
    assert_eq!(form.draft.get("col0"), "SD-100");
}

#[test]
fn serial_no_label_stays_read_only() {
    let catalog = sample_catalog();
    let serial_id = field_id(&catalog, "Serial No");
    let mut form = FormState::create(&catalog.schema, &catalog.records);

    form.apply_input(&catalog.schema, &serial_id, "SD-100");

    assert_eq!(catalog.schema.role(&serial_id), FieldRole::Identifier);
    assert_eq!(form.draft.get(&serial_id), "SD-008");
}

#[test]
fn widgets_follow_field_roles() {
    let categories = vec![Category {
        id: 1,
        name: "Skin".to_string(),
        count: 2,
    }];

    assert_eq!(widget_for(FieldRole::Price, &categories, false), FieldWidget::Price);
    assert_eq!(
        widget_for(FieldRole::Description, &categories, false),
        FieldWidget::Description
    );
    assert_eq!(widget_for(FieldRole::Category, &[], false), FieldWidget::Text);
    assert_eq!(widget_for(FieldRole::Category, &categories, true), FieldWidget::Text);
    assert_eq!(widget_for(FieldRole::Identifier, &categories, false), FieldWidget::ReadOnly);
    assert_eq!(widget_for(FieldRole::Serial, &categories, false), FieldWidget::Text);
}

#[test]
fn add_new_category_option_switches_to_free_text() {
    let catalog = sample_catalog();
    let category_id = field_id(&catalog, "Category");
    let mut form = FormState::create(&catalog.schema, &catalog.records);

    assert_eq!(
        form.widget(&catalog.schema, &category_id, &catalog.categories),
        FieldWidget::CategoryChoice(vec!["Skin".to_string(), "Hair".to_string()])
    );

    form.apply_input(&catalog.schema, &category_id, ADD_NEW_CATEGORY);

    assert_eq!(form.draft.get(&category_id), "");
    assert_eq!(
        form.widget(&catalog.schema, &category_id, &catalog.categories),
        FieldWidget::Text
    );
}

#[test]
fn price_input_drops_thousands_separators() {
    let catalog = sample_catalog();
    let price_id = field_id(&catalog, "Price");
    let record = ServiceRecord::new(Some(RowIndex(2))).with_value(price_id.clone(), "1,300");

    let form = FormState::edit(&record);

    assert_eq!(form.input_value(&catalog.schema, &price_id), "1300");
}

#[test]
fn deleting_last_record_of_category_removes_it() {
    let catalog = sample_catalog();
    let haircut = record_named(&catalog, "Haircut").clone();

    let next = reduce(catalog, CatalogEvent::Deleted(haircut));

    assert_eq!(next.records.len(), 2);
    assert_eq!(next.stats.total_services, 2);
    assert!(next.categories.iter().all(|category| category.name != "Hair"));
}

#[test]
fn deleting_one_of_many_decrements_count() {
    let catalog = sample_catalog();
    let facial = record_named(&catalog, "Facial").clone();

    let next = reduce(catalog, CatalogEvent::Deleted(facial));

    let skin = next
        .categories
        .iter()
        .find(|category| category.name == "Skin")
        .expect("skin should remain");
    assert_eq!(skin.count, 1);
}

#[test]
fn deleting_unknown_record_changes_nothing() {
    let catalog = sample_catalog();
    let stranger = ServiceRecord::new(Some(RowIndex(40)));

    let next = reduce(catalog.clone(), CatalogEvent::Deleted(stranger));

    assert_eq!(next, catalog);
}

#[test]
fn created_record_is_prepended_and_counted() {
    let catalog = sample_catalog();
    let category_id = field_id(&catalog, "Category");
    let record = ServiceRecord::new(None).with_value(category_id, "Nails");

    let next = reduce(catalog, CatalogEvent::Created(record.clone()));

    assert_eq!(next.records[0], record);
    assert_eq!(next.stats.total_services, 4);
    let nails = next
        .categories
        .iter()
        .find(|category| category.name == "Nails")
        .expect("nails should be added");
    assert_eq!(nails.count, 1);
}

#[test]
fn updated_record_moves_between_categories() {
    let catalog = sample_catalog();
    let category_id = field_id(&catalog, "Category");
    let mut haircut = record_named(&catalog, "Haircut").clone();
    haircut.set(category_id, "Skin");

    let next = reduce(catalog, CatalogEvent::Updated(haircut.clone()));

    assert!(next.records.contains(&haircut));
    assert_eq!(next.records.len(), 3);
    assert_eq!(next.categories.len(), 1);
    assert_eq!(next.categories[0].count, 3);
}

#[test]
fn category_added_is_trimmed_and_deduplicated() {
    let catalog = sample_catalog();

    let next = reduce(catalog, CatalogEvent::CategoryAdded("  Nails ".to_string()));
    let next = reduce(next, CatalogEvent::CategoryAdded("Nails".to_string()));
    let next = reduce(next, CatalogEvent::CategoryAdded("   ".to_string()));

    assert_eq!(next.categories.len(), 3);
    assert_eq!(
        next.categories[2],
        Category {
            id: 3,
            name: "Nails".to_string(),
            count: 0,
        }
    );
}

#[test]
fn average_price_divides_by_all_records() {
    let fields = vec![FieldDescriptor::at(0, "Price", ColumnType::String)];
    let schema = FieldSchema::resolve(fields, &RoleOverrides::new());
    let records = vec![
        ServiceRecord::new(None).with_value("col0", "100"),
        ServiceRecord::new(None).with_value("col0", "ask at desk"),
    ];

    let stats = compute_stats(&schema, &records, &[]);

    assert_eq!(stats.avg_price, 50.0);
    assert_eq!(stats.most_popular, "None");
    assert_eq!(compute_stats(&schema, &[], &[]).avg_price, 0.0);
}

#[test]
fn most_popular_keeps_first_on_ties() {
    let categories = vec![
        Category {
            id: 1,
            name: "Skin".to_string(),
            count: 2,
        },
        Category {
            id: 2,
            name: "Hair".to_string(),
            count: 2,
        },
    ];

    assert_eq!(most_popular(&categories), "Skin");
}

#[test]
fn role_overrides_take_precedence_over_keywords() {
    let fields = vec![
        FieldDescriptor::at(0, "Fee", ColumnType::Number),
        FieldDescriptor::at(1, "Kind", ColumnType::String),
        FieldDescriptor::at(2, "Price Notes", ColumnType::String),
    ];
    let mut overrides = RoleOverrides::new();
    overrides.insert("fee".to_string(), FieldRole::Price);
    overrides.insert("KIND".to_string(), FieldRole::Category);

    let schema = FieldSchema::resolve(fields, &overrides);

    assert_eq!(schema.price_field(), Some("col0"));
    assert_eq!(schema.category_field(), Some("col1"));
    assert_eq!(schema.role("col0"), FieldRole::Price);
    assert_eq!(schema.role("col2"), FieldRole::Identifier);
}

#[test]
fn classify_reply_maps_script_verdicts() {
    assert_eq!(
        classify_reply(r#"{"status":"success","rowIndex":12}"#),
        Ok(MutationAck::Confirmed {
            row_index: Some(RowIndex(12)),
        })
    );
    assert_eq!(
        classify_reply(r#"{"status":"error","message":"sheet locked"}"#),
        Err(SubmissionError::Rejected("sheet locked".to_string()))
    );
    assert_eq!(classify_reply("<html>moved</html>"), Ok(MutationAck::Unconfirmed));
    assert_eq!(
        classify_reply(r#"{"status":"queued"}"#),
        Ok(MutationAck::Unconfirmed)
    );
}

#[tokio::test]
async fn update_without_row_index_never_reaches_the_sink() {
    let catalog = sample_catalog();
    let sink = RecordingSink::replying(Ok(MutationAck::Confirmed { row_index: None }));
    let service = MutationService::new(sink.clone());
    let draft = ServiceRecord::new(None);

    let result = service.update(&catalog.schema, &draft).await;

    assert_eq!(result, Err(SubmissionError::MissingRowIndex("updating")));
    assert!(sink.calls().is_empty());
}

#[tokio::test]
async fn create_uses_row_index_from_confirmed_reply() {
    let catalog = sample_catalog();
    let sink = RecordingSink::replying(Ok(MutationAck::Confirmed {
        row_index: Some(RowIndex(9)),
    }));
    let service = MutationService::new(sink.clone());
    let form = FormState::create(&catalog.schema, &catalog.records);

    let record = service
        .create(&catalog.schema, &form.draft)
        .await
        .expect("create should succeed");

    assert_eq!(record.row_index, Some(RowIndex(9)));
    assert_eq!(record.sync, SyncState::Confirmed);
    assert_ne!(record.client_id, form.draft.client_id);
    assert_eq!(
        sink.calls(),
        vec![Mutation::Insert {
            row_data: row_data(&catalog.schema, &form.draft),
        }]
    );
}

#[tokio::test]
async fn unconfirmed_create_is_marked() {
    let catalog = sample_catalog();
    let sink = RecordingSink::replying(Ok(MutationAck::Unconfirmed));
    let service = MutationService::new(sink);
    let form = FormState::create(&catalog.schema, &catalog.records);

    let record = service
        .create(&catalog.schema, &form.draft)
        .await
        .expect("create should succeed");

    assert_eq!(record.row_index, None);
    assert_eq!(record.sync, SyncState::Unconfirmed);
}

#[tokio::test]
async fn create_transport_failure_is_returned() {
    let catalog = sample_catalog();
    let sink = RecordingSink::replying(Err(SubmissionError::Transport(
        "connection reset".to_string(),
    )));
    let service = MutationService::new(sink.clone());
    let form = FormState::create(&catalog.schema, &catalog.records);

    let result = service.create(&catalog.schema, &form.draft).await;

    assert_eq!(
        result,
        Err(SubmissionError::Transport("connection reset".to_string()))
    );
    assert_eq!(sink.calls().len(), 1);
}

#[tokio::test]
async fn update_sends_row_index_and_values() {
    let catalog = sample_catalog();
    let sink = RecordingSink::replying(Ok(MutationAck::Confirmed { row_index: None }));
    let service = MutationService::new(sink.clone());
    let haircut = record_named(&catalog, "Haircut").clone();

    let updated = service
        .update(&catalog.schema, &haircut)
        .await
        .expect("update should succeed");

    assert_eq!(updated.client_id, haircut.client_id);
    match sink.calls().as_slice() {
        [Mutation::Update { row_index, row_data }] => {
            assert_eq!(*row_index, RowIndex(3));
            assert_eq!(row_data[0], "SD-002");
            assert_eq!(row_data.len(), 5);
        }
        other => panic!("unexpected calls: {other:?}"),
    }
}

#[tokio::test]
async fn rejected_delete_surfaces_reason() {
    let catalog = sample_catalog();
    let sink = RecordingSink::replying(Err(SubmissionError::Rejected("row missing".to_string())));
    let service = MutationService::new(sink.clone());
    let facial = record_named(&catalog, "Facial").clone();

    let result = service.delete(&facial).await;

    assert_eq!(
        result,
        Err(SubmissionError::Rejected("row missing".to_string()))
    );
    assert_eq!(
        sink.calls(),
        vec![Mutation::Delete {
            row_index: RowIndex(2),
        }]
    );
}

#[test]
fn delete_flow_walks_through_confirmation() {
    let record = ServiceRecord::new(Some(RowIndex(4)));
    let mut flow = DeleteFlow::default();

    assert_eq!(flow.confirm(), ConfirmOutcome::NotPending);

    flow.request(record.clone());
    assert_eq!(flow.pending(), Some(&record));

    assert_eq!(
        flow.confirm(),
        ConfirmOutcome::Proceed(record.clone(), RowIndex(4))
    );
    assert!(flow.is_deleting());

    flow.request(ServiceRecord::new(Some(RowIndex(5))));
    assert!(flow.is_deleting(), "requests are ignored while deleting");

    flow.finish();
    assert_eq!(flow, DeleteFlow::Idle);
}

#[test]
fn delete_flow_without_row_index_returns_to_idle() {
    let record = ServiceRecord::new(None);
    let mut flow = DeleteFlow::default();
    flow.request(record.clone());

    assert_eq!(flow.confirm(), ConfirmOutcome::MissingRowIndex(record));
    assert_eq!(flow, DeleteFlow::Idle);
}

#[test]
fn delete_flow_cancel_clears_pending() {
    let mut flow = DeleteFlow::default();
    flow.request(ServiceRecord::new(Some(RowIndex(2))));

    flow.cancel();

    assert_eq!(flow.pending(), None);
}

#[test]
fn stale_dismiss_keeps_newer_notification() {
    let mut notifier = Notifier::new(NotificationTimings::default());

    let first = notifier.show(NotificationKind::Success, "Service added successfully!");
    let second = notifier.show(NotificationKind::Error, "Failed to add service: timeout");
    notifier.dismiss(first.id);

    assert_eq!(notifier.current(), Some(&second));
    assert_eq!(second.ttl, std::time::Duration::from_secs(5));

    notifier.dismiss(second.id);
    assert_eq!(notifier.current(), None);
}

#[test]
fn config_defaults_are_valid() {
    let config = AppConfig::default();

    assert_eq!(config.sheet_name, "Service DB");
    assert_eq!(config.request_timeout_secs, 30);
    assert!(config.validate().is_ok());
    assert_eq!(
        config.notification_timings(),
        NotificationTimings::default()
    );
}

#[test]
fn config_reads_toml_roles() {
    let config = AppConfig::from_toml_str(
        r#"
sheet_name = "Catalog"
request_timeout_secs = 10

[notifications]
success_secs = 2

[roles]
"Fee" = "price"
"Kind" = "category"
"#,
    )
    .expect("config should parse");

    assert_eq!(config.sheet_name, "Catalog");
    assert_eq!(config.request_timeout_secs, 10);
    assert_eq!(config.notifications.success_secs, 2);
    assert_eq!(config.notifications.error_secs, 5);
    assert_eq!(config.roles.get("Fee"), Some(&FieldRole::Price));
    assert_eq!(config.roles.get("Kind"), Some(&FieldRole::Category));
}

#[test]
fn env_overrides_replace_non_empty_values() {
    let mut config = AppConfig::default();
    let env: BTreeMap<&str, &str> = BTreeMap::from([
        (SHEET_ID_ENV, "sheet-123"),
        (SHEET_NAME_ENV, "  "),
        (SCRIPT_URL_ENV, "ftp://example.com/exec"),
    ]);

    config.apply_env(|key| env.get(key).map(|value| value.to_string()));

    assert_eq!(config.sheet_id, "sheet-123");
    assert_eq!(config.sheet_name, "Service DB");
    assert!(config.validate().is_err(), "non-http script url should fail");
}

#[test]
fn csv_export_writes_labels_then_rows() {
    let catalog = sample_catalog();
    let rows = catalog.visible(&CategoryFilter::Named("Skin".to_string()), "");
    let mut buffer = Vec::new();

    let written = write_records(&mut buffer, catalog.schema.fields(), &rows)
        .expect("csv should be written");

    let output = String::from_utf8(buffer).expect("csv should be utf-8");
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(written, 2);
    assert_eq!(lines[0], "Serial No,Service Name,Category,Price,Duration");
    assert_eq!(lines[1], "SD-001,Facial,Skin,100,45 min");
    assert_eq!(lines.len(), 3);
}

#[test]
fn export_file_name_is_slugged_from_sheet() {
    assert_eq!(
        ExportService::new("Service DB").default_file_name(),
        "service-db.csv"
    );
    assert_eq!(ExportService::new("  ").default_file_name(), "services.csv");
}

#[test]
fn avg_price_is_shown_in_rupees_with_two_decimals() {
    assert_eq!(format_avg_price(200.0), "₹200.00");
    assert_eq!(format_avg_price(0.0), "₹0.00");
}

#[test]
fn window_and_stats_titles() {
    assert_eq!(APP_TITLE, "Services Management");
    assert_eq!(STATS_TITLE, "Service Statistics");
}

#[test]
fn sticky_header_styles_include_positioning() {
    let style = table_header_cell_style();

    assert!(style.contains("position: sticky"));
    assert!(style.contains("top: 0"));
}

#[test]
fn table_container_style_allows_scroll() {
    assert!(table_container_style().contains("overflow: auto"));
}

#[test]
fn notification_styles_differ_by_kind() {
    assert_ne!(
        notification_style(NotificationKind::Success),
        notification_style(NotificationKind::Error)
    );
    assert!(notification_style(NotificationKind::Warning).contains("position: fixed"));
}

#[test]
fn description_columns_are_truncated() {
    assert!(is_description_label("Description"));
    assert!(!is_description_label("Description Notes"));
    assert!(table_cell_style(true).contains("text-overflow: ellipsis"));
}
