use std::path::Path;
use std::sync::Mutex;

use order_routing_lambda::adapters::json_file::JsonFileError;
use order_routing_lambda::adapters::notifier::{
    ConsoleNotifier, WarehouseNotification, WarehouseNotifier,
};
use order_routing_lambda::config::SimulationPaths;
use order_routing_lambda::handlers::notify::NotifyHandlerError;
use order_routing_lambda::handlers::route::RouteHandlerError;
use order_routing_lambda::runtime::envelope::EnvelopeError;
use order_routing_lambda::simulation::{
    run_notify_stage, run_pipeline, run_route_stage, NotifyStageError, PipelineError,
    RouteStageError,
};
use serde_json::{json, Value};

struct RecordingNotifier {
    notifications: Mutex<Vec<WarehouseNotification>>,
}

impl RecordingNotifier {
    fn new() -> Self {
        Self {
            notifications: Mutex::new(Vec::new()),
        }
    }

    fn notifications(&self) -> Vec<WarehouseNotification> {
        self.notifications.lock().expect("poisoned mutex").clone()
    }
}

impl WarehouseNotifier for RecordingNotifier {
    fn notify(&self, notification: &WarehouseNotification) -> Result<(), String> {
        self.notifications
            .lock()
            .expect("poisoned mutex")
            .push(notification.clone());
        Ok(())
    }
}

fn write_json(path: &Path, value: &Value) {
    std::fs::write(path, serde_json::to_string_pretty(value).expect("fixture should serialize"))
        .expect("fixture should be written");
}

fn seeded_dir(event: Value, warehouses: Value) -> (tempfile::TempDir, SimulationPaths) {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let paths = SimulationPaths::from_base_dir(dir.path());
    write_json(&paths.event_path, &event);
    write_json(&paths.warehouses_path, &warehouses);
    (dir, paths)
}

fn order_event(product_id: &str, x: f64, y: f64) -> Value {
    json!({
        "Records": [
            {"body": {"id_produto": product_id, "cliente_coords": [x, y]}}
        ]
    })
}

fn warehouses() -> Value {
    json!({
        "warehouse-north": [0.0, 10.0],
        "warehouse-center": [1.0, 1.0],
        "warehouse-south": [0.0, -10.0]
    })
}

#[test]
fn route_stage_writes_dispatch_file() {
    let (_dir, paths) = seeded_dir(order_event("PROD-1", 4.0, 5.0), warehouses());

    let response = run_route_stage(&paths).expect("route stage should pass");
    assert_eq!(response.destination_warehouse, "warehouse-center");
    assert!((response.distance - 5.0).abs() < 1e-12);

    let written: Value = serde_json::from_str(
        &std::fs::read_to_string(&paths.dispatch_path).expect("dispatch file should exist"),
    )
    .expect("dispatch file should parse");
    assert_eq!(
        written,
        json!({
            "id_produto": "PROD-1",
            "galpao_destino": "warehouse-center",
            "coordenadas_destino": [1.0, 1.0],
            "distancia_calculada": 5.0
        })
    );
}

#[test]
fn pipeline_notifies_routed_warehouse() {
    let (_dir, paths) = seeded_dir(order_event("PROD-2", 0.0, -7.0), warehouses());
    let notifier = RecordingNotifier::new();

    let outcome = run_pipeline(&paths, &notifier).expect("pipeline should pass");
    assert_eq!(outcome.route.destination_warehouse, "warehouse-south");
    assert_eq!(outcome.notify.warehouse, "warehouse-south");
    assert_eq!(outcome.notify.product_id, "PROD-2");
    assert_eq!(notifier.notifications().len(), 1);
}

#[test]
fn equidistant_warehouses_resolve_to_first_listed() {
    let (_dir, paths) = seeded_dir(
        order_event("PROD-3", 0.0, 0.0),
        json!({
            "warehouse-b": [0.0, 2.0],
            "warehouse-a": [0.0, -2.0]
        }),
    );

    let response = run_route_stage(&paths).expect("route stage should pass");
    assert_eq!(response.destination_warehouse, "warehouse-b");
}

#[test]
fn missing_event_file_writes_nothing() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let paths = SimulationPaths::from_base_dir(dir.path());
    write_json(&paths.warehouses_path, &warehouses());

    let error = run_route_stage(&paths).expect_err("missing event should fail");
    assert!(matches!(error, RouteStageError::EventUnavailable(_)));
    assert!(error.to_string().contains("not found"));
    assert!(!paths.dispatch_path.exists());
}

#[test]
fn malformed_warehouse_file_writes_nothing() {
    let (_dir, paths) = seeded_dir(order_event("PROD-4", 0.0, 0.0), json!({}));
    std::fs::write(&paths.warehouses_path, "{ not json").expect("fixture should be written");

    let error = run_route_stage(&paths).expect_err("malformed table should fail");
    match error {
        RouteStageError::Handler(RouteHandlerError::WarehousesUnavailable(message)) => {
            assert!(message.contains("is not valid JSON"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!paths.dispatch_path.exists());
}

#[test]
fn empty_warehouse_table_writes_nothing() {
    let (_dir, paths) = seeded_dir(order_event("PROD-5", 0.0, 0.0), json!({}));

    let error = run_route_stage(&paths).expect_err("empty table should fail");
    assert!(matches!(
        error,
        RouteStageError::Handler(RouteHandlerError::EmptyWarehouseTable)
    ));
    assert!(!paths.dispatch_path.exists());
}

#[test]
fn empty_records_are_rejected() {
    let (_dir, paths) = seeded_dir(json!({"Records": []}), warehouses());

    let error = run_route_stage(&paths).expect_err("empty records should fail");
    assert!(matches!(
        error,
        RouteStageError::Handler(RouteHandlerError::Envelope(EnvelopeError::EmptyOrInvalid))
    ));
}

#[test]
fn pipeline_stops_before_notify_when_routing_fails() {
    let (_dir, paths) = seeded_dir(json!({"Records": []}), warehouses());
    let notifier = RecordingNotifier::new();

    let error = run_pipeline(&paths, &notifier).expect_err("pipeline should fail");
    assert!(matches!(error, PipelineError::Route(_)));
    assert!(notifier.notifications().is_empty());
}

#[test]
fn notify_stage_reports_missing_dispatch_file() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let paths = SimulationPaths::from_base_dir(dir.path());

    let error = run_notify_stage(&paths, &RecordingNotifier::new())
        .expect_err("missing dispatch should fail");
    assert!(matches!(error, NotifyStageError::MessageUnavailable(_)));
}

#[test]
fn notify_stage_rejects_malformed_dispatch_file() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let paths = SimulationPaths::from_base_dir(dir.path());
    std::fs::write(&paths.dispatch_path, "galpao_destino=warehouse-center")
        .expect("fixture should be written");
    let notifier = RecordingNotifier::new();

    let error = run_notify_stage(&paths, &notifier).expect_err("malformed dispatch should fail");
    assert!(matches!(
        error,
        NotifyStageError::MessageUnavailable(JsonFileError::Malformed { .. })
    ));
    assert!(notifier.notifications().is_empty());
}

#[test]
fn notify_stage_names_missing_key() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let paths = SimulationPaths::from_base_dir(dir.path());
    write_json(
        &paths.dispatch_path,
        &json!({"id_produto": "PROD-6", "coordenadas_destino": [1, 1]}),
    );

    let error = run_notify_stage(&paths, &RecordingNotifier::new())
        .expect_err("incomplete dispatch should fail");
    match error {
        NotifyStageError::Handler(NotifyHandlerError::IncompleteMessage { key }) => {
            assert_eq!(key, "galpao_destino");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn notify_stage_prints_banner() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let paths = SimulationPaths::from_base_dir(dir.path());
    write_json(
        &paths.dispatch_path,
        &json!({
            "id_produto": "PROD-7",
            "galpao_destino": "warehouse-center",
            "coordenadas_destino": [1.0, 1.0],
            "distancia_calculada": 1.41
        }),
    );
    let notifier = ConsoleNotifier::new(Vec::new());

    run_notify_stage(&paths, &notifier).expect("notify stage should pass");

    let output = String::from_utf8(notifier.into_inner()).expect("output should be UTF-8");
    assert!(output.contains("  > To: warehouse-center API"));
    assert!(output.contains("  > Message: 'Prepare product PROD-7 for pickup.'"));
    assert!(output.contains("  > Customer destination (ref): (1, 1)"));
}
