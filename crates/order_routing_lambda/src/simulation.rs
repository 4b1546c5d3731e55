//! Local two-stage run over JSON files.
//!
//! Stage one reads the incoming queue file, routes the order against the
//! warehouse table file, and writes the dispatch queue file. Stage two reads
//! the dispatch queue file and notifies the chosen warehouse.

use crate::adapters::dispatch_queue::FileDispatchQueue;
use crate::adapters::json_file::{load_json_value, JsonFileError};
use crate::adapters::notifier::WarehouseNotifier;
use crate::adapters::warehouse_store::JsonFileWarehouseStore;
use crate::config::SimulationPaths;
use crate::handlers::notify::{handle_dispatch_message, NotifyHandlerError, NotifySuccessResponse};
use crate::handlers::route::{handle_route_event, RouteHandlerError, RouteSuccessResponse};

#[derive(Debug, thiserror::Error)]
pub enum RouteStageError {
    #[error("incoming order event unavailable: {0}")]
    EventUnavailable(#[source] JsonFileError),
    #[error(transparent)]
    Handler(#[from] RouteHandlerError),
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyStageError {
    #[error("dispatch message not found or invalid: {0}")]
    MessageUnavailable(#[source] JsonFileError),
    #[error(transparent)]
    Handler(#[from] NotifyHandlerError),
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("route stage failed: {0}")]
    Route(#[from] RouteStageError),
    #[error("notify stage failed: {0}")]
    Notify(#[from] NotifyStageError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    pub route: RouteSuccessResponse,
    pub notify: NotifySuccessResponse,
}

/// Failures are returned to the caller, which reports them once on stderr.
pub fn run_route_stage(paths: &SimulationPaths) -> Result<RouteSuccessResponse, RouteStageError> {
    println!("--- STARTING STAGE 1: ROUTE ORDER ---");
    let result = route_from_files(paths);
    println!("--- FINISHED STAGE 1 ---");
    result
}

fn route_from_files(paths: &SimulationPaths) -> Result<RouteSuccessResponse, RouteStageError> {
    let event = load_json_value(&paths.event_path).map_err(RouteStageError::EventUnavailable)?;
    let store = JsonFileWarehouseStore::new(&paths.warehouses_path);
    let queue = FileDispatchQueue::new(&paths.dispatch_path);
    let response = handle_route_event(event, &store, &queue)?;
    println!(
        "Success: dispatch message saved to '{}'",
        response.dispatch_location
    );
    Ok(response)
}

pub fn run_notify_stage(
    paths: &SimulationPaths,
    notifier: &impl WarehouseNotifier,
) -> Result<NotifySuccessResponse, NotifyStageError> {
    println!();
    println!("--- STARTING STAGE 2: NOTIFY WAREHOUSE ---");
    let result = load_json_value(&paths.dispatch_path)
        .map_err(NotifyStageError::MessageUnavailable)
        .and_then(|message| {
            handle_dispatch_message(message, notifier).map_err(NotifyStageError::from)
        });
    println!("--- FINISHED STAGE 2 ---");
    result
}

/// Runs stage one and, only if it succeeds, stage two.
pub fn run_pipeline(
    paths: &SimulationPaths,
    notifier: &impl WarehouseNotifier,
) -> Result<PipelineOutcome, PipelineError> {
    let route = run_route_stage(paths)?;
    let notify = run_notify_stage(paths, notifier)?;
    Ok(PipelineOutcome { route, notify })
}
