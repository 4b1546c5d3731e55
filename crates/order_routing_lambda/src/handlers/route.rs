use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::adapters::dispatch_queue::DispatchQueue;
use crate::adapters::warehouse_store::WarehouseStore;
use crate::runtime::contract::{order_fingerprint, DispatchMessage, OrderMessage, WarehouseTable};
use crate::runtime::envelope::{first_order_message, order_messages, EnvelopeError};
use crate::runtime::routing::nearest_warehouse;
use crate::telemetry::{log_error, log_info};

const COMPONENT: &str = "route_handler";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteSuccessResponse {
    pub status: String,
    pub product_id: String,
    pub destination_warehouse: String,
    pub distance: f64,
    pub order_fingerprint: String,
    pub dispatch_location: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteHandlerError {
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
    #[error("warehouse table could not be loaded: {0}")]
    WarehousesUnavailable(String),
    #[error("warehouse table could not be loaded: table is empty")]
    EmptyWarehouseTable,
    #[error("no destination warehouse could be found")]
    NoWarehouseFound,
    #[error("failed to send dispatch message: {0}")]
    DispatchFailed(String),
}

/// Routes the first order in a queue event and enqueues its dispatch message.
pub fn handle_route_event(
    event: Value,
    store: &impl WarehouseStore,
    queue: &impl DispatchQueue,
) -> Result<RouteSuccessResponse, RouteHandlerError> {
    route_first_order(event, store, queue, &mut io::stdout())
}

/// Routes every order in a queue batch against a single table load.
///
/// Nothing is enqueued unless every order in the batch has a destination.
pub fn handle_route_batch(
    event: Value,
    store: &impl WarehouseStore,
    queue: &impl DispatchQueue,
) -> Result<Vec<RouteSuccessResponse>, RouteHandlerError> {
    route_every_order(event, store, queue, &mut io::stdout())
}

fn route_first_order(
    event: Value,
    store: &impl WarehouseStore,
    queue: &impl DispatchQueue,
    console: &mut impl Write,
) -> Result<RouteSuccessResponse, RouteHandlerError> {
    let order = first_order_message(&event).inspect_err(log_rejected_event)?;
    let fingerprint = announce_order(&order, console);
    let table = load_table(store, &fingerprint)?;
    let dispatch = plan_dispatch(&order, &fingerprint, &table, console)?;
    enqueue_dispatch(dispatch, fingerprint, queue)
}

fn route_every_order(
    event: Value,
    store: &impl WarehouseStore,
    queue: &impl DispatchQueue,
    console: &mut impl Write,
) -> Result<Vec<RouteSuccessResponse>, RouteHandlerError> {
    let orders = order_messages(&event).inspect_err(log_rejected_event)?;
    let fingerprints: Vec<String> = orders
        .iter()
        .map(|order| announce_order(order, console))
        .collect();
    let Some(first) = fingerprints.first() else {
        return Ok(Vec::new());
    };
    let table = load_table(store, first)?;

    let planned = orders
        .iter()
        .zip(fingerprints)
        .map(|(order, fingerprint)| {
            plan_dispatch(order, &fingerprint, &table, console)
                .map(|dispatch| (dispatch, fingerprint))
        })
        .collect::<Result<Vec<_>, _>>()?;

    planned
        .into_iter()
        .map(|(dispatch, fingerprint)| enqueue_dispatch(dispatch, fingerprint, queue))
        .collect()
}

fn announce_order(order: &OrderMessage, console: &mut impl Write) -> String {
    let fingerprint = order_fingerprint(order);

    log_info(
        COMPONENT,
        "order_received",
        json!({
            "product_id": order.product_id.clone(),
            "customer_coords": order.customer_coords,
            "order_fingerprint": fingerprint.clone(),
        }),
    );
    let _ = writeln!(
        console,
        "Processing order: product '{}' for customer at {}",
        order.product_id, order.customer_coords
    );

    fingerprint
}

fn load_table(
    store: &impl WarehouseStore,
    fingerprint: &str,
) -> Result<WarehouseTable, RouteHandlerError> {
    store
        .load_warehouses()
        .map_err(RouteHandlerError::WarehousesUnavailable)
        .inspect_err(|error| log_route_failure(fingerprint, error))
}

fn plan_dispatch(
    order: &OrderMessage,
    fingerprint: &str,
    table: &WarehouseTable,
    console: &mut impl Write,
) -> Result<DispatchMessage, RouteHandlerError> {
    let dispatch =
        route_order(order, table).inspect_err(|error| log_route_failure(fingerprint, error))?;

    let _ = writeln!(
        console,
        "Calculation complete: best warehouse is '{}' at {:.2} units.",
        dispatch.destination_warehouse,
        dispatch.distance.unwrap_or_default()
    );

    Ok(dispatch)
}

fn enqueue_dispatch(
    dispatch: DispatchMessage,
    fingerprint: String,
    queue: &impl DispatchQueue,
) -> Result<RouteSuccessResponse, RouteHandlerError> {
    let dispatch_location = queue
        .send_dispatch(&dispatch)
        .map_err(RouteHandlerError::DispatchFailed)
        .inspect_err(|error| log_route_failure(&fingerprint, error))?;

    Ok(RouteSuccessResponse {
        status: "ok".to_string(),
        distance: dispatch.distance.unwrap_or_default(),
        product_id: dispatch.product_id,
        destination_warehouse: dispatch.destination_warehouse,
        order_fingerprint: fingerprint,
        dispatch_location,
    })
}

/// Picks the destination warehouse for one order.
pub fn route_order(
    order: &OrderMessage,
    table: &WarehouseTable,
) -> Result<DispatchMessage, RouteHandlerError> {
    if table.is_empty() {
        return Err(RouteHandlerError::EmptyWarehouseTable);
    }

    let nearest = nearest_warehouse(order.customer_coords, table)
        .ok_or(RouteHandlerError::NoWarehouseFound)?;

    log_info(
        COMPONENT,
        "route_computed",
        json!({
            "product_id": order.product_id.clone(),
            "destination_warehouse": nearest.id.clone(),
            "distance": nearest.distance,
            "candidates": table.len(),
        }),
    );

    Ok(nearest.into_dispatch(order.product_id.clone()))
}

fn log_rejected_event(error: &EnvelopeError) {
    log_error(
        COMPONENT,
        "order_rejected",
        json!({"error": error.to_string()}),
    );
}

fn log_route_failure(fingerprint: &str, error: &RouteHandlerError) {
    log_error(
        COMPONENT,
        "route_failed",
        json!({
            "order_fingerprint": fingerprint,
            "error": error.to_string(),
        }),
    );
}
