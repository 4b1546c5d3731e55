use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::adapters::notifier::{WarehouseNotification, WarehouseNotifier};
use crate::runtime::contract::{
    dispatch_message_from_value, DispatchMessage, DispatchMessageError,
};
use crate::telemetry::{log_error, log_info};

const COMPONENT: &str = "notify_handler";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotifySuccessResponse {
    pub status: String,
    pub warehouse: String,
    pub product_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyHandlerError {
    #[error("dispatch message not found or invalid: {0}")]
    InvalidMessage(String),
    #[error("dispatch message is incomplete: missing key '{key}'")]
    IncompleteMessage { key: String },
    #[error("failed to notify warehouse: {0}")]
    NotifyFailed(String),
}

/// Notifies the destination warehouse named in a dispatch message.
pub fn handle_dispatch_message(
    message: Value,
    notifier: &impl WarehouseNotifier,
) -> Result<NotifySuccessResponse, NotifyHandlerError> {
    let dispatch = parse_dispatch(message)?;
    notify_warehouse(&dispatch, notifier)
}

/// Notifies every warehouse in a batch, once all messages have been validated.
pub fn handle_dispatch_batch(
    messages: Vec<Value>,
    notifier: &impl WarehouseNotifier,
) -> Result<Vec<NotifySuccessResponse>, NotifyHandlerError> {
    let dispatches = messages
        .into_iter()
        .map(parse_dispatch)
        .collect::<Result<Vec<_>, _>>()?;

    dispatches
        .iter()
        .map(|dispatch| notify_warehouse(dispatch, notifier))
        .collect()
}

fn parse_dispatch(message: Value) -> Result<DispatchMessage, NotifyHandlerError> {
    dispatch_message_from_value(message)
        .map_err(|error| match error {
            DispatchMessageError::MissingKey(key) => NotifyHandlerError::IncompleteMessage {
                key: key.to_string(),
            },
            other => NotifyHandlerError::InvalidMessage(other.to_string()),
        })
        .inspect_err(log_notify_failure)
}

fn notify_warehouse(
    dispatch: &DispatchMessage,
    notifier: &impl WarehouseNotifier,
) -> Result<NotifySuccessResponse, NotifyHandlerError> {
    let notification = WarehouseNotification::from(dispatch);
    notifier
        .notify(&notification)
        .map_err(NotifyHandlerError::NotifyFailed)
        .inspect_err(log_notify_failure)?;

    log_info(
        COMPONENT,
        "warehouse_notified",
        json!({
            "warehouse": notification.warehouse.clone(),
            "product_id": notification.product_id.clone(),
            "recipient": notification.recipient(),
        }),
    );

    Ok(NotifySuccessResponse {
        status: "notified".to_string(),
        warehouse: notification.warehouse,
        product_id: notification.product_id,
    })
}

fn log_notify_failure(error: &NotifyHandlerError) {
    log_error(
        COMPONENT,
        "notification_failed",
        json!({"error": error.to_string()}),
    );
}
