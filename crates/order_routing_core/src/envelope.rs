//! Queue event envelopes.
//!
//! Orders arrive wrapped in an SQS-shaped event: `{"Records": [{"body": ...}]}`.
//! Local simulation files carry the body as a JSON object, while a real queue
//! delivers it as a JSON string; both are accepted.

use serde_json::Value;

use crate::contract::OrderMessage;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvelopeError {
    #[error("simulated queue event is empty or has an invalid format")]
    EmptyOrInvalid,
    #[error("failed to process queue message: {0}")]
    MalformedMessage(String),
}

const SQS_EVENT_SOURCE: &str = "aws:sqs";

/// True only when every record in a non-empty batch was delivered by SQS.
pub fn is_sqs_event(event: &Value) -> bool {
    match event.get("Records").and_then(Value::as_array) {
        Some(records) if !records.is_empty() => records.iter().all(is_sqs_record),
        _ => false,
    }
}

fn is_sqs_record(record: &Value) -> bool {
    record.get("eventSource").and_then(Value::as_str) == Some(SQS_EVENT_SOURCE)
}

/// Decodes the body of every record in the event.
pub fn record_bodies(event: &Value) -> Result<Vec<Value>, EnvelopeError> {
    let records = event
        .get("Records")
        .and_then(Value::as_array)
        .filter(|records| !records.is_empty())
        .ok_or(EnvelopeError::EmptyOrInvalid)?;

    records.iter().map(decode_body).collect()
}

/// Reads the order carried by the first record only.
pub fn first_order_message(event: &Value) -> Result<OrderMessage, EnvelopeError> {
    let record = event
        .get("Records")
        .and_then(Value::as_array)
        .and_then(|records| records.first())
        .ok_or(EnvelopeError::EmptyOrInvalid)?;

    order_from_body(decode_body(record)?)
}

pub fn order_messages(event: &Value) -> Result<Vec<OrderMessage>, EnvelopeError> {
    record_bodies(event)?
        .into_iter()
        .map(order_from_body)
        .collect()
}

fn decode_body(record: &Value) -> Result<Value, EnvelopeError> {
    match record.get("body") {
        Some(Value::Object(_)) => Ok(record["body"].clone()),
        Some(Value::String(text)) => serde_json::from_str(text).map_err(|error| {
            EnvelopeError::MalformedMessage(format!("record body is not valid JSON: {error}"))
        }),
        Some(_) => Err(EnvelopeError::MalformedMessage(
            "record body must be a JSON object or string".to_string(),
        )),
        None => Err(EnvelopeError::MalformedMessage(
            "record is missing 'body'".to_string(),
        )),
    }
}

fn order_from_body(body: Value) -> Result<OrderMessage, EnvelopeError> {
    serde_json::from_value(body)
        .map_err(|error| EnvelopeError::MalformedMessage(error.to_string()))
}
