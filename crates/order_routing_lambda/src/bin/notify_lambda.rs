use lambda_runtime::{service_fn, Error, LambdaEvent};
use order_routing_lambda::adapters::notifier::ConsoleNotifier;
use order_routing_lambda::handlers::notify::{handle_dispatch_batch, NotifySuccessResponse};
use order_routing_lambda::runtime::envelope::{is_sqs_event, record_bodies};
use serde_json::Value;

async fn handle_request(event: LambdaEvent<Value>) -> Result<Vec<NotifySuccessResponse>, Error> {
    let messages = decode_dispatch_messages(&event.payload)?;
    let notifier = ConsoleNotifier::stdout();

    handle_dispatch_batch(messages, &notifier).map_err(|error| Error::from(error.to_string()))
}

fn decode_dispatch_messages(event: &Value) -> Result<Vec<Value>, Error> {
    if !is_sqs_event(event) {
        return Err(Error::from("notify lambda expects an SQS event"));
    }

    record_bodies(event).map_err(|error| Error::from(error.to_string()))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
