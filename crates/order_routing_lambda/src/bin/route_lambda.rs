use lambda_runtime::{service_fn, Error, LambdaEvent};
use order_routing_lambda::adapters::dispatch_queue::DispatchQueue;
use order_routing_lambda::adapters::warehouse_store::JsonFileWarehouseStore;
use order_routing_lambda::config::{DISPATCH_QUEUE_URL_ENV, WAREHOUSE_TABLE_PATH_ENV};
use order_routing_lambda::handlers::route::{handle_route_batch, RouteSuccessResponse};
use order_routing_lambda::runtime::contract::DispatchMessage;
use order_routing_lambda::runtime::envelope::is_sqs_event;
use serde_json::Value;

struct SqsDispatchQueue {
    queue_url: String,
    sqs_client: aws_sdk_sqs::Client,
}

impl DispatchQueue for SqsDispatchQueue {
    fn send_dispatch(&self, message: &DispatchMessage) -> Result<String, String> {
        let body = serde_json::to_string(message)
            .map_err(|error| format!("failed to serialize dispatch message: {error}"))?;
        let client = self.sqs_client.clone();
        let queue_url = self.queue_url.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .send_message()
                    .queue_url(queue_url)
                    .message_body(body)
                    .send()
                    .await
                    .map(|output| output.message_id().unwrap_or_default().to_string())
                    .map_err(|error| format!("failed to enqueue dispatch message: {error}"))
            })
        })
    }
}

async fn handle_request(event: LambdaEvent<Value>) -> Result<Vec<RouteSuccessResponse>, Error> {
    if !is_sqs_event(&event.payload) {
        return Err(Error::from("route lambda expects an SQS event"));
    }

    let table_path = std::env::var(WAREHOUSE_TABLE_PATH_ENV)
        .map_err(|_| Error::from("WAREHOUSE_TABLE_PATH must be configured"))?;
    let queue_url = std::env::var(DISPATCH_QUEUE_URL_ENV)
        .map_err(|_| Error::from("DISPATCH_QUEUE_URL must be configured"))?;

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let queue = SqsDispatchQueue {
        queue_url,
        sqs_client: aws_sdk_sqs::Client::new(&aws_config),
    };
    let store = JsonFileWarehouseStore::new(table_path);

    handle_route_batch(event.payload, &store, &queue)
        .map_err(|error| Error::from(error.to_string()))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
