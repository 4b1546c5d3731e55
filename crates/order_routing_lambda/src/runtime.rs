pub use order_routing_core::{contract, envelope, routing};
