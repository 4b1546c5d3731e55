//! Shared order routing domain primitives.
//!
//! This crate owns the wire contracts exchanged between the routing and
//! notification stages, queue envelope decoding, and the nearest-warehouse
//! search. It intentionally excludes file, queue, and Lambda runtime concerns;
//! those live in `order_routing_lambda`.

pub mod contract;
pub mod envelope;
pub mod routing;
