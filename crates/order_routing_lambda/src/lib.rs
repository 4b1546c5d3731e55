//! File- and queue-backed adapters and stage handlers for order routing.
//!
//! This crate owns runtime integration details (stage handlers, the simulated
//! queue and database files, warehouse notification) and exposes a single
//! runtime module boundary for the contract, envelope, and routing primitives
//! of `order_routing_core`.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod runtime;
pub mod simulation;
pub mod telemetry;
