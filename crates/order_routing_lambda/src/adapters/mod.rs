pub mod dispatch_queue;
pub mod json_file;
pub mod notifier;
pub mod warehouse_store;
