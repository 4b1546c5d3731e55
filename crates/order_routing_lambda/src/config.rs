use std::path::{Path, PathBuf};

pub const BASE_DIR_ENV: &str = "ORDER_ROUTING_BASE_DIR";
pub const ORDER_EVENT_PATH_ENV: &str = "ORDER_EVENT_PATH";
pub const WAREHOUSE_TABLE_PATH_ENV: &str = "WAREHOUSE_TABLE_PATH";
pub const DISPATCH_MESSAGE_PATH_ENV: &str = "DISPATCH_MESSAGE_PATH";
pub const DISPATCH_QUEUE_URL_ENV: &str = "DISPATCH_QUEUE_URL";

pub const ORDER_EVENT_FILE: &str = "incoming_order_queue.json";
pub const WAREHOUSE_TABLE_FILE: &str = "warehouse_table.json";
pub const DISPATCH_MESSAGE_FILE: &str = "dispatch_queue.json";

/// Files standing in for the incoming queue, the warehouse database, and the
/// dispatch queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationPaths {
    pub event_path: PathBuf,
    pub warehouses_path: PathBuf,
    pub dispatch_path: PathBuf,
}

impl SimulationPaths {
    pub fn from_base_dir(base_dir: impl AsRef<Path>) -> Self {
        let base_dir = base_dir.as_ref();
        Self {
            event_path: base_dir.join(ORDER_EVENT_FILE),
            warehouses_path: base_dir.join(WAREHOUSE_TABLE_FILE),
            dispatch_path: base_dir.join(DISPATCH_MESSAGE_FILE),
        }
    }

    pub fn with_overrides(
        mut self,
        event_path: Option<PathBuf>,
        warehouses_path: Option<PathBuf>,
        dispatch_path: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = event_path {
            self.event_path = path;
        }
        if let Some(path) = warehouses_path {
            self.warehouses_path = path;
        }
        if let Some(path) = dispatch_path {
            self.dispatch_path = path;
        }
        self
    }
}
