use std::path::PathBuf;

use serde_json::json;

use crate::adapters::json_file::save_json;
use crate::runtime::contract::DispatchMessage;
use crate::telemetry::log_info;

pub trait DispatchQueue {
    /// Enqueues the message and returns where it was delivered.
    fn send_dispatch(&self, message: &DispatchMessage) -> Result<String, String>;
}

/// Dispatch queue simulated by a single JSON file, overwritten on each send.
#[derive(Debug, Clone)]
pub struct FileDispatchQueue {
    pub path: PathBuf,
}

impl FileDispatchQueue {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DispatchQueue for FileDispatchQueue {
    fn send_dispatch(&self, message: &DispatchMessage) -> Result<String, String> {
        save_json(message, &self.path).map_err(|error| error.to_string())?;
        let location = self.path.display().to_string();
        log_info(
            "dispatch_queue",
            "dispatch_message_saved",
            json!({
                "path": location.clone(),
                "product_id": message.product_id.clone(),
            }),
        );
        Ok(location)
    }
}
