use std::path::PathBuf;

use crate::adapters::json_file::load_json_value;
use crate::runtime::contract::WarehouseTable;

pub trait WarehouseStore {
    fn load_warehouses(&self) -> Result<WarehouseTable, String>;
}

/// Warehouse table read from a JSON file standing in for the database.
#[derive(Debug, Clone)]
pub struct JsonFileWarehouseStore {
    pub path: PathBuf,
}

impl JsonFileWarehouseStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl WarehouseStore for JsonFileWarehouseStore {
    fn load_warehouses(&self) -> Result<WarehouseTable, String> {
        let value = load_json_value(&self.path).map_err(|error| error.to_string())?;
        WarehouseTable::from_json_value(value).map_err(|error| {
            format!(
                "invalid warehouse table '{}': {}",
                self.path.display(),
                error.message()
            )
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryWarehouseStore {
    table: WarehouseTable,
}

impl InMemoryWarehouseStore {
    pub fn new(table: WarehouseTable) -> Self {
        Self { table }
    }
}

impl WarehouseStore for InMemoryWarehouseStore {
    fn load_warehouses(&self) -> Result<WarehouseTable, String> {
        Ok(self.table.clone())
    }
}
