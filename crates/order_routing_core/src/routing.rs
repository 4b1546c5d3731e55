//! Nearest-warehouse selection.
//!
//! A linear scan over the warehouse table comparing squared Euclidean
//! distances. The square root is taken once, for the winner only.

use crate::contract::{Coordinates, DispatchMessage, WarehouseTable};

#[derive(Debug, Clone, PartialEq)]
pub struct NearestWarehouse {
    pub id: String,
    pub coords: Coordinates,
    pub distance: f64,
}

impl NearestWarehouse {
    pub fn into_dispatch(self, product_id: impl Into<String>) -> DispatchMessage {
        DispatchMessage {
            product_id: product_id.into(),
            destination_warehouse: self.id,
            destination_coords: self.coords,
            distance: Some(self.distance),
        }
    }
}

pub fn squared_distance(a: Coordinates, b: Coordinates) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Finds the warehouse closest to `customer`.
///
/// Ties go to the warehouse listed first. Returns `None` when the table is
/// empty or when no candidate has a finite distance.
pub fn nearest_warehouse(
    customer: Coordinates,
    table: &WarehouseTable,
) -> Option<NearestWarehouse> {
    let mut best_squared = f64::INFINITY;
    let mut best = None;

    for warehouse in table.iter() {
        let candidate = squared_distance(customer, warehouse.coords);
        if candidate < best_squared {
            best_squared = candidate;
            best = Some(warehouse);
        }
    }

    best.map(|warehouse| NearestWarehouse {
        id: warehouse.id.clone(),
        coords: warehouse.coords,
        distance: best_squared.sqrt(),
    })
}
