use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Keys a dispatch message must carry for the notification stage to act on it.
pub const DISPATCH_REQUIRED_KEYS: [&str; 3] =
    ["id_produto", "galpao_destino", "coordenadas_destino"];

/// A point on the routing plane, serialized as a `[x, y]` pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

impl Coordinates {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(value: Coordinates) -> Self {
        [value.x, value.y]
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderMessage {
    #[serde(rename = "id_produto")]
    pub product_id: String,
    #[serde(rename = "cliente_coords")]
    pub customer_coords: Coordinates,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Warehouse {
    pub id: String,
    pub coords: Coordinates,
}

/// Warehouse coordinates keyed by id, kept in document order.
///
/// The order matters: the nearest search breaks ties in favour of the
/// warehouse listed first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WarehouseTable {
    warehouses: Vec<Warehouse>,
}

impl WarehouseTable {
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Coordinates)>,
        S: Into<String>,
    {
        Self {
            warehouses: entries
                .into_iter()
                .map(|(id, coords)| Warehouse {
                    id: id.into(),
                    coords,
                })
                .collect(),
        }
    }

    pub fn from_json_value(value: Value) -> Result<Self, ValidationError> {
        let Value::Object(object) = value else {
            return Err(ValidationError::new(
                "warehouse table must be a JSON object mapping ids to coordinates",
            ));
        };

        let mut warehouses = Vec::with_capacity(object.len());
        for (id, coords) in object {
            let coords: Coordinates = serde_json::from_value(coords).map_err(|error| {
                ValidationError::new(format!(
                    "warehouse '{id}' has invalid coordinates: {error}"
                ))
            })?;
            warehouses.push(Warehouse { id, coords });
        }

        Ok(Self { warehouses })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Warehouse> {
        self.warehouses.iter()
    }

    pub fn len(&self) -> usize {
        self.warehouses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warehouses.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Warehouse> {
        self.warehouses.iter().find(|warehouse| warehouse.id == id)
    }
}

impl<'de> Deserialize<'de> for WarehouseTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_json_value(value).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DispatchMessage {
    #[serde(rename = "id_produto")]
    pub product_id: String,
    #[serde(rename = "galpao_destino")]
    pub destination_warehouse: String,
    #[serde(rename = "coordenadas_destino")]
    pub destination_coords: Coordinates,
    #[serde(
        rename = "distancia_calculada",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchMessageError {
    #[error("dispatch message must be a JSON object")]
    NotAnObject,
    #[error("dispatch message is empty")]
    Empty,
    #[error("dispatch message is incomplete: missing key '{0}'")]
    MissingKey(&'static str),
    #[error("malformed dispatch message: {0}")]
    Malformed(String),
}

/// Parses a dispatch message, naming the first required key that is missing.
pub fn dispatch_message_from_value(value: Value) -> Result<DispatchMessage, DispatchMessageError> {
    let Some(object) = value.as_object() else {
        return Err(DispatchMessageError::NotAnObject);
    };

    if object.is_empty() {
        return Err(DispatchMessageError::Empty);
    }

    if let Some(key) = DISPATCH_REQUIRED_KEYS
        .into_iter()
        .find(|key| !object.contains_key(*key))
    {
        return Err(DispatchMessageError::MissingKey(key));
    }

    serde_json::from_value(value)
        .map_err(|error| DispatchMessageError::Malformed(error.to_string()))
}

pub fn order_fingerprint(order: &OrderMessage) -> String {
    let mut hasher = Sha256::new();
    hasher.update(stable_contract_json(order));
    format!("{:x}", hasher.finalize())
}

pub fn stable_contract_json(value: impl Serialize) -> String {
    serde_json::to_string(&value).expect("serialization of contract value should not fail")
}
