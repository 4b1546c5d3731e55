use std::io::Write;
use std::sync::Mutex;

use crate::runtime::contract::{Coordinates, DispatchMessage};

#[derive(Debug, Clone, PartialEq)]
pub struct WarehouseNotification {
    pub warehouse: String,
    pub product_id: String,
    pub destination_coords: Coordinates,
}

impl WarehouseNotification {
    pub fn recipient(&self) -> String {
        format!("{} API", self.warehouse)
    }

    pub fn message(&self) -> String {
        format!("Prepare product {} for pickup.", self.product_id)
    }
}

impl From<&DispatchMessage> for WarehouseNotification {
    fn from(message: &DispatchMessage) -> Self {
        Self {
            warehouse: message.destination_warehouse.clone(),
            product_id: message.product_id.clone(),
            destination_coords: message.destination_coords,
        }
    }
}

pub trait WarehouseNotifier {
    fn notify(&self, notification: &WarehouseNotification) -> Result<(), String>;
}

/// Prints the notification banner to a writer, stdout in the binaries.
pub struct ConsoleNotifier<W: Write> {
    out: Mutex<W>,
}

impl<W: Write> ConsoleNotifier<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ConsoleNotifier<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> WarehouseNotifier for ConsoleNotifier<W> {
    fn notify(&self, notification: &WarehouseNotification) -> Result<(), String> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| "notification writer lock poisoned".to_string())?;
        write_banner(&mut *out, notification)
            .map_err(|error| format!("failed to write notification: {error}"))
    }
}

fn write_banner(out: &mut impl Write, notification: &WarehouseNotification) -> std::io::Result<()> {
    writeln!(out, "... NOTIFICATION SENT ...")?;
    writeln!(out, "  > To: {}", notification.recipient())?;
    writeln!(out, "  > Message: '{}'", notification.message())?;
    writeln!(
        out,
        "  > Customer destination (ref): {}",
        notification.destination_coords
    )?;
    writeln!(out, "... NOTIFICATION COMPLETE ...")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_notifier_writes_banner() {
        let notifier = ConsoleNotifier::new(Vec::new());
        let notification = WarehouseNotification {
            warehouse: "warehouse-north".to_string(),
            product_id: "SKU-11".to_string(),
            destination_coords: Coordinates::new(2.0, 7.5),
        };

        notifier.notify(&notification).expect("notify should succeed");

        let output = String::from_utf8(notifier.into_inner()).expect("output should be UTF-8");
        assert_eq!(
            output,
            "... NOTIFICATION SENT ...\n\
             \x20 > To: warehouse-north API\n\
             \x20 > Message: 'Prepare product SKU-11 for pickup.'\n\
             \x20 > Customer destination (ref): (2, 7.5)\n\
             ... NOTIFICATION COMPLETE ...\n"
        );
    }
}
