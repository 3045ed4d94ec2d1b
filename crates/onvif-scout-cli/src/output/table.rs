//! Table-formatted output for CLI.

use comfy_table::{Cell, ContentArrangement, Table};

use super::OutputFormatter;
use onvif_scout_core::DiscoveryDevice;

pub struct TableOutput;

impl TableOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TableOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableOutput {
    fn format_devices(&self, devices: &[DiscoveryDevice]) -> String {
        if devices.is_empty() {
            return "No devices found.".to_string();
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Address", "Name", "Model", "Types", "XAddrs"]);

        for device in devices {
            table.add_row(vec![
                Cell::new(device.address.to_string()),
                Cell::new(&device.name),
                Cell::new(&device.model),
                Cell::new(device.types.join("\n")),
                Cell::new(device.xaddresses.join("\n")),
            ]);
        }

        format!("{}\n\nFound {} device(s)", table, devices.len())
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }
}
