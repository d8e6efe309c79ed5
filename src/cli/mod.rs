use crate::config::Settings;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// List available MIDI devices
    #[arg(long)]
    pub device_list: bool,

    /// Bind to a specific MIDI device
    #[arg(long)]
    pub bind_to_device: Option<String>,

    /// Read settings from a TOML file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print each device snapshot as JSON when its state changes
    #[arg(long)]
    pub json: bool,

    /// Also log to stderr
    #[arg(long)]
    pub verbose: bool,
}

impl Args {
    /// Flags given on the command line win over file and environment values
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(device) = &self.bind_to_device {
            settings.device = Some(device.clone());
        }
        if self.json {
            settings.print_json = true;
        }
    }
}

pub fn handle_device_list() -> Vec<String> {
    crate::midi::list_devices()
}

pub fn validate_device(device_name: &str, devices: &[String]) -> Result<(), String> {
    if !devices.iter().any(|d| d.contains(device_name)) {
        let mut error_msg = format!(
            "Error: Device '{}' not found in available devices:\n",
            device_name
        );
        for device in devices {
            error_msg.push_str(&format!("  - {}\n", device));
        }
        return Err(error_msg);
    }
    Ok(())
}
