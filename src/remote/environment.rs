use std::path::PathBuf;
use std::process::Stdio;

use snafu::{ResultExt, Snafu, ensure};
use tokio::process::Command;
use tracing::debug;

const ADB_BINARY: &str = "adb";
const DEVICE_LIST_HEADER: &str = "List of devices attached";
const READY_STATE: &str = "device";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub serial: String,
    pub state: String,
}

/// A usable adb binary with exactly one ready device behind it.
#[derive(Debug, Clone)]
pub struct Environment {
    pub adb: PathBuf,
    pub device: Device,
}

impl Environment {
    pub async fn detect() -> Result<Self, EnvironmentError> {
        let adb = which::which(ADB_BINARY).context(AdbNotFoundSnafu)?;
        debug!("Using adb at {}", adb.display());
        Self::with_adb(adb).await
    }

    /// Asks `adb` for its attached devices and keeps the single ready one.
    async fn with_adb(adb: PathBuf) -> Result<Self, EnvironmentError> {
        let output = Command::new(&adb)
            .arg("devices")
            .stdin(Stdio::null())
            .output()
            .await
            .context(DeviceListSnafu)?;
        ensure!(
            output.status.success(),
            DeviceListFailedSnafu {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
        );

        let devices = parse_device_list(&String::from_utf8_lossy(&output.stdout));
        debug!("Attached devices: {:?}", devices);
        let device = select_single_device(devices)?;

        Ok(Self { adb, device })
    }
}

/// Parses `adb devices` output, ignoring daemon start-up chatter.
pub fn parse_device_list(output: &str) -> Vec<Device> {
    output
        .lines()
        .skip_while(|line| !line.trim().starts_with(DEVICE_LIST_HEADER))
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('*'))
        .filter_map(|line| {
            let mut columns = line.split_whitespace();
            let serial = columns.next()?;
            let state = columns.next()?;
            Some(Device {
                serial: serial.to_string(),
                state: state.to_string(),
            })
        })
        .collect()
}

fn select_single_device(mut devices: Vec<Device>) -> Result<Device, EnvironmentError> {
    match devices.len() {
        0 => NoDeviceSnafu.fail(),
        1 => {
            let device = devices.remove(0);
            ensure!(
                device.state == READY_STATE,
                DeviceUnavailableSnafu {
                    serial: device.serial.clone(),
                    state: device.state.clone(),
                }
            );
            Ok(device)
        }
        _ => MultipleDevicesSnafu {
            serials: devices
                .into_iter()
                .map(|device| device.serial)
                .collect::<Vec<_>>()
                .join(", "),
        }
        .fail(),
    }
}

#[derive(Debug, Snafu)]
pub enum EnvironmentError {
    #[snafu(display("Unable to find adb in PATH"))]
    AdbNotFound { source: which::Error },
    #[snafu(display("Failed to list attached devices"))]
    DeviceListError { source: std::io::Error },
    #[snafu(display("'adb devices' failed with exit code {}: {}", status, stderr))]
    DeviceListFailed { status: i32, stderr: String },
    #[snafu(display("No device attached"))]
    NoDevice,
    #[snafu(display("More than one device attached: {}", serials))]
    MultipleDevices { serials: String },
    #[snafu(display("Device '{}' is not ready (state: {})", serial, state))]
    DeviceUnavailable { serial: String, state: String },
}
