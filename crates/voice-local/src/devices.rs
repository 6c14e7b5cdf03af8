use crate::AudioError;
use cpal::traits::{DeviceTrait, HostTrait};
use tracing::info;

/// Names of the default devices found on the host.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub input: String,
    pub output: String,
    pub sample_rate_hz: u32,
}

/// Check that both a default microphone and a default speaker exist.
///
/// The assistant cannot work without either, so callers treat an error here
/// as fatal at startup.
pub fn probe_default_devices() -> Result<DeviceInfo, AudioError> {
    let host = cpal::default_host();
    let input = host
        .default_input_device()
        .ok_or(AudioError::NoDevice("input"))?;
    let output = host
        .default_output_device()
        .ok_or(AudioError::NoDevice("output"))?;
    let config = input
        .default_input_config()
        .map_err(|e| AudioError::Unavailable(format!("input config: {e}")))?;

    let info = DeviceInfo {
        input: input.name().unwrap_or_else(|_| "unknown".to_string()),
        output: output.name().unwrap_or_else(|_| "unknown".to_string()),
        sample_rate_hz: config.sample_rate().0,
    };
    info!(
        "Audio devices: input '{}' at {}Hz, output '{}'",
        info.input, info.sample_rate_hz, info.output
    );
    Ok(info)
}
