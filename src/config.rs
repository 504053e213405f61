use std::collections::HashMap;

use serde::Deserialize;

use crate::cutout::SeverityPreset;

/// One configured lighting device. `cutout` names the edge band it samples
/// from; a device without one is skipped at startup. `channel` is the first
/// DMX channel of the strip, occupying `3 * leds` channels from there.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    pub leds: usize,
    pub cutout: Option<String>,
    #[serde(default)]
    pub channel: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub preset: SeverityPreset,
    pub fps: f32,
    pub single_threaded: bool,
    pub suppress_performance_warnings: bool,
    /// Region size used by the synthetic frame sources. File-backed sources
    /// bring their own geometry.
    pub width: usize,
    pub height: usize,
    pub ola_address: String,
    pub devices: HashMap<String, DeviceConfig>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            preset: SeverityPreset::default(),
            fps: 30.0,
            single_threaded: false,
            suppress_performance_warnings: false,
            width: 1920,
            height: 1080,
            ola_address: "127.0.0.1:7770".to_string(),
            devices: HashMap::new(),
        }
    }
}
