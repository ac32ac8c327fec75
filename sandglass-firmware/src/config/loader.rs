//! Embedded configuration loader

use defmt::*;

use sandglass_core::config::{parse_config, SandglassConfig};

/// Parse the embedded configuration, falling back to defaults
pub fn load_config(source: &str) -> SandglassConfig {
    match parse_config(source) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            log_config_summary(&config);
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using built-in defaults");
            SandglassConfig::default()
        }
    }
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &SandglassConfig) {
    let hg = &config.hourglass;
    debug!(
        "  duration {}h {}m, tick {} ms",
        hg.duration.hours(),
        hg.duration.minutes(),
        hg.tick_interval_ms
    );
    debug!(
        "  reference {} deg, rotation offset {} deg",
        hg.reference_angle, hg.rotation_offset
    );
    debug!(
        "  tone {} Hz, alarm {}x {}/{} ms",
        hg.tone_hz, hg.alarm.cycles, hg.alarm.on_ms, hg.alarm.cycle_ms
    );
    debug!(
        "  display intensity {}, A at {}, B at {}",
        config.display.intensity, config.display.device_a, config.display.device_b
    );
    if !config.orientation.is_identity() {
        debug!(
            "  orientation offset {} deg, invert={}, snap={}",
            config.orientation.offset_degrees, config.orientation.invert, config.orientation.snap
        );
    }
    debug!("  serial {} baud", config.serial.baud_rate);
}
