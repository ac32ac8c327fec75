//! Build script for sandglass-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates sandglass.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate sandglass.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=sandglass.toml");

    let config_path = Path::new("sandglass.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: sandglass.toml not found!                                ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds sandglass.toml at build time.               ║\n\
            ║  Please create one in the sandglass-firmware directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read sandglass.toml                            ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in sandglass.toml                    ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    validate_sections(&config);
    validate_hourglass(&config);
    validate_display(&config);
    validate_serial(&config);

    println!("cargo:warning=sandglass.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Panic with a boxed list of errors
fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Check an optional integer key lies within `min..=max`
fn check_range(
    errors: &mut Vec<String>,
    table: &toml::Table,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
) {
    match table.get(key) {
        None => {}
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => {}
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
        }
        Some(_) => errors.push(format!("[{}] {} must be an integer", section, key)),
    }
}

/// Check an optional key is a boolean
fn check_bool(errors: &mut Vec<String>, table: &toml::Table, section: &str, key: &str) {
    if let Some(v) = table.get(key) {
        if !v.is_bool() {
            errors.push(format!("[{}] {} must be true or false", section, key));
        }
    }
}

/// Only the sections the firmware understands may appear
fn validate_sections(config: &toml::Value) {
    const KNOWN: [&str; 5] = ["hourglass", "alarm", "orientation", "display", "serial"];

    let mut errors = Vec::new();
    if let Some(table) = config.as_table() {
        for (name, value) in table {
            if !KNOWN.contains(&name.as_str()) {
                errors.push(format!("unknown section [{}]", name));
            } else if !value.is_table() {
                errors.push(format!("[{}] must be a table", name));
            }
        }
    }

    report("Unknown sections in sandglass.toml", &errors);
}

/// Validate the [hourglass], [hourglass.alarm] and [orientation] sections
fn validate_hourglass(config: &toml::Value) {
    let mut errors = Vec::new();

    if let Some(hg) = config.get("hourglass").and_then(|v| v.as_table()) {
        check_range(&mut errors, hg, "hourglass", "reference_angle", 0, 359);
        check_range(&mut errors, hg, "hourglass", "rotation_offset", 0, 359);
        check_range(&mut errors, hg, "hourglass", "tone_hz", 0, 65535);
        check_range(&mut errors, hg, "hourglass", "drop_tone_ms", 0, 65535);
        check_range(&mut errors, hg, "hourglass", "tick_interval_ms", 1, 1000);
        if let Some(tick) = hg.get("tick_interval_ms").and_then(|v| v.as_integer()) {
            if (1..=1000).contains(&tick) && 1000 % tick != 0 {
                errors.push("[hourglass] tick_interval_ms must divide 1000".to_string());
            }
        }
        check_range(&mut errors, hg, "hourglass", "hours", 0, 23);
        check_range(&mut errors, hg, "hourglass", "minutes", 0, 59);

        let hours = hg.get("hours").and_then(|v| v.as_integer()).unwrap_or(0);
        let minutes = hg.get("minutes").and_then(|v| v.as_integer()).unwrap_or(1);
        if hours == 0 && minutes == 0 {
            errors.push("[hourglass] duration must be at least one minute".to_string());
        }
    }

    let alarm = config
        .get("hourglass")
        .and_then(|hg| hg.get("alarm"))
        .or_else(|| config.get("alarm"))
        .and_then(|v| v.as_table());
    if let Some(alarm) = alarm {
        check_range(&mut errors, alarm, "alarm", "cycle_ms", 1, 60_000);
        check_range(&mut errors, alarm, "alarm", "on_ms", 0, 60_000);
        check_range(&mut errors, alarm, "alarm", "cycles", 0, 255);

        let cycle = alarm.get("cycle_ms").and_then(|v| v.as_integer()).unwrap_or(1000);
        let on = alarm.get("on_ms").and_then(|v| v.as_integer()).unwrap_or(200);
        if on > cycle {
            errors.push("[alarm] on_ms must not exceed cycle_ms".to_string());
        }
    }

    if let Some(orientation) = config.get("orientation").and_then(|v| v.as_table()) {
        check_range(&mut errors, orientation, "orientation", "offset_degrees", -359, 359);
        check_bool(&mut errors, orientation, "orientation", "invert");
        check_bool(&mut errors, orientation, "orientation", "snap");
    }

    report("Invalid hourglass configuration", &errors);
}

/// Validate the [display] section
fn validate_display(config: &toml::Value) {
    let display = match config.get("display").and_then(|v| v.as_table()) {
        Some(t) => t,
        None => return,
    };

    let mut errors = Vec::new();
    check_range(&mut errors, display, "display", "intensity", 0, 15);
    check_range(&mut errors, display, "display", "device_a", 0, 1);
    check_range(&mut errors, display, "display", "device_b", 0, 1);

    let a = display.get("device_a").and_then(|v| v.as_integer()).unwrap_or(1);
    let b = display.get("device_b").and_then(|v| v.as_integer()).unwrap_or(0);
    if a == b {
        errors.push("[display] device_a and device_b must differ".to_string());
    }

    report("Invalid display configuration", &errors);
}

/// Validate the [serial] section
fn validate_serial(config: &toml::Value) {
    let serial = match config.get("serial").and_then(|v| v.as_table()) {
        Some(t) => t,
        None => return,
    };

    let mut errors = Vec::new();
    check_range(&mut errors, serial, "serial", "baud_rate", 300, 921_600);
    check_range(&mut errors, serial, "serial", "baud", 300, 921_600);

    report("Invalid serial configuration", &errors);
}
