//! Hourglass task
//!
//! Owns the engine. Runs one update per tick and serves console commands
//! between ticks, so the engine never needs a lock.

use defmt::*;
use embassy_futures::select::{select, Either};

use sandglass_core::traits::{MatrixId, MATRIX_SIZE};
use sandglass_protocol::{Command, DisplayRows, Response};

use crate::board::Engine;
use crate::channels::{COMMAND_CHANNEL, RESPONSE_CHANNEL};
use crate::tasks::tick::TICK_SIGNAL;

/// Hourglass task - animates the glass and answers the console
#[embassy_executor::task]
pub async fn hourglass_task(mut engine: Engine) {
    info!("Hourglass task started");

    engine.init();
    engine.enter();
    flush(&mut engine);

    let mut alarm_was_active = false;

    loop {
        match select(TICK_SIGNAL.wait(), COMMAND_CHANNEL.receive()).await {
            Either::First(now_ms) => {
                let outcome = engine.update();
                flush(&mut engine);

                if outcome.dropped {
                    debug!("Grain dropped at {} ms, {}% run", now_ms, engine.progress());
                }
                if outcome.alarm_armed {
                    info!("Hourglass empty, alarm started");
                }

                let alarm_active = engine.alarm().is_active();
                if alarm_was_active && !alarm_active {
                    info!("Alarm finished");
                }
                alarm_was_active = alarm_active;
            }
            Either::Second(cmd) => {
                debug!("Command: {:?}", cmd);
                let response = handle_command(&mut engine, cmd);
                flush(&mut engine);
                RESPONSE_CHANNEL.send(response).await;
            }
        }
    }
}

/// Apply a console command to the engine
fn handle_command(engine: &mut Engine, cmd: Command) -> Response {
    match cmd {
        Command::GetStatus => Response::Status(engine.status()),
        Command::GetOrientation => Response::Orientation(engine.status()),
        Command::GetDisplay => Response::Display(display_rows(engine)),
        Command::SetDuration { hours, minutes } => {
            engine.set_duration(hours as i32, minutes as i32);
            let duration = engine.duration();
            info!(
                "Duration set to {}h {}m",
                duration.hours(),
                duration.minutes()
            );
            Response::Ok
        }
        Command::ResetHourglass => {
            engine.reset();
            info!("Hourglass reset");
            Response::Ok
        }
        Command::SetBrightness(level) => {
            if let Err(e) = engine.matrices_mut().set_intensity(level) {
                warn!("Failed to set intensity: {:?}", e);
            }
            Response::Ok
        }
    }
}

/// Snapshot the raw rows of both matrices
fn display_rows(engine: &Engine) -> DisplayRows {
    let field = engine.matrices().field();
    let mut rows: DisplayRows = [[0; MATRIX_SIZE as usize]; 2];
    for id in MatrixId::ALL {
        let grid = field.grid(id);
        for (y, row) in rows[id.index()].iter_mut().enumerate() {
            *row = grid.row_bits(y as u8);
        }
    }
    rows
}

/// Push the frame buffer to the panels
fn flush(engine: &mut Engine) {
    if let Err(e) = engine.matrices_mut().flush() {
        warn!("Display flush failed: {:?}", e);
    }
}
