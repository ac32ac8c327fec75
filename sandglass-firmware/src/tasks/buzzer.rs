//! Piezo buzzer task
//!
//! Drives a passive piezo with a 50% duty square wave on one PWM channel.
//! Timed tones end on their own unless a newer command arrives first.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_time::Timer;

use crate::board::BuzzerCommand;
use crate::channels::BUZZER_CMD;

/// Fixed clock divider, keeps audible periods within the 16-bit counter
const PWM_DIVIDER: u8 = 64;

/// Buzzer task - plays tones requested over [`BUZZER_CMD`]
#[embassy_executor::task]
pub async fn buzzer_task(mut pwm: Pwm<'static>) {
    info!("Buzzer task started");

    let mut pwm_config = PwmConfig::default();
    pwm_config.divider = PWM_DIVIDER.into();
    pwm_config.compare_a = 0;
    pwm.set_config(&pwm_config);

    let mut pending: Option<BuzzerCommand> = None;

    loop {
        let cmd = match pending.take() {
            Some(cmd) => cmd,
            None => BUZZER_CMD.wait().await,
        };

        match cmd {
            BuzzerCommand::Tone {
                frequency_hz,
                duration_ms,
            } => {
                set_tone(&mut pwm, &mut pwm_config, frequency_hz);
                trace!("Tone {} Hz for {:?} ms", frequency_hz, duration_ms);

                if let Some(ms) = duration_ms {
                    match select(Timer::after_millis(ms as u64), BUZZER_CMD.wait()).await {
                        Either::First(_) => set_silent(&mut pwm, &mut pwm_config),
                        Either::Second(next) => pending = Some(next),
                    }
                }
            }
            BuzzerCommand::Silence => {
                set_silent(&mut pwm, &mut pwm_config);
                trace!("Buzzer silenced");
            }
        }
    }
}

/// Counter top for `frequency_hz` at the fixed divider
fn pwm_top(frequency_hz: u16) -> u16 {
    let base = clk_sys_freq() / PWM_DIVIDER as u32;
    let top = base / (frequency_hz.max(1) as u32);
    top.saturating_sub(1).clamp(1, u16::MAX as u32) as u16
}

fn set_tone(pwm: &mut Pwm<'static>, config: &mut PwmConfig, frequency_hz: u16) {
    if frequency_hz == 0 {
        set_silent(pwm, config);
        return;
    }
    config.top = pwm_top(frequency_hz);
    config.compare_a = config.top / 2;
    pwm.set_config(config);
}

fn set_silent(pwm: &mut Pwm<'static>, config: &mut PwmConfig) {
    config.compare_a = 0;
    pwm.set_config(config);
}
