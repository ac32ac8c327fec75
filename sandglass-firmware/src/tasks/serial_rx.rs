//! Serial console receive task
//!
//! Assembles lines from the UART and forwards parsed commands to the
//! hourglass task. Rejected lines are answered here directly.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use sandglass_protocol::{parse_command, CommandError, LineError, LineParser, Response};

use crate::channels::{COMMAND_CHANNEL, RESPONSE_CHANNEL};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Serial RX task - receives and parses console lines
#[embassy_executor::task]
pub async fn serial_rx_task(mut rx: BufferedUartRx) {
    info!("Serial RX task started");

    let mut parser = LineParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(line)) => handle_line(&line).await,
                        Ok(None) => {
                            // Need more bytes
                        }
                        Err(LineError::Overflow) => {
                            warn!("Console line overflow");
                            RESPONSE_CHANNEL
                                .send(CommandError::BufferOverflow.into())
                                .await;
                        }
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Parse one complete line and route the result
async fn handle_line(line: &str) {
    match parse_command(line) {
        Ok(Some(cmd)) => COMMAND_CHANNEL.send(cmd).await,
        Ok(None) => {}
        Err(e) => {
            debug!("Rejected command: {:?}", e);
            RESPONSE_CHANNEL.send(Response::Error(e)).await;
        }
    }
}
