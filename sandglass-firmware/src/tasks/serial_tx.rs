//! Serial console transmit task

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::RESPONSE_CHANNEL;

/// Serial TX task - writes replies to the console, one line each
#[embassy_executor::task]
pub async fn serial_tx_task(mut tx: BufferedUartTx) {
    info!("Serial TX task started");

    loop {
        let response = RESPONSE_CHANNEL.receive().await;

        let line = match response.to_line() {
            Ok(line) => line,
            Err(_) => {
                warn!("Reply too long, dropped");
                continue;
            }
        };

        if let Err(e) = tx.write_all(line.as_bytes()).await {
            warn!("Failed to send reply: {:?}", e);
        } else {
            trace!("Reply sent");
        }
    }
}
