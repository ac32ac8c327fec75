//! Console replies
//!
//! Every reply is a single line terminated by `\r\n`: `OK`, `ERR <message>`
//! or a compact JSON object.

use core::fmt::{self, Write};

use heapless::String;
use sandglass_core::traits::MATRIX_SIZE;
use sandglass_core::HourglassStatus;

use crate::command::CommandError;

/// Longest reply line, terminator included
pub const MAX_RESPONSE_LEN: usize = 128;

/// One reply line
pub type ResponseLine = String<MAX_RESPONSE_LEN>;

/// Raw row bytes of both matrices, bit `x` of byte `y` is cell `(x, y)`
pub type DisplayRows = [[u8; MATRIX_SIZE as usize]; 2];

/// Reply to a console command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Ok,
    Error(CommandError),
    Status(HourglassStatus),
    Orientation(HourglassStatus),
    Display(DisplayRows),
}

impl From<CommandError> for Response {
    fn from(e: CommandError) -> Self {
        Response::Error(e)
    }
}

impl Response {
    /// Write the reply without its line terminator
    pub fn write_to<W: Write>(&self, out: &mut W) -> fmt::Result {
        match self {
            Response::Ok => out.write_str("OK"),
            Response::Error(e) => write!(out, "ERR {}", e.message()),
            Response::Status(s) => write!(
                out,
                "{{\"mode\":\"hourglass\",\"progress\":{},\"hours\":{},\"minutes\":{},\"alarm\":{},\"angle\":{}}}",
                s.progress,
                s.duration.hours(),
                s.duration.minutes(),
                s.alarm_active,
                s.angle
            ),
            Response::Orientation(s) => write!(
                out,
                "{{\"angle\":{},\"top\":\"{}\",\"flat\":{}}}",
                s.angle,
                s.top.as_str(),
                s.flat
            ),
            Response::Display([a, b]) => {
                out.write_str("{\"a\":")?;
                write_rows(out, a)?;
                out.write_str(",\"b\":")?;
                write_rows(out, b)?;
                out.write_char('}')
            }
        }
    }

    /// Render the reply as a terminated line
    pub fn to_line(&self) -> Result<ResponseLine, fmt::Error> {
        let mut line = ResponseLine::new();
        self.write_to(&mut line)?;
        line.push_str("\r\n").map_err(|_| fmt::Error)?;
        Ok(line)
    }
}

fn write_rows<W: Write>(out: &mut W, rows: &[u8]) -> fmt::Result {
    out.write_char('[')?;
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            out.write_char(',')?;
        }
        write!(out, "{}", row)?;
    }
    out.write_char(']')
}
