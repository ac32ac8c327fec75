//! Sandglass serial console protocol
//!
//! A line-oriented ASCII protocol for a host on the USB-serial link:
//!
//! ```text
//! host   > SET_HG 0 10
//! device < OK
//! host   > GET_STATUS
//! device < {"mode":"hourglass","progress":0,"hours":0,"minutes":10,"alarm":false,"angle":0}
//! ```
//!
//! Lines end with `\n` or `\r`, hold at most 31 printable ASCII characters
//! and are matched case-insensitively. Replies are `OK`, `ERR <message>` or a
//! single JSON object.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod line;
pub mod response;

pub use command::{parse_command, Command, CommandError};
pub use line::{Line, LineError, LineParser, LINE_CAPACITY, MAX_LINE_LEN};
pub use response::{DisplayRows, Response, ResponseLine, MAX_RESPONSE_LEN};
