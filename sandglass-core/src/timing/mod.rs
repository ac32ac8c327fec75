//! Duration handling and the cross-neck drop timer

pub mod neck;
pub mod duration;

pub use neck::{transfer, DropScheduler, DropTimer, NECK_A, NECK_B};
pub use duration::{DurationSetting, MAX_HOURS, MAX_MINUTES};
