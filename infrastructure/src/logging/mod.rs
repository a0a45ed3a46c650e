//! Spend logging to disk.

mod usage_log;

pub use usage_log::JsonlUsageLog;
