//! Batch file interfaces used by the `paygate` binary.

pub mod csv;
