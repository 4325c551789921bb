pub mod process_runner;

pub use process_runner::{format_command, ProcessRunner, SystemProcessRunner};
