//! Use cases orchestrating the domain over the ports.

pub mod run_council;
