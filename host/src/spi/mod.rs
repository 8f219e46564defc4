//! L3 SPI: external integration — host configuration and the demo command
//! handlers wired up by the binary.
pub mod config;
pub mod demo;
