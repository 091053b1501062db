// Library module for modsweep
// Re-exports modules for use in integration tests and the binary

pub mod app;
pub mod cli;
pub mod config;
pub mod fs;
pub mod manifest;
pub mod remover;
