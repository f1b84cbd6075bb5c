#[macro_use]
extern crate failure;

#[macro_use]
extern crate log;

pub mod cafeteria;
pub mod config;
pub mod discrete_system;
pub mod random;
pub mod report;
pub mod stats;
