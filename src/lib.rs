// Main library entry point for semgraph.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;
