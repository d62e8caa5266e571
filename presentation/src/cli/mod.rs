//! Command-line interface: argument definitions and input reading

pub mod commands;
pub mod input;
