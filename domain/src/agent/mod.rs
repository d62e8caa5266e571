//! Agent result types.

pub mod entities;
