//! Completion domain: what a structured completion returns.

pub mod value_objects;
