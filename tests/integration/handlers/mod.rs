//! Handler tests

pub mod callbacks;
pub mod commands;
