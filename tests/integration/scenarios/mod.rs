//! User journey tests

pub mod cancel_test;
pub mod homework_actions_test;
pub mod homework_creation_test;
