//! Unit tests for individual components

mod error_test;
mod config_test;
mod console_test;
