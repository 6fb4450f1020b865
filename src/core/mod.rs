pub mod catalog;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod generation;
pub mod style;
