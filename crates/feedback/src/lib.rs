//! `feedback` - A small feedback-collection service
//!
//! This library provides validation of feedback submissions, a flat JSON
//! file store with pagination and search, and the HTTP server exposing them.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod server;
pub mod storage;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{FeedbackRecord, NewFeedback};
pub use storage::{FeedbackStore, Page, PageRequest, StoreStats};
pub use validation::Validator;
