//! Domain layer for YTN.
//!
//! Holds the notification model, the pure payload codec and message parser,
//! and the traits through which the application layer reaches storage, the
//! tracker API, alert delivery and navigation.

pub mod alert;
pub mod broadcast;
pub mod config;
pub mod error;
pub mod navigation;
pub mod notification;
pub mod parser;
pub mod payload;
pub mod storage;
pub mod tracker;

// Re-export common error type
pub use error::NotifierError;
