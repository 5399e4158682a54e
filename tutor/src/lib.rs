pub mod api;
pub mod config;
pub mod error;
pub mod generation;
pub mod models;
pub mod ocr;
pub mod services;
pub mod session;
pub mod speech;
