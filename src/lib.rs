//! Historical median-income retrieval and ranking for ZIP codes.

pub mod cache;
pub mod classify;
pub mod config;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod ranking;
pub mod report;
pub mod series;
pub mod services;

pub use error::{RaterError, RaterResult};
