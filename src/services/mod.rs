//! Service traits for data the rater passes through without interpreting.

pub mod boundary_api;
