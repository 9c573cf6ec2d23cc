mod client;

pub use client::{GeoBoundaryClient, boundary_path, parse_feature_collection};
