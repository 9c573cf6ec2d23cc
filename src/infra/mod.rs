//! Concrete providers backed by the shared [`crate::fetch::Transport`].

pub mod geo;
