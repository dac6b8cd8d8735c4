//! Turns a classified command into the steps that answer it.

pub mod brain;
mod index_graph;

pub use brain::{Brain, DENIAL_NOTE, FALLBACK_NOTE, UNSUPPORTED_NOTE};
