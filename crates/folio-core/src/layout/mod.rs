//! Structure reconstruction from position-only text.
//!
//! Everything here is a pure function of its input and the thresholds in
//! [`LayoutConfig`](crate::config::schema::LayoutConfig).

pub mod paragraph;
pub mod rows;
pub mod table;
pub mod text;
