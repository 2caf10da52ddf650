//! Module for additional computational capabilities
pub mod geometry;
pub mod math_utils;
pub mod test_helper;
pub mod uom_macros;
pub use math_utils::{normalize_angle, usize_to_f64};
