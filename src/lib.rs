//! Sequential left-to-right summation of double vectors, plus the small
//! embedding layer (parsing, settings, reporting) used by the binary.

pub mod arithmetic_utils;
pub mod logging;
pub mod numeric_vector;
pub mod pipeline;
pub mod report;
pub mod sum_config;

pub use arithmetic_utils::{running_sums, sum};
pub use numeric_vector::NumericVector;
