//! Data types for the grid model.

mod cell;
mod record;

pub use cell::*;
pub use record::*;
