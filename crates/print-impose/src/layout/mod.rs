//! Layout calculation modules for imposition
//!
//! This module handles the geometric side of imposition:
//! - Choosing between the original and rotated orientation
//! - Counting columns and rows inside the usable area
//! - Centering the grid and positioning every copy

mod grid;
mod types;

pub use grid::*;
pub use types::*;
