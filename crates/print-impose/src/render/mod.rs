//! PDF proof rendering
//!
//! - Building the proof page for a computed layout
//! - Writing documents to disk without blocking the runtime

mod io;
mod page;

pub use io::{render_proof, save_pdf};
pub use page::*;
