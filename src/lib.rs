//! Poly Rolly - a terminal dice roller for tabletop games.
//!
//! Rollers roll `N` dice of `M` faces with a per-die and a final modifier,
//! groups roll their rollers together and share a browsable history, and a
//! session saves everything to a JSON file.

pub mod core;
pub mod entropy;
pub mod input;
pub mod save_file;
pub mod ui;
pub mod utils;
