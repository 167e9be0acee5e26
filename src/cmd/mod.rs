pub mod cells;
pub mod grid;
pub mod input;
pub mod output;
pub mod parse;
#[cfg(feature = "pdf")]
pub mod preview;
