pub mod blend;
pub mod canvas;
pub mod coverage;
pub mod filter;
pub mod paint;
pub mod pixmap;
