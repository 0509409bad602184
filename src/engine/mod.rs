//! Calculation engine: pure sizing math plus the interactive session that
//! drives it.

pub mod session;
pub mod sizing;

pub use session::Session;
