//! Domain models shared across the calculator.

pub mod instrument;
pub mod quote;

pub use instrument::{is_gold, pip_value, GOLD_CONTRACT_SIZE};
pub use quote::Quote;
