//! Command implementations for pdu-cli

pub mod info;
pub mod load;
pub mod set;
pub mod state;

pub use info::info;
pub use load::load;
pub use set::set;
pub use state::{state, states};
