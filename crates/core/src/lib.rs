//! MudProg Core - Fundamental types shared by the prog runtime and its hosts

mod error;
mod types;

pub use error::*;
pub use types::*;
