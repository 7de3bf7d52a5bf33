//! Error types

mod net;
mod transport;

pub use net::*;
pub use transport::*;
