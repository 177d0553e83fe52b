mod config;
mod error;
mod events;
mod responder;
mod session;

pub use config::*;
pub use error::*;
pub use events::*;
pub use responder::*;
pub use session::*;
