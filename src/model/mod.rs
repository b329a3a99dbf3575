pub mod agenda;
pub mod config;
pub mod time;
pub mod todo;
pub mod token;

pub use agenda::*;
pub use config::*;
pub use time::*;
pub use todo::*;
pub use token::*;
