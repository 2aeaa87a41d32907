pub mod config;
pub mod value;

pub use config::*;
pub use value::*;
