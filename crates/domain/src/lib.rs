#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod change;
mod error;
mod name;
mod query;
mod service;
mod statistics;
mod workout;

pub use change::*;
pub use error::*;
pub use name::*;
pub use query::*;
pub use service::*;
pub use statistics::*;
pub use workout::*;

pub use strum::IntoEnumIterator;
