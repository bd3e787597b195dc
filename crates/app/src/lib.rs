#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod form;
pub mod log;
pub mod view;

mod service;
mod settings;

pub use form::{FormError, WorkoutForm};
pub use service::Service;
pub use settings::*;
pub use view::View;
