//! Excel-to-SQL mapper shell

mod app;
mod msg;
mod state;
mod view;

pub use app::{InitParams, MapperApp};
