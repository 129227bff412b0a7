pub mod app;
pub mod apps;
pub mod command;
pub mod graph;
pub mod log;
pub mod resource;
pub mod runtime;
pub mod theme;
pub mod widgets;

pub use runtime::run;
