pub mod app;
pub mod bootstrap;
pub mod config;
pub mod flows;
pub mod remote;
pub mod shared;
pub mod ui;
