pub mod api;
pub mod config;
pub mod error;
pub mod gui;
pub mod models;
pub mod state;
pub mod store;
