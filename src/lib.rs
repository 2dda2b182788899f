pub mod cli;
pub mod config;
pub mod core;
pub mod exit;
pub mod generate;
pub mod index;
pub mod render;
pub mod resolve;
pub mod ui;
pub mod verify;
