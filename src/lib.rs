pub mod api;
pub mod config;
pub mod console;
pub mod error;
pub mod runner;
pub mod session;
pub mod verify_code;
