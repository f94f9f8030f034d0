pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod reference;
pub mod server;
