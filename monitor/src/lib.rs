pub mod config;
pub mod error;
pub mod monitor;
pub mod notify;
pub mod quote;
pub mod spread;
pub mod time;
