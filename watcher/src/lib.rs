pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod history;
pub mod presence;
pub mod query;
pub mod refresh;
pub mod state;
pub mod supervisor;
pub mod time;
