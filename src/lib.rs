pub mod classify;
pub mod config;
pub mod fetch;
pub mod output;
pub mod page;
pub mod pipeline;
