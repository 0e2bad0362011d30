pub mod config;
pub mod error;
pub mod logging;

pub mod content;
pub mod copy;
pub mod http;
pub mod media;
pub mod output;
pub mod resource;
pub mod save;
pub mod size;
