pub mod plugin;
pub mod config;
pub mod registry;
pub mod builtin_uuid;
pub mod tera;
pub mod utils;
