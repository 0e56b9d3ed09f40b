pub mod asset;
pub mod commands;
pub mod http;
pub mod platform;
pub mod preferences;
pub mod provider;
pub mod release;
pub mod runtime;
