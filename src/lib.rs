pub mod archive;
pub mod asset;
pub mod catalog;
pub mod cleanup;
pub mod config;
pub mod download;
pub mod error;
pub mod forge;
pub mod http;
pub mod install;
pub mod pipeline;
pub mod platform;
pub mod runtime;
