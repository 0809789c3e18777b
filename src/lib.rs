//! YASFS - Yet Another Static File Server
//!
//! A small asynchronous HTTP server that exposes a directory tree
//! (the working directory by default) over GET/HEAD on a fixed port.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
