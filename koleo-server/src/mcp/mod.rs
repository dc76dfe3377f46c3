//! MCP (Model Context Protocol) stdio server.

mod server;
mod tools;
mod types;

pub use server::serve;
