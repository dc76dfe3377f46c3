//! Koleo MCP server.
//!
//! Exposes the Polish railway platform Koleo (timetables, connection
//! search, seat availability) as MCP tools over stdio.

pub mod config;
pub mod datetime;
pub mod format;
pub mod koleo;
pub mod mcp;
pub mod search;
pub mod slug;
pub mod tools;
