//! redpen MCP server binary: argument parsing, logging, and the
//! `request_human_review` tool handler.

pub mod cli;
pub mod logging;
pub mod server;
