//! MCP stdio server exposing the board tools to an agent host.

pub mod logging;
pub mod mcp;

pub use mcp::tool_server::BoardToolServer;
