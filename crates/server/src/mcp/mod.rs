pub mod params;
pub mod tool_server;
