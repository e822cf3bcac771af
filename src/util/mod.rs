/// Basic JSON output functionality
pub mod json_io;
