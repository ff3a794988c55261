//! Library components of the pitwall command line tool.

pub mod logging;
pub mod pipeline;
