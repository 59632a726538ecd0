//! HTTP API: router, query handlers, and the dashboard assembler.

pub mod app;
