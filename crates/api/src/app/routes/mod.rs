pub mod analytics;
pub mod system;
