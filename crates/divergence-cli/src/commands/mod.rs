pub mod analyze;
pub mod default_config;
pub mod generate;
