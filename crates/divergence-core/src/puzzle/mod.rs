pub mod builder;
pub mod record;
pub mod sink;
