pub mod boundary;
pub mod sampling;
pub mod state;
pub mod walker;
