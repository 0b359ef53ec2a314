pub mod analyzer;
mod contingency;
mod proportion;
