pub mod color;
pub mod config;
pub mod error;
pub mod fade;
pub mod job;
pub mod retrieval;
pub mod sample;
pub mod scene;
pub mod seek;
pub mod source;
