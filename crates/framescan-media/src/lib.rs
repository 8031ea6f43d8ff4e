pub mod decoder;
pub mod error;
pub mod jobs;
pub mod reporter;
pub mod sampler;
pub mod session;
pub mod source;
pub mod thumbnail;
