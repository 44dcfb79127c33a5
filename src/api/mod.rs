pub mod anthropic;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod sse;
pub mod vertex;
