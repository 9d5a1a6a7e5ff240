pub mod client;

pub use client::{unavailable_reply, LlmClient, LlmConfig};
