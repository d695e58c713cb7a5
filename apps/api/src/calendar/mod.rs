// Content calendar generation: prompt construction, model call, and
// best-effort recovery of the JSON calendar from free-form model text.
// All model calls go through llm_client.

pub mod generator;
pub mod handlers;
pub mod models;
pub mod parser;
pub mod prompts;
