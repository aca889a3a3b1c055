// Resume analysis: prompt, model-output parsing, persistence, and history views.
// All LLM calls go through llm_client.

pub mod handlers;
pub mod history;
pub mod parser;
pub mod prompts;
pub mod report;
pub mod service;
