// LLM module: prompt template, completion client and wire schemas

pub mod client;
pub mod prompts;
pub mod schemas;
