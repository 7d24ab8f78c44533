// Report generation: prompt building, per-section provider calls with typed
// decode, and the concurrent assembler.
// All provider calls go through llm_client; no direct HTTP calls here.

pub mod assembler;
pub mod handlers;
pub mod prompts;
pub mod sections;
