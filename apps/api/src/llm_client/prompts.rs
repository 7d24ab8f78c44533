// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments appended to every section prompt.

/// Closing instruction for every section prompt. The provider runs in JSON-object
/// mode, so list sections ask for a wrapper object too.
pub const JSON_OBJECT_ONLY: &str = "只返回JSON，不要其他内容";
