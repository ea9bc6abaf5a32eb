//! The three fixed stages and their prompt templates

use serde::{Deserialize, Serialize};
use std::fmt;

const ANALYZE_INSTRUCTION: &str = "You are an expert prompt engineer. Your task is to analyze user problems and identify:
1. The core problem or question
2. The domain/category (technical, creative, analytical, etc.)
3. The complexity level
4. Any missing information that might be needed
5. The likely intent or goal

Be concise and bullet-pointed in your response.";

const ENRICH_CONTEXT_INSTRUCTION: &str = "You are an expert at gathering context. Given a problem and its analysis, provide:
1. Relevant background information that would be helpful
2. Assumptions to clarify
3. Best practices in the relevant domain
4. Common pitfalls to avoid

Be practical and actionable.";

const GENERATE_OPTIMIZED_PROMPT_INSTRUCTION: &str = "You are an expert prompt engineer specializing in creating clear, effective prompts for AI systems like ChatGPT.

Your task is to transform a user's problem statement into a highly effective prompt that will:
1. Be specific and unambiguous
2. Include relevant context
3. Specify the desired output format
4. Provide examples when helpful
5. Include any constraints or requirements
6. Be actionable and ready to copy-paste

Create a prompt that's professional and comprehensive.";

/// Pipeline stages in execution order.
///
/// ```text
/// Analyze → EnrichContext → GenerateOptimizedPrompt
/// ```
///
/// Each stage depends on the outputs of every stage before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Decompose the problem into core ask, domain, complexity, gaps and intent.
    Analyze,
    /// Background, assumptions, best practices and pitfalls.
    EnrichContext,
    /// The final copy-paste-ready prompt.
    GenerateOptimizedPrompt,
}

impl Stage {
    pub const ALL: [Stage; 3] = [
        Stage::Analyze,
        Stage::EnrichContext,
        Stage::GenerateOptimizedPrompt,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Analyze => "analyze",
            Self::EnrichContext => "enrich_context",
            Self::GenerateOptimizedPrompt => "generate_optimized_prompt",
        }
    }

    /// Fixed system instruction for this stage
    #[must_use]
    pub const fn system_instruction(&self) -> &'static str {
        match self {
            Self::Analyze => ANALYZE_INSTRUCTION,
            Self::EnrichContext => ENRICH_CONTEXT_INSTRUCTION,
            Self::GenerateOptimizedPrompt => GENERATE_OPTIMIZED_PROMPT_INSTRUCTION,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn analyze_message(problem: &str) -> String {
    format!("Analyze this problem: {problem}")
}

pub(crate) fn enrich_context_message(problem: &str, analysis: &str) -> String {
    format!("Problem: {problem}\n\nAnalysis: {analysis}")
}

pub(crate) fn optimized_prompt_message(problem: &str, analysis: &str, context: &str) -> String {
    format!(
        "Original Problem: {problem}\n\nAnalysis: {analysis}\n\nContext: {context}\n\n\
         Please generate an optimized, production-ready prompt that I can copy and paste into ChatGPT."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert_eq!(
            Stage::ALL.map(|s| s.as_str()),
            ["analyze", "enrich_context", "generate_optimized_prompt"]
        );
    }

    #[test]
    fn test_instructions_are_distinct() {
        let [a, b, c] = Stage::ALL.map(|s| s.system_instruction());
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert!(a.starts_with("You are an expert prompt engineer."));
        assert!(b.contains("Common pitfalls to avoid"));
        assert!(c.contains("ready to copy-paste"));
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(analyze_message("p"), "Analyze this problem: p");
        assert_eq!(enrich_context_message("p", "a"), "Problem: p\n\nAnalysis: a");
        assert_eq!(
            optimized_prompt_message("p", "a", "c"),
            "Original Problem: p\n\nAnalysis: a\n\nContext: c\n\nPlease generate an optimized, production-ready prompt that I can copy and paste into ChatGPT."
        );
    }

    #[test]
    fn test_stage_serializes_snake_case() {
        let json = serde_json::to_string(&Stage::EnrichContext).unwrap();
        assert_eq!(json, "\"enrich_context\"");
    }
}
