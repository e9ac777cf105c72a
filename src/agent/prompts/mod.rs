// ABOUTME: System prompt for the mentor agent, loaded at compile time
// ABOUTME: Instructs the model on tone, when to call the analysis tool, and how to summarise
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

/// Mentor persona and tool-use instructions
pub const MENTOR_SYSTEM_PROMPT: &str = include_str!("mentor_system.md");

/// System prompt prepended to every run
#[must_use]
pub const fn get_mentor_system_prompt() -> &'static str {
    MENTOR_SYSTEM_PROMPT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_analysis_defaults() {
        let prompt = get_mentor_system_prompt();
        assert!(prompt.starts_with("You are Startup Mentor Agent."));
        assert!(prompt.contains("analysis_mode (default 'advanced')"));
    }
}
