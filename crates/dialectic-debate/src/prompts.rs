//! Prompt templates for debaters and the judge
//!
//! Every function here is pure string construction.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::transcript::TranscriptEntry;

/// Rubric used when the caller supplies none
pub const DEFAULT_JUDGE_CRITERIA: &str = "Please evaluate this debate carefully and provide:

1. Numerical scores (1-10) for each criterion:
   - Evidence Quality: Rate the quality and reliability of evidence presented
   - Logical Consistency: Evaluate the coherence and validity of arguments
   - Counterargument Handling: Assess how well each side addressed opposing points
   - Clarity: Rate the clarity and precision of claims made

2. A brief explanation for each score

3. A final verdict determining:
   - Which side presented stronger arguments
   - Key deciding factors
   - Areas where each side excelled or could improve

Format your response as:
SCORES:
Evidence Quality: [score]/10
Logical Consistency: [score]/10
Counterargument Handling: [score]/10
Clarity: [score]/10

EXPLANATIONS:
[Provide brief explanations for each score]

VERDICT: [name of winner agent and their stance]
[Your final judgment and analysis]";

/// Position a debater argues in round one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    Supporting,
    Opposing,
}

impl Stance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stance::Supporting => "supporting",
            Stance::Opposing => "opposing",
        }
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opening prompt for a debater
pub fn stance_prompt(topic: &str, stance: Stance) -> String {
    format!(
        "You are participating in a formal debate about: {topic}
Your stance: {stance}

Guidelines:
1. Make clear, factual claims that can be verified
2. Support arguments with specific evidence
3. Address counterarguments directly
4. Maintain logical consistency
5. Focus on the strongest available arguments

Present your argument in a structured format:
- Main claim
- Supporting evidence (cite specific sources where possible)
- Anticipated counterarguments and your responses
- Conclusion reinforcing your main points"
    )
}

/// Rebuttal prompt built from the opponent's previous argument
pub fn rebuttal_prompt(previous_argument: &str) -> String {
    format!(
        "Respond to the following argument:
{previous_argument}

Guidelines:
1. Address the strongest points directly
2. Identify logical flaws or missing evidence
3. Provide counter-evidence where applicable
4. Present alternative interpretations of evidence
5. Maintain focus on the core claims
6. Strengthen your original position while engaging with opponent's points

Structure your rebuttal clearly:
- Direct responses to key points
- New evidence supporting your position
- Logical challenges to opponent's arguments
- Reinforcement of your main thesis"
    )
}

/// Prompt asking the judge to score the whole exchange
pub fn judgment_prompt(topic: &str, criteria: &str, debate_summary: &str) -> String {
    format!(
        "You are serving as an impartial judge for the following debate on: {topic}

Please evaluate carefully using these criteria:
{criteria}

Debate history:
{debate_summary}

Provide your evaluation following the format specified in the criteria."
    )
}

/// Render the history as `Round n - Agent X:` blocks separated by blank lines
pub fn debate_summary(history: &[TranscriptEntry]) -> String {
    history
        .iter()
        .map(|entry| {
            format!(
                "Round {} - Agent {}:\n{}",
                entry.round, entry.agent, entry.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
