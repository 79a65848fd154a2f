//! Prompt construction for idea enhancement.
//!
//! The prompt is a pure function of the idea text and the validity-gate
//! setting, so identical inputs always produce identical prompts.

/// System instruction sent alongside every enhancement prompt.
pub const SYSTEM_PROMPT: &str = "You are an expert product strategist and UX designer. \
You turn rough website and app ideas into clear, practical plans. \
You always answer with a single JSON object and nothing else.";

const ROLE_AND_INPUT: &str = "A user has submitted text describing a website or app idea.\n\nUser's input: ";

const VALIDITY_INSTRUCTIONS: &str = r#"First, decide whether the input is a coherent, understandable website or app idea.

Treat the input as NOT valid if it is:
- random characters, gibberish, or keyboard mashing (e.g. "asdfgh", "dfkkdffeeghryt")
- unrelated to websites or apps (e.g. a single random word with no context)
- too vague to interpret as any kind of idea (e.g. "hello" or "test")
- not written in any recognisable language or format

If the input is NOT valid, respond with exactly this JSON:
{
  "isValid": false,
  "errorMessage": "I couldn't understand your idea. Please describe what kind of website or app you'd like to build. For example: 'A recipe sharing platform' or 'An online store for handmade crafts'."
}

If the input IS a valid idea (even a rough or brief one), respond with JSON in this shape:
"#;

const PLAIN_INSTRUCTIONS: &str = "Expand the idea into a structured plan. Respond with JSON in this shape:\n";

const SCHEMA: &str = r#"{
  "isValid": true,
  "problemStatement": "A clear 1-2 sentence description of the problem this website solves",
  "targetAudience": "Who specifically will use this website and why",
  "coreFeatures": [
    "Feature 1: Brief description",
    "Feature 2: Brief description",
    "Feature 3: Brief description",
    "Feature 4: Brief description",
    "Feature 5: Brief description"
  ],
  "technicalSuggestions": [
    "Tech suggestion 1",
    "Tech suggestion 2",
    "Tech suggestion 3"
  ],
  "nextSteps": [
    "Step 1: Actionable first step",
    "Step 2: Second actionable step",
    "Step 3: Third actionable step",
    "Step 4: Fourth actionable step",
    "Step 5: Fifth actionable step"
  ]
}
"#;

const OUTPUT_RULES: &str = "\nRespond ONLY with valid JSON. Do not use markdown and do not wrap the JSON in code blocks.\n\
Make every feature and step practical, specific, and actionable. Be creative but realistic.";

/// Builds the user prompt for enhancing `idea`.
///
/// The idea is embedded as a JSON string literal so quotes and newlines in
/// user input cannot break out of the quoted section.
pub fn build_enhancement_prompt(idea: &str, validity_gate: bool) -> String {
    let quoted_idea = serde_json::to_string(idea).unwrap_or_else(|_| format!("\"{}\"", idea));

    let mut prompt = String::with_capacity(
        ROLE_AND_INPUT.len() + quoted_idea.len() + VALIDITY_INSTRUCTIONS.len() + SCHEMA.len() + 256,
    );
    prompt.push_str(ROLE_AND_INPUT);
    prompt.push_str(&quoted_idea);
    prompt.push_str("\n\n");

    if validity_gate {
        prompt.push_str(VALIDITY_INSTRUCTIONS);
    } else {
        prompt.push_str(PLAIN_INSTRUCTIONS);
    }

    prompt.push_str(SCHEMA);
    prompt.push_str(OUTPUT_RULES);
    prompt
}
