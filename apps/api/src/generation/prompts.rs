//! Tone templates — the fixed registry of system prompts, one per tone.
//!
//! Built once at startup and shared read-only through `AppState`.
//! Each template carries a `{topic}` and a `{tweet_count}` slot.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

const TOPIC_SLOT: &str = "{topic}";
const COUNT_SLOT: &str = "{tweet_count}";

/// User-side instruction sent alongside the tone template.
/// Replace: {tweet_count}, {topic}
pub const USER_INSTRUCTION_TEMPLATE: &str = "Generate a {tweet_count}-tweet thread about: {topic}";

pub const PROFESSIONAL_TEMPLATE: &str = r#"You are a professional social media strategist. Create a professional and informative tweet thread.

Rules:
- Each tweet must be EXACTLY under 280 characters
- Create {tweet_count} tweets that flow naturally
- Use clear, professional language
- Focus on providing value and insights
- Add relevant hashtags only in the last tweet
- Return ONLY a valid JSON array of strings, nothing else

Topic: {topic}

Return format: ["Tweet 1 text here", "Tweet 2 text here", ...]"#;

pub const CASUAL_TEMPLATE: &str = r#"You are a friendly social media content creator. Create a casual and conversational tweet thread.

Rules:
- Each tweet must be EXACTLY under 280 characters
- Create {tweet_count} tweets that flow naturally
- Use friendly, conversational tone
- Include personal touches and relatability
- Add appropriate emojis sparingly (1-2 per tweet max)
- Return ONLY a valid JSON array of strings, nothing else

Topic: {topic}

Return format: ["Tweet 1 text here", "Tweet 2 text here", ...]"#;

pub const HUMOROUS_TEMPLATE: &str = r#"You are a witty social media personality. Create an entertaining and humorous tweet thread.

Rules:
- Each tweet must be EXACTLY under 280 characters
- Create {tweet_count} tweets that flow naturally
- Use humor, wit, and clever observations
- Keep it lighthearted but informative
- Add relevant emojis to enhance humor
- Return ONLY a valid JSON array of strings, nothing else

Topic: {topic}

Return format: ["Tweet 1 text here", "Tweet 2 text here", ...]"#;

pub const ENGAGING_TEMPLATE: &str = r#"You are a social media expert specializing in engagement. Create a highly engaging tweet thread.

Rules:
- Each tweet must be EXACTLY under 280 characters
- Create {tweet_count} tweets that flow naturally
- Use hooks, curiosity gaps, and strong conclusions
- Make it shareable and thought-provoking
- Include strategic emojis for emphasis
- Return ONLY a valid JSON array of strings, nothing else

Topic: {topic}

Return format: ["Tweet 1 text here", "Tweet 2 text here", ...]"#;

pub const EDUCATIONAL_TEMPLATE: &str = r#"You are an educational content creator. Create an informative and educational tweet thread.

Rules:
- Each tweet must be EXACTLY under 280 characters
- Create {tweet_count} tweets that flow naturally
- Break down complex topics into simple explanations
- Use clear examples and analogies
- End with key takeaways or action items
- Return ONLY a valid JSON array of strings, nothing else

Topic: {topic}

Return format: ["Tweet 1 text here", "Tweet 2 text here", ...]"#;

/// Style preset selecting which template governs generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Professional,
    Casual,
    Humorous,
    #[default]
    Engaging,
    Educational,
}

impl Tone {
    pub const ALL: [Tone; 5] = [
        Tone::Professional,
        Tone::Casual,
        Tone::Humorous,
        Tone::Engaging,
        Tone::Educational,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Humorous => "humorous",
            Tone::Engaging => "engaging",
            Tone::Educational => "educational",
        }
    }

    /// Case-folded match against the known labels. Absent or unknown
    /// labels silently resolve to `Engaging`.
    pub fn resolve(label: Option<&str>) -> Tone {
        let Some(label) = label else {
            return Tone::default();
        };
        let folded = label.to_lowercase();
        Tone::ALL
            .into_iter()
            .find(|t| t.as_str() == folded)
            .unwrap_or_default()
    }
}

/// A tone paired with its system prompt template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneTemplate {
    pub tone: Tone,
    pub template: &'static str,
}

impl ToneTemplate {
    /// Fills the count slot first so a topic containing a literal
    /// `{tweet_count}` is never substituted.
    pub fn render(&self, topic: &str, tweet_count: u32) -> String {
        fill_slots(self.template, topic, tweet_count)
    }
}

/// Builds the user-side instruction for a generation call.
pub fn user_instruction(topic: &str, tweet_count: u32) -> String {
    fill_slots(USER_INSTRUCTION_TEMPLATE, topic, tweet_count)
}

fn fill_slots(template: &str, topic: &str, tweet_count: u32) -> String {
    template
        .replace(COUNT_SLOT, &tweet_count.to_string())
        .replace(TOPIC_SLOT, topic)
}

/// Immutable tone → template table. No mutation path exists after `new()`.
#[derive(Debug)]
pub struct PromptRegistry {
    templates: HashMap<Tone, ToneTemplate>,
}

impl PromptRegistry {
    pub fn new() -> Self {
        let templates = Tone::ALL
            .into_iter()
            .map(|tone| {
                let template = match tone {
                    Tone::Professional => PROFESSIONAL_TEMPLATE,
                    Tone::Casual => CASUAL_TEMPLATE,
                    Tone::Humorous => HUMOROUS_TEMPLATE,
                    Tone::Engaging => ENGAGING_TEMPLATE,
                    Tone::Educational => EDUCATIONAL_TEMPLATE,
                };
                (tone, ToneTemplate { tone, template })
            })
            .collect();
        Self { templates }
    }

    /// Returns the template for `tone`, falling back to `engaging` for
    /// absent or unknown labels. Never fails.
    pub fn lookup(&self, tone: Option<&str>) -> &ToneTemplate {
        self.get(Tone::resolve(tone))
    }

    pub fn get(&self, tone: Tone) -> &ToneTemplate {
        // Every Tone is inserted by new(); the fallback arm is unreachable in practice.
        self.templates
            .get(&tone)
            .or_else(|| self.templates.get(&Tone::Engaging))
            .unwrap_or(&FALLBACK)
    }
}

impl Default for PromptRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static FALLBACK: ToneTemplate = ToneTemplate {
    tone: Tone::Engaging,
    template: ENGAGING_TEMPLATE,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tone_has_both_slots_and_rules() {
        let registry = PromptRegistry::new();
        for tone in Tone::ALL {
            let entry = registry.lookup(Some(tone.as_str()));
            assert_eq!(entry.tone, tone);
            assert!(entry.template.contains(TOPIC_SLOT), "{tone:?} missing topic slot");
            assert!(entry.template.contains(COUNT_SLOT), "{tone:?} missing count slot");
            assert!(entry.template.contains("280 characters"));
            assert!(entry.template.contains("JSON array of strings"));
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = PromptRegistry::new();
        assert_eq!(registry.lookup(Some("PROFESSIONAL")).tone, Tone::Professional);
        assert_eq!(registry.lookup(Some("Humorous")).tone, Tone::Humorous);
    }

    #[test]
    fn test_unknown_empty_and_missing_tones_fall_back_to_engaging() {
        let registry = PromptRegistry::new();
        for label in [Some("sarcastic"), Some(""), Some(" casual "), None] {
            let entry = registry.lookup(label);
            assert_eq!(entry.tone, Tone::Engaging, "label {label:?}");
            assert_eq!(entry.template, ENGAGING_TEMPLATE);
        }
    }

    #[test]
    fn test_render_fills_both_slots() {
        let registry = PromptRegistry::new();
        let rendered = registry
            .get(Tone::Educational)
            .render("Rust ownership for beginners", 4);
        assert!(rendered.contains("Create 4 tweets"));
        assert!(rendered.contains("Topic: Rust ownership for beginners"));
        assert!(!rendered.contains(TOPIC_SLOT));
        assert!(!rendered.contains(COUNT_SLOT));
    }

    #[test]
    fn test_render_leaves_slot_text_inside_topic_alone() {
        let rendered = ToneTemplate {
            tone: Tone::Casual,
            template: CASUAL_TEMPLATE,
        }
        .render("why {tweet_count} is a placeholder", 3);
        assert!(rendered.contains("Topic: why {tweet_count} is a placeholder"));
    }

    #[test]
    fn test_user_instruction() {
        assert_eq!(
            user_instruction("Exploring AI ethics", 3),
            "Generate a 3-tweet thread about: Exploring AI ethics"
        );
    }

    #[test]
    fn test_tone_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Tone::Humorous).unwrap(), "\"humorous\"");
    }
}
