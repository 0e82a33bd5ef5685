//! Prompt suggestions shown on the landing view.

/// A suggested prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptCard {
    pub title: &'static str,
    /// Single-column glyph drawn next to the title.
    pub glyph: &'static str,
}

/// The suggestion set. Static: refreshing never changes it.
pub const PROMPT_CARDS: [PromptCard; 4] = [
    PromptCard {
        title: "Write a to-do list for a personal project or task",
        glyph: "☺",
    },
    PromptCard {
        title: "Generate an email to reply to a job offer",
        glyph: "✉",
    },
    PromptCard {
        title: "Summarise this article or text for me in one paragraph",
        glyph: "?",
    },
    PromptCard {
        title: "How does AI work in a technical capacity",
        glyph: "⚙",
    },
];

pub const HEADLINE: &str = "What would you like to Study?";

pub const SUBTITLE: &str = "Use one of the most common prompts below or use your own to begin";

pub fn greeting(user_name: &str) -> String {
    format!("Hi there, {user_name}")
}

/// Card by zero-based index.
pub fn card(index: usize) -> Option<&'static PromptCard> {
    PROMPT_CARDS.get(index)
}
