//! Journal entries, guided reflections and their prompts

use crate::domain::tags::{self, CODEX_LINKED};
use chrono::NaiveDateTime;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mood {
    Great,
    Good,
    Okay,
    Low,
    Frustrated,
    Thoughtful,
    Motivated,
    Anxious,
    Grateful,
}

impl Mood {
    pub const ALL: [Mood; 9] = [
        Mood::Great,
        Mood::Good,
        Mood::Okay,
        Mood::Low,
        Mood::Frustrated,
        Mood::Thoughtful,
        Mood::Motivated,
        Mood::Anxious,
        Mood::Grateful,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Mood::Great => "Great",
            Mood::Good => "Good",
            Mood::Okay => "Okay",
            Mood::Low => "Low",
            Mood::Frustrated => "Frustrated",
            Mood::Thoughtful => "Thoughtful",
            Mood::Motivated => "Motivated",
            Mood::Anxious => "Anxious",
            Mood::Grateful => "Grateful",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Mood::Great => "😊",
            Mood::Good => "🙂",
            Mood::Okay => "😐",
            Mood::Low => "😔",
            Mood::Frustrated => "😤",
            Mood::Thoughtful => "🤔",
            Mood::Motivated => "💪",
            Mood::Anxious => "😰",
            Mood::Grateful => "🙏",
        }
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .iter()
            .find(|m| m.label().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Unknown mood: {}", s))
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Theme a reflection prompt is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PromptTheme {
    #[default]
    Stoic,
    Practical,
    Craft,
    Growth,
}

impl PromptTheme {
    pub const ALL: [PromptTheme; 4] = [
        PromptTheme::Stoic,
        PromptTheme::Practical,
        PromptTheme::Craft,
        PromptTheme::Growth,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            PromptTheme::Stoic => "stoic",
            PromptTheme::Practical => "practical",
            PromptTheme::Craft => "craft",
            PromptTheme::Growth => "growth",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PromptTheme::Stoic => "Stoic",
            PromptTheme::Practical => "Practical",
            PromptTheme::Craft => "Craft",
            PromptTheme::Growth => "Growth",
        }
    }

    pub fn prompts(&self) -> &'static [&'static str] {
        match self {
            PromptTheme::Stoic => &[
                "What is within your control today, and what isn't?",
                "How would your ideal self handle today's challenges?",
                "What would you tell a friend facing your current situation?",
                "What obstacle can you view as an opportunity?",
                "What are you grateful for that you usually take for granted?",
            ],
            PromptTheme::Practical => &[
                "What's the ONE thing that would make today a success?",
                "What task have you been avoiding, and why?",
                "What did you learn from your last mistake?",
                "What skill do you want to improve this week?",
            ],
            PromptTheme::Craft => &[
                "What does mastery look like in your current project?",
                "What technique could you practice to improve?",
                "Who do you admire in your craft, and why?",
                "What would you build if resources weren't a constraint?",
            ],
            PromptTheme::Growth => &[
                "What belief have you changed your mind about recently?",
                "How are you different from a year ago?",
                "What would your future self thank you for doing today?",
                "Where are you playing it too safe?",
            ],
        }
    }

    pub fn random_prompt<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        self.prompts()
            .choose(rng)
            .copied()
            .unwrap_or("What is on your mind today?")
    }
}

impl FromStr for PromptTheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PromptTheme::ALL
            .iter()
            .find(|t| t.key() == s.trim().to_lowercase())
            .copied()
            .ok_or_else(|| {
                format!(
                    "Unknown theme: {}. Valid themes: stoic, practical, craft, growth",
                    s
                )
            })
    }
}

fn journal_type() -> String {
    "journal".to_string()
}

/// Free-form journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
    /// Stored as the mood label; unknown labels from older files are kept as-is
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "type", default = "journal_type")]
    pub entry_type: String,
    pub created_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

impl JournalEntry {
    pub fn mood(&self) -> Option<Mood> {
        self.mood.as_deref().and_then(|m| m.parse().ok())
    }

    pub fn mood_icon(&self) -> &'static str {
        self.mood().map(|m| m.icon()).unwrap_or("📝")
    }

    /// Title, or the first 40 characters of the content
    pub fn display_title(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => {
                let preview: String = self.content.chars().take(40).collect();
                format!("{}...", preview)
            }
        }
    }

    pub fn is_linked(&self) -> bool {
        self.tags.iter().any(|t| t == CODEX_LINKED)
    }
}

/// Answer to a guided prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reflection {
    pub id: String,
    pub prompt: String,
    pub response: String,
    #[serde(default = "general_category")]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

fn general_category() -> String {
    "general".to_string()
}

impl Reflection {
    pub fn category_title(&self) -> String {
        let mut chars = self.category.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn is_linked(&self) -> bool {
        self.tags.iter().any(|t| t == CODEX_LINKED)
    }
}

/// Tags for a journal entry: inline and manual tags plus the link marker
pub fn journal_tags(content: &str, manual: &str, link_to_codex: bool) -> Vec<String> {
    let mut all = tags::merge_tags(content, manual);
    if link_to_codex && !all.iter().any(|t| t == CODEX_LINKED) {
        all.push(CODEX_LINKED.to_string());
    }
    all
}

/// Tags for a reflection: fixed marker, theme, and optionally the link marker
pub fn reflection_tags(theme: PromptTheme, link_to_codex: bool) -> Vec<String> {
    let mut all = vec!["reflection".to_string(), theme.key().to_string()];
    if link_to_codex {
        all.push(CODEX_LINKED.to_string());
    }
    all
}

/// Which collections the history view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryKind {
    Journal,
    Reflections,
    #[default]
    All,
}

impl HistoryKind {
    pub fn includes_journal(&self) -> bool {
        matches!(self, HistoryKind::Journal | HistoryKind::All)
    }

    pub fn includes_reflections(&self) -> bool {
        matches!(self, HistoryKind::Reflections | HistoryKind::All)
    }
}

impl FromStr for HistoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "journal" => Ok(HistoryKind::Journal),
            "reflections" => Ok(HistoryKind::Reflections),
            "all" | "" => Ok(HistoryKind::All),
            _ => Err(format!("Unknown history type: {}", s)),
        }
    }
}
