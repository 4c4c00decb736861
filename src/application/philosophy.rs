//! Journal and reflection use cases

use crate::domain::document::{self, CodexDocument};
use crate::domain::philosophy::{
    journal_tags, reflection_tags, HistoryKind, JournalEntry, Mood, PromptTheme, Reflection,
};
use crate::domain::tags::CODEX_LINKED;
use crate::error::{CodexError, Result};
use crate::infrastructure::JsonStore;
use chrono::NaiveDateTime;
use std::collections::BTreeSet;
use tracing::info;

/// Entries of each kind shown in the history view
pub const HISTORY_LIMIT: usize = 15;

/// Form input for writing or editing a journal entry
#[derive(Debug, Clone, Default)]
pub struct JournalInput {
    pub title: String,
    pub content: String,
    pub mood: Option<Mood>,
    /// Comma-separated, merged with inline #tags
    pub tags: String,
    pub link_to_codex: bool,
    /// Leave an edited entry's mood as stored and ignore `mood`
    pub keep_mood: bool,
}

impl JournalInput {
    fn validate(&self) -> Result<()> {
        if self.content.trim().is_empty() {
            return Err(CodexError::InvalidInput(
                "Write something before saving".to_string(),
            ));
        }
        Ok(())
    }

    fn title(&self) -> Option<String> {
        let t = self.title.trim();
        (!t.is_empty()).then(|| t.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    pub kind: HistoryKind,
    /// Only entries carrying this tag
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct History {
    pub journal: Vec<JournalEntry>,
    pub reflections: Vec<Reflection>,
    /// Every tag in use, for the filter dropdown
    pub all_tags: Vec<String>,
}

/// A journal entry or reflection the user flagged for review
#[derive(Debug, Clone, PartialEq)]
pub enum LinkedEntry {
    Journal {
        title: String,
        content: String,
        mood: Option<String>,
        date: NaiveDateTime,
    },
    Reflection {
        prompt: String,
        content: String,
        date: NaiveDateTime,
    },
}

impl LinkedEntry {
    pub fn date(&self) -> NaiveDateTime {
        match self {
            LinkedEntry::Journal { date, .. } | LinkedEntry::Reflection { date, .. } => *date,
        }
    }
}

pub struct PhilosophyService {
    store: JsonStore,
}

impl PhilosophyService {
    pub fn new(store: JsonStore) -> Self {
        PhilosophyService { store }
    }

    pub fn add_journal_entry(&self, input: &JournalInput) -> Result<JournalEntry> {
        input.validate()?;

        let entry = JournalEntry {
            id: document::short_id(),
            title: input.title(),
            content: input.content.clone(),
            mood: input.mood.map(|m| m.label().to_string()),
            tags: journal_tags(&input.content, &input.tags, input.link_to_codex),
            entry_type: "journal".to_string(),
            created_at: document::now(),
            updated_at: None,
        };
        self.store.update(|doc| {
            doc.journal.push(entry.clone());
            Ok(())
        })?;
        info!(id = %entry.id, tags = entry.tags.len(), "journal entry saved");
        Ok(entry)
    }

    pub fn journal_entry(&self, id: &str) -> Result<JournalEntry> {
        let doc = self.store.load()?;
        doc.journal
            .into_iter()
            .find(|e| e.id == id)
            .ok_or_else(|| CodexError::NotFound(format!("journal entry {}", id)))
    }

    /// Replace an entry's text, title and mood; tags are recomputed
    pub fn update_journal_entry(&self, id: &str, input: &JournalInput) -> Result<JournalEntry> {
        input.validate()?;

        let updated = self.store.update(|doc| {
            let entry = doc
                .journal
                .iter_mut()
                .find(|e| e.id == id)
                .ok_or_else(|| CodexError::NotFound(format!("journal entry {}", id)))?;
            entry.title = input.title();
            entry.content = input.content.clone();
            if !input.keep_mood {
                entry.mood = input.mood.map(|m| m.label().to_string());
            }
            entry.tags = journal_tags(&input.content, &input.tags, input.link_to_codex);
            entry.updated_at = Some(document::now());
            Ok(entry.clone())
        })?;
        info!(id, "journal entry updated");
        Ok(updated)
    }

    pub fn delete_journal_entry(&self, id: &str) -> Result<()> {
        self.store.update(|doc| remove_by_id(&mut doc.journal, id, |e| &e.id, "journal entry"))?;
        info!(id, "journal entry deleted");
        Ok(())
    }

    pub fn add_reflection(
        &self,
        prompt: &str,
        response: &str,
        theme: PromptTheme,
        link_to_codex: bool,
    ) -> Result<Reflection> {
        if response.trim().is_empty() {
            return Err(CodexError::InvalidInput(
                "Write a response before saving".to_string(),
            ));
        }

        let reflection = Reflection {
            id: document::short_id(),
            prompt: prompt.trim().to_string(),
            response: response.to_string(),
            category: theme.key().to_string(),
            tags: reflection_tags(theme, link_to_codex),
            created_at: document::now(),
            updated_at: None,
        };
        self.store.update(|doc| {
            doc.reflections.push(reflection.clone());
            Ok(())
        })?;
        info!(id = %reflection.id, theme = theme.key(), "reflection saved");
        Ok(reflection)
    }

    pub fn delete_reflection(&self, id: &str) -> Result<()> {
        self.store
            .update(|doc| remove_by_id(&mut doc.reflections, id, |r| &r.id, "reflection"))?;
        info!(id, "reflection deleted");
        Ok(())
    }

    pub fn history(&self, query: &HistoryQuery, limit: usize) -> Result<History> {
        let doc = self.store.load()?;
        Ok(history(&doc, query, limit))
    }

    /// Everything tagged `codex-linked`, newest first
    pub fn linked_entries(&self) -> Result<Vec<LinkedEntry>> {
        let doc = self.store.load()?;

        let mut linked: Vec<LinkedEntry> = doc
            .journal
            .iter()
            .filter(|e| e.is_linked())
            .map(|e| LinkedEntry::Journal {
                title: e.title.clone().unwrap_or_else(|| "Untitled".to_string()),
                content: e.content.clone(),
                mood: e.mood.clone(),
                date: e.created_at,
            })
            .chain(
                doc.reflections
                    .iter()
                    .filter(|r| r.is_linked())
                    .map(|r| LinkedEntry::Reflection {
                        prompt: r.prompt.clone(),
                        content: r.response.clone(),
                        date: r.created_at,
                    }),
            )
            .collect();
        linked.sort_by_key(|e| std::cmp::Reverse(e.date()));
        Ok(linked)
    }
}

fn remove_by_id<T>(
    items: &mut Vec<T>,
    id: &str,
    id_of: impl Fn(&T) -> &String,
    what: &str,
) -> Result<()> {
    let before = items.len();
    items.retain(|item| id_of(item) != id);
    if items.len() == before {
        return Err(CodexError::NotFound(format!("{} {}", what, id)));
    }
    Ok(())
}

fn history(doc: &CodexDocument, query: &HistoryQuery, limit: usize) -> History {
    let has_tag = |tags: &[String]| {
        query
            .tag
            .as_deref()
            .map_or(true, |wanted| tags.iter().any(|t| t == wanted))
    };

    let mut journal: Vec<JournalEntry> = if query.kind.includes_journal() {
        doc.journal
            .iter()
            .filter(|e| has_tag(&e.tags))
            .cloned()
            .collect()
    } else {
        Vec::new()
    };
    journal.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    journal.truncate(limit);

    let mut reflections: Vec<Reflection> = if query.kind.includes_reflections() {
        doc.reflections
            .iter()
            .filter(|r| has_tag(&r.tags))
            .cloned()
            .collect()
    } else {
        Vec::new()
    };
    reflections.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    reflections.truncate(limit);

    let all_tags: BTreeSet<String> = doc
        .journal
        .iter()
        .flat_map(|e| e.tags.iter())
        .chain(doc.reflections.iter().flat_map(|r| r.tags.iter()))
        .filter(|t| t.as_str() != CODEX_LINKED)
        .cloned()
        .collect();

    History {
        journal,
        reflections,
        all_tags: all_tags.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn service() -> (TempDir, PhilosophyService) {
        let temp = TempDir::new().unwrap();
        let store = JsonStore::new(temp.path().join("codex_data.json"));
        (temp, PhilosophyService::new(store))
    }

    fn input(content: &str, tags: &str, link: bool) -> JournalInput {
        JournalInput {
            title: String::new(),
            content: content.to_string(),
            mood: Some(Mood::Good),
            tags: tags.to_string(),
            link_to_codex: link,
            keep_mood: false,
        }
    }

    #[test]
    fn test_add_journal_entry() {
        let (_temp, svc) = service();
        let entry = svc
            .add_journal_entry(&input("Glued up the #bench legs", "shop", true))
            .unwrap();

        assert_eq!(entry.tags, vec!["bench", "shop", CODEX_LINKED]);
        assert_eq!(entry.mood.as_deref(), Some("Good"));
        assert!(entry.title.is_none());
        assert_eq!(svc.journal_entry(&entry.id).unwrap(), entry);
    }

    #[test]
    fn test_blank_entry_rejected() {
        let (_temp, svc) = service();
        assert!(matches!(
            svc.add_journal_entry(&input("   \n", "", false)),
            Err(CodexError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_update_journal_entry() {
        let (_temp, svc) = service();
        let entry = svc.add_journal_entry(&input("draft #idea", "", false)).unwrap();

        let mut edit = input("final #plan", "", false);
        edit.title = "Plans".to_string();
        let updated = svc.update_journal_entry(&entry.id, &edit).unwrap();

        assert_eq!(updated.title.as_deref(), Some("Plans"));
        assert_eq!(updated.tags, vec!["plan"]);
        assert!(updated.updated_at.is_some());
        assert_eq!(updated.created_at, entry.created_at);
        assert!(svc.update_journal_entry("missing", &edit).is_err());
    }

    #[test]
    fn test_update_can_keep_stored_mood() {
        let (_temp, svc) = service();
        let entry = svc.add_journal_entry(&input("rainy day", "", false)).unwrap();
        svc.store
            .update(|doc| {
                doc.journal[0].mood = Some("Melancholy".to_string());
                Ok(())
            })
            .unwrap();

        let mut edit = input("rainy day, then sun", "", false);
        edit.mood = None;
        edit.keep_mood = true;
        let updated = svc.update_journal_entry(&entry.id, &edit).unwrap();
        assert_eq!(updated.mood.as_deref(), Some("Melancholy"));

        edit.keep_mood = false;
        let cleared = svc.update_journal_entry(&entry.id, &edit).unwrap();
        assert!(cleared.mood.is_none());
    }

    #[test]
    fn test_delete_entries() {
        let (_temp, svc) = service();
        let entry = svc.add_journal_entry(&input("text", "", false)).unwrap();
        let refl = svc
            .add_reflection("Prompt?", "Answer", PromptTheme::Stoic, false)
            .unwrap();

        svc.delete_journal_entry(&entry.id).unwrap();
        svc.delete_reflection(&refl.id).unwrap();
        assert!(matches!(
            svc.delete_reflection(&refl.id),
            Err(CodexError::NotFound(_))
        ));

        let h = svc.history(&HistoryQuery::default(), HISTORY_LIMIT).unwrap();
        assert!(h.journal.is_empty());
        assert!(h.reflections.is_empty());
    }

    #[test]
    fn test_add_reflection() {
        let (_temp, svc) = service();
        let r = svc
            .add_reflection(
                "What is within your control today?",
                "My effort",
                PromptTheme::Stoic,
                true,
            )
            .unwrap();
        assert_eq!(r.category, "stoic");
        assert_eq!(r.tags, vec!["reflection", "stoic", CODEX_LINKED]);
        assert!(svc
            .add_reflection("p", " ", PromptTheme::Growth, false)
            .is_err());
    }

    #[test]
    fn test_history_filters() {
        let (_temp, svc) = service();
        svc.add_journal_entry(&input("one #work", "", true)).unwrap();
        svc.add_journal_entry(&input("two #home", "", false)).unwrap();
        svc.add_reflection("p", "r", PromptTheme::Craft, false)
            .unwrap();

        let all = svc.history(&HistoryQuery::default(), HISTORY_LIMIT).unwrap();
        assert_eq!(all.journal.len(), 2);
        assert_eq!(all.reflections.len(), 1);
        assert_eq!(all.all_tags, vec!["craft", "home", "reflection", "work"]);

        let work = svc
            .history(
                &HistoryQuery {
                    kind: HistoryKind::All,
                    tag: Some("work".to_string()),
                },
                HISTORY_LIMIT,
            )
            .unwrap();
        assert_eq!(work.journal.len(), 1);
        assert!(work.reflections.is_empty());

        let only_reflections = svc
            .history(
                &HistoryQuery {
                    kind: HistoryKind::Reflections,
                    tag: None,
                },
                HISTORY_LIMIT,
            )
            .unwrap();
        assert!(only_reflections.journal.is_empty());
        assert_eq!(only_reflections.reflections.len(), 1);
    }

    #[test]
    fn test_linked_entries() {
        let (_temp, svc) = service();
        svc.add_journal_entry(&input("linked", "", true)).unwrap();
        svc.add_journal_entry(&input("private", "", false)).unwrap();
        svc.add_reflection("p", "linked answer", PromptTheme::Growth, true)
            .unwrap();

        let linked = svc.linked_entries().unwrap();
        assert_eq!(linked.len(), 2);
        assert!(linked.iter().any(|e| matches!(
            e,
            LinkedEntry::Journal { title, .. } if title == "Untitled"
        )));
        assert!(linked.windows(2).all(|w| w[0].date() >= w[1].date()));
    }
}
