//! Initials entry after a run

use crate::consts::MAX_INITIALS;

/// Keys the entry screen reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKey {
    Char(char),
    Backspace,
    Confirm,
    Skip,
}

/// Result of feeding a key to [`NameEntry`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Editing,
    Confirmed(String),
    Skipped,
}

/// Up to three upper-case letters
#[derive(Debug, Clone, Default)]
pub struct NameEntry {
    text: String,
}

impl NameEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn handle(&mut self, key: EntryKey) -> EntryOutcome {
        match key {
            EntryKey::Skip => return EntryOutcome::Skipped,
            EntryKey::Confirm if !self.text.is_empty() => {
                return EntryOutcome::Confirmed(self.text.clone());
            }
            EntryKey::Confirm => {}
            EntryKey::Backspace => {
                self.text.pop();
            }
            EntryKey::Char(c) => {
                if c.is_ascii_alphabetic() && self.text.len() < MAX_INITIALS {
                    self.text.push(c.to_ascii_uppercase());
                }
            }
        }
        EntryOutcome::Editing
    }
}
