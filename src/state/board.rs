//! The word-claim state machine.
//!
//! Every mutation is a pure function from the current catalog document
//! to the next one. Rejected actions return the document unchanged, so
//! the coordinator can skip the write and the broadcast entirely by
//! comparing snapshots.

use crate::types::{Claimant, Word, WordBoard, WordId};

/// A mutation of the word-catalog document.
///
/// `WordClick` is the only student-reachable action; the rest are the
/// CR's explicit management verbs. A CR's card click on a word held by
/// someone else arrives as a `WordClick` too and is ignored — the
/// client disables the card, but the server does not trust it.
#[derive(Debug, Clone)]
pub enum BoardAction {
    WordClick { word_id: WordId, actor: Claimant },
    Rename { word_id: WordId, new_text: String },
    Release { word_id: WordId },
    Assign { word_id: WordId, claimant: Claimant },
    AddWord { text: String, category: String },
    AddCategory { name: String },
    RenameCategory { old: String, new: String },
}

impl WordBoard {
    /// Apply one action, returning the next snapshot.
    pub fn apply(&self, action: &BoardAction) -> WordBoard {
        match action {
            BoardAction::WordClick { word_id, actor } => self.word_click(*word_id, actor),
            BoardAction::Rename { word_id, new_text } => self.rename_word(*word_id, new_text),
            BoardAction::Release { word_id } => self.release_word(*word_id),
            BoardAction::Assign { word_id, claimant } => self.assign_word(*word_id, claimant),
            BoardAction::AddWord { text, category } => self.add_word(text, category),
            BoardAction::AddCategory { name } => self.add_category(name),
            BoardAction::RenameCategory { old, new } => self.rename_category(old, new),
        }
    }

    /// A student clicking a word card.
    ///
    /// - own word: release it, claim nothing new
    /// - available word: claim it, releasing whatever the actor held
    ///   before in the same snapshot
    /// - someone else's word: no-op
    fn word_click(&self, word_id: WordId, actor: &Claimant) -> WordBoard {
        let Some(target) = self.word(word_id) else {
            return self.clone();
        };

        match &target.taken_by {
            Some(holder) if holder.id == actor.id => {
                // Toggle off.
                self.with_words(|w| {
                    if w.id == word_id {
                        w.taken_by = None;
                    }
                })
            }
            Some(_) => self.clone(),
            None => {
                // Claim, releasing the actor's previous word so the
                // swap is a single document write.
                self.with_words(|w| {
                    if w.id == word_id {
                        w.taken_by = Some(actor.clone());
                    } else if w.taken_by.as_ref().is_some_and(|c| c.id == actor.id) {
                        w.taken_by = None;
                    }
                })
            }
        }
    }

    fn rename_word(&self, word_id: WordId, new_text: &str) -> WordBoard {
        let new_text = new_text.trim();
        if new_text.is_empty() || self.word(word_id).is_none() {
            return self.clone();
        }
        self.with_words(|w| {
            if w.id == word_id {
                w.text = new_text.to_string();
            }
        })
    }

    fn release_word(&self, word_id: WordId) -> WordBoard {
        self.with_words(|w| {
            if w.id == word_id {
                w.taken_by = None;
            }
        })
    }

    /// Force-assign a word. Any other word held by the claimant is
    /// released in the same snapshot, so the one-word-per-student
    /// invariant survives forced assignment too.
    fn assign_word(&self, word_id: WordId, claimant: &Claimant) -> WordBoard {
        if claimant.id.trim().is_empty() || claimant.name.trim().is_empty() {
            return self.clone();
        }
        if self.word(word_id).is_none() {
            return self.clone();
        }
        self.with_words(|w| {
            if w.id == word_id {
                w.taken_by = Some(claimant.clone());
            } else if w.taken_by.as_ref().is_some_and(|c| c.id == claimant.id) {
                w.taken_by = None;
            }
        })
    }

    fn add_word(&self, text: &str, category: &str) -> WordBoard {
        let text = text.trim();
        if text.is_empty() || !self.categories.iter().any(|c| c == category) {
            return self.clone();
        }
        let mut next = self.clone();
        next.words.push(Word {
            id: self.next_word_id(),
            text: text.to_string(),
            category: category.to_string(),
            taken_by: None,
        });
        next
    }

    fn add_category(&self, name: &str) -> WordBoard {
        let name = name.trim();
        if name.is_empty() || self.categories.iter().any(|c| c == name) {
            return self.clone();
        }
        let mut next = self.clone();
        next.categories.push(name.to_string());
        next
    }

    /// Relabel a category and every word carrying it in one snapshot,
    /// so no word is ever left referencing a missing category.
    fn rename_category(&self, old: &str, new: &str) -> WordBoard {
        let new = new.trim();
        if new.is_empty() || new == old || !self.categories.iter().any(|c| c == old) {
            return self.clone();
        }
        let mut next = self.clone();
        for c in &mut next.categories {
            if c == old {
                *c = new.to_string();
            }
        }
        for w in &mut next.words {
            if w.category == old {
                w.category = new.to_string();
            }
        }
        next
    }

    fn next_word_id(&self) -> WordId {
        self.words.iter().map(|w| w.id).max().unwrap_or(0) + 1
    }

    fn with_words(&self, mut f: impl FnMut(&mut Word)) -> WordBoard {
        let mut next = self.clone();
        for w in &mut next.words {
            f(w);
        }
        next
    }
}
