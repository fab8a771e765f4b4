use serde::{Deserialize, Serialize};

/// Word ids count up from 1 for the seeded catalog; CR-added words
/// continue from the current maximum.
pub type WordId = i64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Cr,
}

/// Client-held identity record. Nothing about it is server-verified
/// beyond the roster check at login; it is a label, not a credential.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub name: String,
    pub roll_no: String,
    pub role: Role,
}

impl Session {
    pub fn claimant(&self) -> Claimant {
        Claimant {
            id: self.id.clone(),
            name: self.name.clone(),
            roll_no: self.roll_no.clone(),
        }
    }
}

/// The student identity attached to a claimed word.
///
/// The type allows the same claimant on any number of words; the
/// one-word-per-student invariant is enforced by the board update
/// logic, not here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Claimant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub roll_no: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: WordId,
    pub text: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taken_by: Option<Claimant>,
}

impl Word {
    pub fn is_available(&self) -> bool {
        self.taken_by.is_none()
    }
}

/// One roster row. Seeded once, name editable by the CR afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub roll_no: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub student_roll_no: String,
    pub student_name: String,
    pub video_link: String,
    /// RFC 3339 timestamp of the latest write.
    pub submitted_at: String,
}

/// The word-catalog document. Every connected client holds a copy and
/// replaces it wholesale on each update broadcast.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WordBoard {
    #[serde(default)]
    pub words: Vec<Word>,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl WordBoard {
    /// The word currently held by `student_id`, if any.
    pub fn word_held_by(&self, student_id: &str) -> Option<&Word> {
        self.words
            .iter()
            .find(|w| w.taken_by.as_ref().is_some_and(|c| c.id == student_id))
    }

    pub fn word(&self, id: WordId) -> Option<&Word> {
        self.words.iter().find(|w| w.id == id)
    }
}

/// The submission-portal document: the ledger, the roster it is
/// displayed against, and the CR's global lock.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionLedger {
    #[serde(default)]
    pub submissions: Vec<Submission>,
    #[serde(default)]
    pub student_list: Vec<StudentRecord>,
    #[serde(default)]
    pub is_locked: bool,
}

impl SubmissionLedger {
    pub fn submission_for(&self, roll_no: &str) -> Option<&Submission> {
        self.submissions.iter().find(|s| s.student_roll_no == roll_no)
    }

    pub fn student(&self, roll_no: &str) -> Option<&StudentRecord> {
        self.student_list.iter().find(|s| s.roll_no == roll_no)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_decode_with_missing_fields() {
        // Remote documents may predate newer fields; every collection
        // must default to empty instead of failing the decode.
        let board: WordBoard = serde_json::from_str("{}").unwrap();
        assert!(board.words.is_empty());
        assert!(board.categories.is_empty());

        let ledger: SubmissionLedger = serde_json::from_str(r#"{"isLocked":true}"#).unwrap();
        assert!(ledger.submissions.is_empty());
        assert!(ledger.student_list.is_empty());
        assert!(ledger.is_locked);
    }

    #[test]
    fn test_available_word_serializes_without_taken_by() {
        let word = Word {
            id: 1,
            text: "Melody".to_string(),
            category: "Music".to_string(),
            taken_by: None,
        };
        let json = serde_json::to_string(&word).unwrap();
        assert!(!json.contains("takenBy"));
    }

    #[test]
    fn test_word_held_by() {
        let board = WordBoard {
            words: vec![
                Word {
                    id: 1,
                    text: "Melody".to_string(),
                    category: "Music".to_string(),
                    taken_by: None,
                },
                Word {
                    id: 2,
                    text: "Rhythm".to_string(),
                    category: "Music".to_string(),
                    taken_by: Some(Claimant {
                        id: "s1".to_string(),
                        name: "Asha".to_string(),
                        roll_no: "4".to_string(),
                    }),
                },
            ],
            categories: vec!["Music".to_string()],
        };

        assert_eq!(board.word_held_by("s1").map(|w| w.id), Some(2));
        assert!(board.word_held_by("s2").is_none());
    }
}
