//! Snapshot export/import and the CR's CSV report.
//!
//! The export is a serializable copy of both shared documents, used
//! as a quick backup/restore mechanism between sessions. Runtime-only
//! pieces (broadcast channels, auth config) are rebuilt at startup
//! and never serialized.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::types::{SubmissionLedger, WordBoard};

/// Schema version for export format compatibility.
/// Version 1: initial format (words, categories, submissions,
/// studentList, isLocked).
pub const EXPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardExport {
    /// Schema version for forward compatibility
    pub schema_version: u32,
    /// Export timestamp (ISO 8601)
    pub exported_at: String,
    #[serde(default)]
    pub board: WordBoard,
    #[serde(default)]
    pub ledger: SubmissionLedger,
}

impl BoardExport {
    pub fn new(board: WordBoard, ledger: SubmissionLedger) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            exported_at: chrono::Utc::now().to_rfc3339(),
            board,
            ledger,
        }
    }

    /// Validate the export before import.
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version > EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Export schema version {} is newer than supported version {}. \
                 Please update the server.",
                self.schema_version, EXPORT_SCHEMA_VERSION
            ));
        }

        // One word per student, even in imported documents.
        let mut holders = HashSet::new();
        for word in &self.board.words {
            if let Some(claimant) = &word.taken_by {
                if !holders.insert(claimant.id.clone()) {
                    return Err(format!(
                        "Student '{}' holds more than one word in the export",
                        claimant.id
                    ));
                }
            }
        }

        // Words must reference categories that exist.
        for word in &self.board.words {
            if !self.board.categories.iter().any(|c| *c == word.category) {
                return Err(format!(
                    "Word '{}' references category '{}' which doesn't exist",
                    word.text, word.category
                ));
            }
        }

        // At most one submission per roll number.
        let mut rolls = HashSet::new();
        for sub in &self.ledger.submissions {
            if !rolls.insert(sub.student_roll_no.clone()) {
                return Err(format!(
                    "Roll number '{}' has more than one submission in the export",
                    sub.student_roll_no
                ));
            }
        }

        Ok(())
    }
}

/// Build the CR's submission report.
///
/// One row per roster entry sorted by numeric roll number, status
/// `Submitted`/`Not Submitted`, link and timestamp blank for
/// non-submitters.
pub fn submissions_csv(ledger: &SubmissionLedger) -> String {
    let mut students = ledger.student_list.clone();
    students.sort_by_key(|s| numeric_roll(&s.roll_no));

    let mut out = String::from("Roll No,Name,Status,Link,Submitted At\n");
    for student in &students {
        let submission = ledger.submission_for(&student.roll_no);
        let (status, link, at) = match submission {
            Some(s) => ("Submitted", s.video_link.as_str(), s.submitted_at.as_str()),
            None => ("Not Submitted", "", ""),
        };
        let row = [
            student.roll_no.as_str(),
            student.name.as_str(),
            status,
            link,
            at,
        ]
        .map(csv_field)
        .join(",");
        out.push_str(&row);
        out.push('\n');
    }
    out
}

/// Non-numeric roll numbers sort after every numeric one, then by the
/// raw string so the order stays stable.
fn numeric_roll(roll_no: &str) -> (u64, String) {
    (
        roll_no.trim().parse::<u64>().unwrap_or(u64::MAX),
        roll_no.to_string(),
    )
}

/// Standard CSV quoting: wrap in double quotes when the value contains
/// a comma, quote, or newline, doubling embedded quotes.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Claimant, StudentRecord, Submission, Word};

    fn roster(entries: &[(&str, &str)]) -> Vec<StudentRecord> {
        entries
            .iter()
            .map(|(roll, name)| StudentRecord {
                roll_no: (*roll).to_string(),
                name: (*name).to_string(),
            })
            .collect()
    }

    #[test]
    fn test_csv_orders_by_numeric_roll_with_empty_fields() {
        let ledger = SubmissionLedger {
            submissions: Vec::new(),
            student_list: roster(&[("2", "B"), ("1", "A")]),
            is_locked: false,
        };
        let csv = submissions_csv(&ledger);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Roll No,Name,Status,Link,Submitted At");
        assert_eq!(lines[1], "1,A,Not Submitted,,");
        assert_eq!(lines[2], "2,B,Not Submitted,,");
    }

    #[test]
    fn test_csv_numeric_not_lexicographic() {
        let ledger = SubmissionLedger {
            submissions: Vec::new(),
            student_list: roster(&[("10", "J"), ("2", "B")]),
            is_locked: false,
        };
        let csv = submissions_csv(&ledger);
        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[1].starts_with("2,"));
        assert!(lines[2].starts_with("10,"));
    }

    #[test]
    fn test_csv_quotes_special_characters() {
        let ledger = SubmissionLedger {
            submissions: vec![Submission {
                student_roll_no: "1".to_string(),
                student_name: "Rao, Asha \"A\"".to_string(),
                video_link: "https://example.com/v?a=1,b=2".to_string(),
                submitted_at: "2024-03-05T10:30:00+00:00".to_string(),
            }],
            student_list: roster(&[("1", "Rao, Asha \"A\"")]),
            is_locked: false,
        };
        let csv = submissions_csv(&ledger);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "1,\"Rao, Asha \"\"A\"\"\",Submitted,\"https://example.com/v?a=1,b=2\",2024-03-05T10:30:00+00:00"
        );
    }

    #[test]
    fn test_export_serialization_roundtrip() {
        let export = BoardExport::new(
            WordBoard {
                words: vec![Word {
                    id: 1,
                    text: "Melody".to_string(),
                    category: "Music".to_string(),
                    taken_by: None,
                }],
                categories: vec!["Music".to_string()],
            },
            SubmissionLedger::default(),
        );

        let json = serde_json::to_string_pretty(&export).unwrap();
        let parsed: BoardExport = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(parsed.board.words.len(), 1);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_double_claim() {
        let claimant = Claimant {
            id: "s1".to_string(),
            name: "Asha".to_string(),
            roll_no: "1".to_string(),
        };
        let export = BoardExport::new(
            WordBoard {
                words: vec![
                    Word {
                        id: 1,
                        text: "Melody".to_string(),
                        category: "Music".to_string(),
                        taken_by: Some(claimant.clone()),
                    },
                    Word {
                        id: 2,
                        text: "Rhythm".to_string(),
                        category: "Music".to_string(),
                        taken_by: Some(claimant),
                    },
                ],
                categories: vec!["Music".to_string()],
            },
            SubmissionLedger::default(),
        );

        let result = export.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("more than one word"));
    }

    #[test]
    fn test_validation_rejects_unknown_category() {
        let export = BoardExport::new(
            WordBoard {
                words: vec![Word {
                    id: 1,
                    text: "Melody".to_string(),
                    category: "Music".to_string(),
                    taken_by: None,
                }],
                categories: vec![],
            },
            SubmissionLedger::default(),
        );
        let result = export.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("doesn't exist"));
    }

    #[test]
    fn test_validation_future_schema() {
        let mut export = BoardExport::new(WordBoard::default(), SubmissionLedger::default());
        export.schema_version = EXPORT_SCHEMA_VERSION + 1;
        let result = export.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("newer than supported"));
    }

    #[test]
    fn test_validation_rejects_duplicate_rolls() {
        let sub = Submission {
            student_roll_no: "1".to_string(),
            student_name: "Asha".to_string(),
            video_link: "https://example.com/a".to_string(),
            submitted_at: "2024-03-05T10:30:00+00:00".to_string(),
        };
        let export = BoardExport::new(
            WordBoard::default(),
            SubmissionLedger {
                submissions: vec![sub.clone(), sub],
                student_list: Vec::new(),
                is_locked: false,
            },
        );
        let result = export.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("more than one submission"));
    }
}
