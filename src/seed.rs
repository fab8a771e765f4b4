//! Initial documents: the built-in word catalog and the class roster.
//!
//! The roster is normally loaded from a JSON file (`WORDBOARD_ROSTER`)
//! so each class ships its own list; the built-in one keeps the server
//! usable out of the box.

use std::path::Path;

use crate::types::{StudentRecord, SubmissionLedger, Word, WordBoard, WordId};

const CATALOG: &[(&str, &[&str])] = &[
    (
        "Politics",
        &[
            "Democracy",
            "Republic",
            "Election",
            "Legislation",
            "Constitution",
            "Diplomacy",
            "Sovereignty",
            "Federalism",
            "Bureaucracy",
            "Ideology",
            "Parliament",
            "Congress",
            "Judiciary",
            "Executive",
            "Lobbying",
            "Gerrymandering",
            "Suffrage",
            "Bipartisan",
            "Coalition",
            "Referendum",
            "Veto",
            "Impeachment",
            "Embargo",
            "Sanction",
            "Treaty",
        ],
    ),
    (
        "Music",
        &[
            "Melody",
            "Harmony",
            "Rhythm",
            "Tempo",
            "Orchestra",
            "Symphony",
            "Sonata",
            "Concerto",
            "Opera",
            "Aria",
            "Chorus",
            "Cadence",
            "Crescendo",
            "Adagio",
            "Allegro",
            "Pitch",
            "Timbre",
            "Acoustic",
            "Synthesizer",
            "Improvisation",
            "Fusion",
            "Reggae",
            "Blues",
            "Ballad",
            "Genre",
        ],
    ),
    (
        "Science",
        &[
            "Hypothesis",
            "Experiment",
            "Theory",
            "Quantum",
            "Gravity",
            "Photosynthesis",
            "Evolution",
            "Genetics",
            "Molecule",
            "Atom",
            "Neutron",
            "Proton",
            "Electron",
            "Galaxy",
            "Nebula",
            "Black Hole",
            "Supernova",
            "Fossil",
            "Ecosystem",
            "Biodiversity",
            "Catalyst",
            "Enzyme",
            "Vaccine",
            "Antibody",
            "Virus",
        ],
    ),
    (
        "Philosophy",
        &[
            "Epistemology",
            "Metaphysics",
            "Ethics",
            "Aesthetics",
            "Logic",
            "Socrates",
            "Plato",
            "Aristotle",
            "Existentialism",
            "Nihilism",
            "Utilitarianism",
            "Deontology",
            "Virtue",
            "Dualism",
            "Materialism",
            "Idealism",
            "Empiricism",
            "Rationalism",
            "Phenomenology",
            "Stoicism",
            "Hedonism",
            "Absurdism",
            "Ontology",
            "Solipsism",
            "Determinism",
        ],
    ),
];

/// Errors while loading seed data from disk.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read roster file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse roster file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("roster file is empty")]
    Empty,
}

/// The full seeded catalog, ids counting up from 1 in catalog order.
pub fn initial_board() -> WordBoard {
    let mut words = Vec::new();
    let mut id: WordId = 1;
    for (category, texts) in CATALOG {
        for text in *texts {
            words.push(Word {
                id,
                text: (*text).to_string(),
                category: (*category).to_string(),
                taken_by: None,
            });
            id += 1;
        }
    }
    WordBoard {
        words,
        categories: CATALOG.iter().map(|(c, _)| (*c).to_string()).collect(),
    }
}

/// An empty, unlocked ledger over the given roster.
pub fn initial_ledger(roster: Vec<StudentRecord>) -> SubmissionLedger {
    SubmissionLedger {
        submissions: Vec::new(),
        student_list: roster,
        is_locked: false,
    }
}

/// Fallback roster used when no `WORDBOARD_ROSTER` file is configured.
pub fn builtin_roster() -> Vec<StudentRecord> {
    [
        (1, "Asha Rao"),
        (2, "Dev Mehta"),
        (3, "Farah Khan"),
        (4, "Ishaan Gupta"),
        (5, "Kavya Nair"),
        (6, "Manav Joshi"),
        (7, "Nikita Sharma"),
        (8, "Pranav Iyer"),
        (9, "Riya Sen"),
        (10, "Sahil Verma"),
        (11, "Tanvi Kulkarni"),
        (12, "Zoya Ansari"),
    ]
    .into_iter()
    .map(|(roll_no, name)| StudentRecord {
        roll_no: roll_no.to_string(),
        name: name.to_string(),
    })
    .collect()
}

/// Load a roster from a JSON file: an ordered list of
/// `{"rollNo": ..., "name": ...}` records.
pub fn load_roster(path: impl AsRef<Path>) -> Result<Vec<StudentRecord>, SeedError> {
    let raw = std::fs::read_to_string(path)?;
    let roster: Vec<StudentRecord> = serde_json::from_str(&raw)?;
    if roster.is_empty() {
        return Err(SeedError::Empty);
    }
    Ok(roster)
}

/// The roster from `WORDBOARD_ROSTER` when set and readable, the
/// built-in class list otherwise. Load failures are logged, not fatal.
pub fn roster_from_env() -> Vec<StudentRecord> {
    match std::env::var("WORDBOARD_ROSTER") {
        Ok(path) if !path.trim().is_empty() => match load_roster(&path) {
            Ok(roster) => {
                tracing::info!("loaded {} roster entries from {}", roster.len(), path);
                roster
            }
            Err(e) => {
                tracing::warn!("failed to load roster from {}: {}; using built-in", path, e);
                builtin_roster()
            }
        },
        _ => builtin_roster(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_initial_board_shape() {
        let board = initial_board();
        assert_eq!(board.categories.len(), 4);
        assert_eq!(board.words.len(), 100);
        // Ids are 1..=100 in catalog order.
        assert_eq!(board.words.first().unwrap().id, 1);
        assert_eq!(board.words.last().unwrap().id, 100);
        assert!(board.words.iter().all(|w| w.is_available()));
    }

    #[test]
    fn test_load_roster_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"rollNo":"1","name":"Asha Rao"}},{{"rollNo":"2","name":"Dev Mehta"}}]"#
        )
        .unwrap();

        let roster = load_roster(file.path()).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].roll_no, "1");
        assert_eq!(roster[1].name, "Dev Mehta");
    }

    #[test]
    fn test_load_roster_rejects_empty_and_malformed() {
        let mut empty = tempfile::NamedTempFile::new().unwrap();
        write!(empty, "[]").unwrap();
        assert!(matches!(load_roster(empty.path()), Err(SeedError::Empty)));

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        write!(bad, "not json").unwrap();
        assert!(matches!(load_roster(bad.path()), Err(SeedError::Parse(_))));

        assert!(matches!(
            load_roster("/nonexistent/roster.json"),
            Err(SeedError::Io(_))
        ));
    }

    #[test]
    #[serial]
    fn test_roster_from_env_falls_back_to_builtin() {
        std::env::set_var("WORDBOARD_ROSTER", "/nonexistent/roster.json");
        let roster = roster_from_env();
        assert_eq!(roster.len(), builtin_roster().len());
        std::env::remove_var("WORDBOARD_ROSTER");
    }
}
