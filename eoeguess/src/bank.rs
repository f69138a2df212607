//! Question bank files.
//!
//! Banks are JSON documents authored by the game:
//!
//! ```json
//! {
//!   "id": 1718000000000,
//!   "name": "Animals",
//!   "author": "Mika",
//!   "questions": [
//!     { "image": "images/cat.png", "question": "Who is this?", "answer": "cat", "hint": "meow" }
//!   ]
//! }
//! ```
//!
//! Only reading is supported here; the image layer needs a bank's image
//! list, not its editing workflow.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::source::resolve_source;

/// Errors that can occur while reading a bank.
#[derive(Debug, Error)]
pub enum BankError {
    /// Failed to read the bank file.
    #[error("failed to read question bank {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid bank document.
    #[error("failed to parse question bank {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The document parsed but is not a question bank.
    #[error("invalid question bank format in {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// One quiz question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Raw image field: URL, relative path or inline data. May be empty.
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub hint: String,
}

/// A named set of questions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionBank {
    /// Creation timestamp in milliseconds, when the bank has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    pub questions: Vec<Question>,
}

impl QuestionBank {
    /// Parse a bank from JSON text. `name` and `questions` are required.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Read a bank file.
    ///
    /// Fails with [`BankError::Invalid`] when the document lacks a name or
    /// a question list, or the name is empty.
    pub fn load(path: &Path) -> Result<Self, BankError> {
        let text = fs::read_to_string(path).map_err(|e| BankError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let bank = Self::from_json(&text).map_err(|e| {
            if e.is_data() {
                BankError::Invalid {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            } else {
                BankError::Parse {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        if bank.name.trim().is_empty() {
            return Err(BankError::Invalid {
                path: path.to_path_buf(),
                reason: "bank name is empty".to_string(),
            });
        }

        Ok(bank)
    }

    /// Resolved image source keys, in question order.
    ///
    /// Questions without an image are skipped. Relative paths are joined
    /// onto `base_dir` (normally the bank file's directory).
    pub fn source_keys(&self, base_dir: Option<&Path>) -> Vec<String> {
        self.questions
            .iter()
            .filter_map(|q| resolve_source(&q.image, base_dir))
            .collect()
    }

    /// Author name for display.
    pub fn author_or_unknown(&self) -> &str {
        self.author.as_deref().unwrap_or("unknown")
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
