//! History walker (spec §4.7): follows parent pointers from HEAD.

use crate::error::Result;
use crate::hash::{hash_to_hex, Hash};
use crate::repository::Repository;
use crate::store::{read_object, ObjectStore};

pub struct LogEntry {
    pub hash: Hash,
    pub author: String,
    pub timestamp: String,
    pub message: String,
}

/// Walks from HEAD toward the root, stopping after `limit` entries if given.
pub fn log(repo: &Repository, store: &impl ObjectStore, limit: Option<usize>) -> Result<Vec<LogEntry>> {
    let mut entries = Vec::new();
    let mut current = repo.resolve_head()?;

    while let Some(hash) = current {
        if let Some(limit) = limit {
            if entries.len() >= limit {
                break;
            }
        }

        let commit = read_object(store, &hash)?.into_commit()?;
        current = commit.parent;

        entries.push(LogEntry {
            hash,
            author: commit.author,
            timestamp: commit.timestamp,
            message: commit.message,
        });
    }

    Ok(entries)
}

pub fn format_entry(entry: &LogEntry, out: &mut dyn core::fmt::Write) -> core::fmt::Result {
    writeln!(out, "commit {}", hash_to_hex(&entry.hash))?;
    writeln!(out, "Author: {}", entry.author)?;
    writeln!(out, "Date:   {}", entry.timestamp)?;
    writeln!(out)?;
    for line in entry.message.lines() {
        writeln!(out, "    {line}")?;
    }
    writeln!(out)
}

pub fn format_log(entries: &[LogEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = format_entry(entry, &mut out);
    }
    out
}
