// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSONL (JSON Lines) encoding for records kept under a single store key.
//!
//! Each record is one JSON object per line. Decoding is lenient: an
//! unparseable line is skipped and counted instead of failing the whole list.

use serde::{de::DeserializeOwned, Serialize};

/// Records decoded from JSONL text.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    /// Records in file order.
    pub records: Vec<T>,
    /// Number of non-blank lines that could not be parsed.
    pub skipped: usize,
}

/// Encodes records as JSONL, one line per record with a trailing newline.
pub fn encode<T: Serialize>(records: &[T]) -> serde_json::Result<String> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

/// Decodes JSONL text, skipping blank lines and counting corrupt ones.
pub fn decode<T: DeserializeOwned>(text: &str) -> Decoded<T> {
    let mut records = Vec::new();
    let mut skipped = 0;

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(record) => records.push(record),
            Err(_) => skipped += 1,
        }
    }

    Decoded { records, skipped }
}

#[cfg(test)]
#[path = "jsonl_tests.rs"]
mod tests;
