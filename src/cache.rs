//! Report caching for repeated transcripts
//!
//! A report is a pure function of the trimmed text and the (static) registry,
//! so reports are cached in memory keyed by a SHA-256 fingerprint of the text.
//! Nothing is written to disk.

use crate::EvaluationReport;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

const LOG_TARGET: &str = "cache";

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Default)]
struct CacheData {
    entries: HashMap<String, EvaluationReport>,
    /// Insertion order, oldest first
    order: VecDeque<String>,
    hits: u64,
    misses: u64,
}

/// Bounded, first-in-first-out cache of evaluation reports
#[derive(Debug)]
pub struct ReportCache {
    capacity: usize,
    data: Mutex<CacheData>,
}

impl ReportCache {
    /// Create a cache holding at most `capacity` reports (0 disables caching)
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            data: Mutex::new(CacheData::default()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    /// Compute the SHA-256 fingerprint of a transcript
    pub fn fingerprint(text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn lock(&self) -> MutexGuard<'_, CacheData> {
        // Entries are inserted whole, so a poisoned lock still guards consistent data
        self.data.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get a cached report for `text`
    pub fn get(&self, text: &str) -> Option<EvaluationReport> {
        if !self.is_enabled() {
            return None;
        }
        let key = Self::fingerprint(text);
        let mut data = self.lock();
        let cached = data.entries.get(&key).cloned();
        match cached {
            Some(report) => {
                data.hits += 1;
                log::trace!(target: LOG_TARGET, "hit {}", &key[..12]);
                Some(report)
            }
            None => {
                data.misses += 1;
                log::trace!(target: LOG_TARGET, "miss {}", &key[..12]);
                None
            }
        }
    }

    /// Store a report, evicting the oldest entry when full
    pub fn insert(&self, text: &str, report: EvaluationReport) {
        if !self.is_enabled() {
            return;
        }
        let key = Self::fingerprint(text);
        let mut data = self.lock();
        if data.entries.contains_key(&key) {
            return;
        }
        while data.entries.len() >= self.capacity {
            match data.order.pop_front() {
                Some(oldest) => {
                    data.entries.remove(&oldest);
                }
                None => break,
            }
        }
        data.order.push_back(key.clone());
        data.entries.insert(key, report);
    }

    pub fn stats(&self) -> CacheStats {
        let data = self.lock();
        CacheStats {
            entries: data.entries.len(),
            capacity: self.capacity,
            hits: data.hits,
            misses: data.misses,
        }
    }

    /// Clear all entries and counters
    pub fn clear(&self) {
        *self.lock() = CacheData::default();
    }
}
