use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Per-process request counters. Reset on restart; deliberately not durable,
/// so they are basic usage metrics rather than an audit trail.
#[derive(Debug, Default)]
pub struct UsageCounters {
    text_requests: AtomicU64,
    audio_requests: AtomicU64,
    stats_requests: AtomicU64,
    rejected_requests: AtomicU64,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub text_requests: u64,
    pub audio_requests: u64,
    pub stats_requests: u64,
    pub rejected_requests: u64,
}

impl UsageCounters {
    pub fn record_text_request(&self) {
        self.text_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_audio_request(&self) {
        self.audio_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stats_request(&self) {
        self.stats_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejection(&self) {
        self.rejected_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            text_requests: self.text_requests.load(Ordering::Relaxed),
            audio_requests: self.audio_requests.load(Ordering::Relaxed),
            stats_requests: self.stats_requests.load(Ordering::Relaxed),
            rejected_requests: self.rejected_requests.load(Ordering::Relaxed),
        }
    }
}
