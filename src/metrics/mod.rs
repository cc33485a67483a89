//! Metrics collection module
//!
//! Tracks how navigations settle: renders, redirects and misses, per language.

use crate::locales::SupportedLanguage;
use crate::routing::{Navigation, RouteState};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Terminal state a navigation settled in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    PassThrough,
    Canonical,
    Redirect,
    NotFound,
}

impl Outcome {
    pub fn of(state: &RouteState) -> Option<Self> {
        match state {
            RouteState::PassThrough(_) => Some(Outcome::PassThrough),
            RouteState::Canonical(_) => Some(Outcome::Canonical),
            RouteState::Redirecting { .. } => Some(Outcome::Redirect),
            RouteState::NotFound => Some(Outcome::NotFound),
            RouteState::Unchecked { .. } | RouteState::Checking { .. } => None,
        }
    }
}

/// Global metrics collector
pub struct Metrics {
    /// Total navigation count
    total_navigations: AtomicU64,
    /// Language switches
    language_switches: AtomicU64,
    /// Navigations per terminal state
    outcomes: RwLock<BTreeMap<Outcome, u64>>,
    /// Navigations per active language
    languages: RwLock<BTreeMap<SupportedLanguage, u64>>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            total_navigations: AtomicU64::new(0),
            language_switches: AtomicU64::new(0),
            outcomes: RwLock::new(BTreeMap::new()),
            languages: RwLock::new(BTreeMap::new()),
        }
    }

    /// Record a settled navigation
    pub fn record(&self, navigation: &Navigation) {
        self.total_navigations.fetch_add(1, Ordering::Relaxed);

        if let Some(outcome) = Outcome::of(&navigation.state) {
            let mut outcomes = self.outcomes.write().unwrap_or_else(|e| e.into_inner());
            *outcomes.entry(outcome).or_insert(0) += 1;
        }

        let mut languages = self.languages.write().unwrap_or_else(|e| e.into_inner());
        *languages.entry(navigation.context.active_language).or_insert(0) += 1;
    }

    /// Record an explicit language switch
    pub fn record_switch(&self) {
        self.language_switches.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total navigations
    pub fn total_navigations(&self) -> u64 {
        self.total_navigations.load(Ordering::Relaxed)
    }

    /// Get the count for one outcome
    pub fn outcome_count(&self, outcome: Outcome) -> u64 {
        let outcomes = self.outcomes.read().unwrap_or_else(|e| e.into_inner());
        outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_navigations: self.total_navigations(),
            language_switches: self.language_switches.load(Ordering::Relaxed),
            outcomes: self
                .outcomes
                .read()
                .unwrap_or_else(|e| e.into_inner())
                .clone(),
            languages: self
                .languages
                .read()
                .unwrap_or_else(|e| e.into_inner())
                .clone(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable view of the counters
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_navigations: u64,
    pub language_switches: u64,
    pub outcomes: BTreeMap<Outcome, u64>,
    pub languages: BTreeMap<SupportedLanguage, u64>,
}
