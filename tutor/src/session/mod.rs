//! Ephemeral, process-local log of user interactions.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use chrono::Utc;
use serde_json::Value;

use crate::models::{Interaction, InteractionKind};

pub const DEFAULT_MAX_INTERACTIONS: usize = 1000;

/// Bounded log; once full, recording evicts the oldest entry.
pub struct InteractionLog {
    entries: Mutex<VecDeque<Interaction>>,
    capacity: usize,
}

impl Default for InteractionLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_INTERACTIONS)
    }
}

impl InteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A zero capacity is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn record(&self, kind: InteractionKind, details: Value) -> Interaction {
        let interaction = Interaction {
            id: nanoid::nanoid!(),
            timestamp: Utc::now(),
            kind,
            details,
        };

        tracing::debug!(id = %interaction.id, kind = %kind, "Interaction recorded");

        // A poisoned lock only means another request panicked mid-push.
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(interaction.clone());
        interaction
    }

    /// Retained entries, oldest first.
    pub fn list(&self) -> Vec<Interaction> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    /// Number of entries per kind, keyed by the kind's wire name.
    pub fn counts(&self) -> BTreeMap<String, usize> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let mut counts = BTreeMap::new();
        for entry in entries.iter() {
            *counts.entry(entry.kind.to_string()).or_insert(0) += 1;
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
