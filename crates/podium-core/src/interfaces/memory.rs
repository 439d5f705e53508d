// crates/podium-core/src/interfaces/memory.rs
// ============================================================================
// Module: Podium In-Memory Store
// Description: Reference leaderboard store backed by a locked map.
// Purpose: Provide an embedded store for tests and hosts without persistence.
// Dependencies: crate::core, crate::interfaces, crate::runtime
// ============================================================================

//! ## Overview
//! The in-memory store keeps the whole leaderboard in a single map guarded by
//! one mutex. Holding the lock for the full read-decide-write sequence makes
//! the conditional upsert atomic, which is the same guarantee durable stores
//! provide with a conditional write statement. Contents are lost on drop.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::core::entry::EntryId;
use crate::core::entry::LeaderboardEntry;
use crate::core::name::PlayerName;
use crate::core::time::Timestamp;
use crate::interfaces::LeaderboardStore;
use crate::interfaces::StoreError;
use crate::interfaces::UpsertOutcome;
use crate::runtime::reconcile::Reconciliation;
use crate::runtime::reconcile::reconcile;

// ============================================================================
// SECTION: Table State
// ============================================================================

/// Mutable table state guarded by the store lock.
#[derive(Debug)]
struct MemoryTable {
    /// Entries keyed by normalized player name.
    entries: HashMap<PlayerName, LeaderboardEntry>,
    /// Next identifier to assign on insert (1-based).
    next_id: u64,
}

impl MemoryTable {
    /// Allocates the next entry identifier.
    fn allocate_id(&mut self) -> Result<EntryId, StoreError> {
        let id = EntryId::from_raw(self.next_id)
            .ok_or_else(|| StoreError::Store("entry id allocation failed".to_string()))?;
        self.next_id = self.next_id.saturating_add(1);
        Ok(id)
    }
}

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Leaderboard store backed by process memory.
///
/// # Invariants
/// - At most one entry per normalized name (map key).
/// - All operations take the single table lock; writes are atomic.
#[derive(Debug)]
pub struct InMemoryLeaderboardStore {
    /// Table state; the lock scope is the atomicity unit.
    inner: Mutex<MemoryTable>,
}

impl InMemoryLeaderboardStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Mutex::new(MemoryTable { entries: HashMap::new(), next_id: 1 }) }
    }

    /// Locks the table, mapping lock poisoning to a store error.
    fn lock_table(&self) -> Result<MutexGuard<'_, MemoryTable>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Store("memory store lock poisoned".to_string()))
    }
}

impl Default for InMemoryLeaderboardStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LeaderboardStore for InMemoryLeaderboardStore {
    fn upsert_max(
        &self,
        name: &PlayerName,
        score: i64,
        submitted_at: Timestamp,
    ) -> Result<UpsertOutcome, StoreError> {
        let mut table = self.lock_table()?;
        let existing = table.entries.get(name).cloned();
        match reconcile(existing.as_ref().map(|entry| entry.score), score) {
            Reconciliation::Insert => {
                let id = table.allocate_id()?;
                let entry = LeaderboardEntry { id, name: name.clone(), score, submitted_at };
                table.entries.insert(name.clone(), entry.clone());
                Ok(UpsertOutcome::Created(entry))
            }
            Reconciliation::Replace => {
                let Some(mut entry) = existing else {
                    return Err(StoreError::Corrupt(
                        "entry disappeared during upsert".to_string(),
                    ));
                };
                let previous_score = entry.score;
                entry.score = score;
                entry.submitted_at = submitted_at;
                table.entries.insert(name.clone(), entry.clone());
                Ok(UpsertOutcome::Updated { entry, previous_score })
            }
            Reconciliation::Keep => {
                let Some(entry) = existing else {
                    return Err(StoreError::Corrupt(
                        "entry disappeared during upsert".to_string(),
                    ));
                };
                Ok(UpsertOutcome::Unchanged(entry))
            }
        }
    }

    fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let table = self.lock_table()?;
        let mut entries: Vec<LeaderboardEntry> = table.entries.values().cloned().collect();
        entries.sort_by(|left, right| right.score.cmp(&left.score).then(left.id.cmp(&right.id)));
        entries.truncate(limit);
        Ok(entries)
    }

    fn exists(&self, name: &PlayerName) -> Result<bool, StoreError> {
        let table = self.lock_table()?;
        Ok(table.entries.contains_key(name))
    }

    fn readiness(&self) -> Result<(), StoreError> {
        self.lock_table().map(|_| ())
    }
}
