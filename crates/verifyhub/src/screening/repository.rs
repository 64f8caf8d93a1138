use std::collections::VecDeque;
use std::sync::RwLock;

use super::domain::{Candidate, CandidateId};

/// Storage abstraction so the lifecycle service can be exercised in isolation.
///
/// Implementations hand out owned copies; callers never hold references into
/// stored state.
pub trait CandidateRepository: Send + Sync {
    /// All candidates, most recently inserted first.
    fn list(&self) -> Result<Vec<Candidate>, RepositoryError>;
    fn fetch(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError>;
    /// Stores a new candidate at the head of the ordering.
    fn insert(&self, candidate: Candidate) -> Result<Candidate, RepositoryError>;
    /// Replaces an existing candidate in place, keeping its position.
    fn update(&self, candidate: Candidate) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Process-local store backed by an ordered deque.
#[derive(Debug, Default)]
pub struct InMemoryCandidateRepository {
    records: RwLock<VecDeque<Candidate>>,
}

impl InMemoryCandidateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store that lists `candidates` in the given order.
    pub fn with_candidates(candidates: Vec<Candidate>) -> Self {
        Self {
            records: RwLock::new(candidates.into()),
        }
    }

    /// Best-effort count for diagnostics; a poisoned store counts as empty.
    /// Trait methods report the same condition as `RepositoryError::Unavailable`.
    pub fn len(&self) -> usize {
        self.records.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::Unavailable("candidate store lock poisoned".to_string())
}

impl CandidateRepository for InMemoryCandidateRepository {
    fn list(&self) -> Result<Vec<Candidate>, RepositoryError> {
        let guard = self.records.read().map_err(poisoned)?;
        Ok(guard.iter().cloned().collect())
    }

    fn fetch(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        let guard = self.records.read().map_err(poisoned)?;
        Ok(guard.iter().find(|candidate| &candidate.id == id).cloned())
    }

    fn insert(&self, candidate: Candidate) -> Result<Candidate, RepositoryError> {
        let mut guard = self.records.write().map_err(poisoned)?;
        if guard.iter().any(|existing| existing.id == candidate.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push_front(candidate.clone());
        Ok(candidate)
    }

    fn update(&self, candidate: Candidate) -> Result<(), RepositoryError> {
        let mut guard = self.records.write().map_err(poisoned)?;
        match guard.iter_mut().find(|existing| existing.id == candidate.id) {
            Some(slot) => {
                *slot = candidate;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}
