use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use nts_core::models::{EntityRecord, QueryFailure, QueryRequest};
use nts_core::ports::Translator;

/// Failure the in-memory translator injects before touching any data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedFailure {
    /// A combination the backend cannot execute.
    Usage,
    /// A value the backend rejects.
    InvalidParameter,
    /// An infrastructure failure.
    Unexpected,
}

/// In-memory stand-in for a storage translator.
///
/// Filters the tenant's fixture rows by entity type and id the way a real
/// backend would, and flips `released` on drop so tests can observe the
/// scoped-release guarantee.
pub struct MemTranslator {
    pub rows: Vec<EntityRecord>,
    pub inject: Option<InjectedFailure>,
    pub queries: Arc<AtomicUsize>,
    pub released: Arc<AtomicBool>,
}

impl Translator for MemTranslator {
    async fn query(self, request: &QueryRequest) -> Result<Vec<EntityRecord>, QueryFailure> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        match self.inject {
            Some(InjectedFailure::Usage) => {
                return Err(QueryFailure::usage("backend rejected the combination"));
            }
            Some(InjectedFailure::InvalidParameter) => {
                return Err(QueryFailure::invalid("backend rejected a value"));
            }
            Some(InjectedFailure::Unexpected) => {
                return Err(QueryFailure::unexpected("connection reset by peer"));
            }
            None => {}
        }

        let rows = self
            .rows
            .iter()
            .filter(|row| row.entity_type() == Some(request.entity_type.as_str()))
            .filter(|row| match &request.entity_ids {
                Some(ids) => row.id().is_some_and(|id| ids.contains(id)),
                None => true,
            })
            .cloned()
            .collect();
        Ok(rows)
    }
}

impl Drop for MemTranslator {
    fn drop(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}
