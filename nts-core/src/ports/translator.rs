use crate::models::{EntityRecord, QueryFailure, QueryRequest, Tenant};

/// A storage translator scoped to one request.
///
/// A translator wraps whatever resources one query needs, typically a
/// connection checked out of the backend's pool. [`Translator::query`] takes
/// `self` by value: the translator is consumed by its single attempt and
/// dropped when the call returns, so the resources are released on success,
/// on an empty result, and on failure alike. Retry policy, if a backend
/// wants one, lives behind this trait, never in front of it.
pub trait Translator: Send {
    /// Execute the query against the backing store.
    ///
    /// # Returns
    ///
    /// The matching rows, possibly empty. An empty result is a normal
    /// outcome, not an error. Failures must arrive pre-classified into the
    /// three [`QueryFailure`] categories.
    fn query(
        self,
        request: &QueryRequest,
    ) -> impl Future<Output = Result<Vec<EntityRecord>, QueryFailure>> + Send;
}

/// The application's side of translator acquisition.
///
/// Implementations own the long-lived backend state (connection pools,
/// configuration) and hand out a fresh [`Translator`] per request, scoped to
/// the request's tenant. Nothing request-local may be shared across calls.
pub trait Application: Clone + Send + Sync + 'static {
    /// The translator type this application hands out.
    type Translator: Translator;

    /// Acquire a translator scoped to `tenant`.
    fn translator_for(
        &self,
        tenant: &Tenant,
    ) -> impl Future<Output = Result<Self::Translator, QueryFailure>> + Send;
}
