use crate::models::{EntityRecord, QueryFailure, QueryRequest};
use crate::ports::{Application, Translator};

/// Execute one validated query against the application's storage translator.
///
/// The translator is acquired per call, scoped to the request's tenant, and
/// queried exactly once. Because [`Translator::query`] consumes the
/// translator, its resources are released on every exit path (success, empty
/// result, or failure) without any explicit cleanup here. Failures
/// cross this boundary already classified; callers map them, they never
/// inspect causes.
pub async fn dispatch<A: Application>(
    app: &A,
    request: &QueryRequest,
) -> Result<Vec<EntityRecord>, QueryFailure> {
    let translator = app.translator_for(&request.tenant).await?;
    translator.query(request).await
}
