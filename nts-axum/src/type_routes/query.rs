use super::TypePath;
use crate::{
    ApiApplication,
    error::ApiError,
    headers::{FiwareService, FiwareServicePath},
};

use axum::{
    Json,
    extract::{Path, Query, State},
};
use axum_extra::TypedHeader;
use nts_core::dispatch;
use nts_core::models::{QueryParams, QueryRequest, Tenant, TypeResponse, ValuesResponse};

/// Query the history of all entities of a type.
///
/// # Returns
///
/// - `200 OK`: entities grouped under the queried type
/// - `400 Bad Request`: malformed parameter combination
/// - `404 Not Found`: no records matched
/// - `422 Unprocessable Entity`: invalid parameter value
/// - `500 Internal Server Error`: query execution failed
pub(crate) async fn get_type_history<T: ApiApplication>(
    State(app): State<T>,
    Path(TypePath { entity_type }): Path<TypePath>,
    service: Option<TypedHeader<FiwareService>>,
    service_path: Option<TypedHeader<FiwareServicePath>>,
    Query(params): Query<QueryParams>,
) -> Result<Json<TypeResponse>, ApiError> {
    let tenant = tenant_from(service, service_path);
    let response = run_query(app, entity_type, params, tenant).await?;
    Ok(Json(response))
}

/// Values-only variant of [`get_type_history`]: same content, with the
/// entity type dropped and the entity list keyed as `values`.
pub(crate) async fn get_type_history_values<T: ApiApplication>(
    State(app): State<T>,
    Path(TypePath { entity_type }): Path<TypePath>,
    service: Option<TypedHeader<FiwareService>>,
    service_path: Option<TypedHeader<FiwareServicePath>>,
    Query(params): Query<QueryParams>,
) -> Result<Json<ValuesResponse>, ApiError> {
    let tenant = tenant_from(service, service_path);
    let response = run_query(app, entity_type, params, tenant).await?;
    Ok(Json(response.into_values()))
}

fn tenant_from(
    service: Option<TypedHeader<FiwareService>>,
    service_path: Option<TypedHeader<FiwareServicePath>>,
) -> Tenant {
    Tenant {
        service: service.map(|TypedHeader(header)| header.into_inner()),
        service_path: service_path.map(|TypedHeader(header)| header.into_inner()),
    }
}

/// Validate, dispatch, and normalize one historical query.
///
/// Validation failures return before any storage call; dispatch failures
/// arrive classified and convert straight into responses. An empty result
/// is reported as 404, which is a normal outcome of a well-formed query.
async fn run_query<T: ApiApplication>(
    app: T,
    entity_type: String,
    params: QueryParams,
    tenant: Tenant,
) -> Result<TypeResponse, ApiError> {
    let request = QueryRequest::new(entity_type, params, tenant)?;
    let records = dispatch(&app, &request).await?;
    if records.is_empty() {
        return Err(ApiError::not_found());
    }
    Ok(TypeResponse::build(&records, &request))
}
