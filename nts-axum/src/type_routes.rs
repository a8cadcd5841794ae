//! REST API endpoints for per-type historical queries.
//!
//! One entity type, N entities, N attributes: the standard response groups
//! every matching entity's attribute history under the queried type, and the
//! `/value` sibling returns the same content in the values-only shape.

use crate::ApiApplication;
use aide::{
    axum::{ApiRouter, routing::get_with},
    transform::TransformOperation,
};
use axum::Json;

use crate::error::ErrorDescription;

mod query;
use query::*;

/// Path parameter for the per-type endpoints.
#[derive(serde::Deserialize, schemars::JsonSchema)]
#[schemars(inline)]
#[serde(rename_all = "camelCase")]
struct TypePath {
    /// The entity type whose history is being queried.
    entity_type: String,
}

/// Creates a router with the historical-query endpoints.
pub fn router<T: ApiApplication>() -> ApiRouter<T> {
    ApiRouter::new()
        .api_route_with(
            "/{entityType}",
            get_with(get_type_history::<T>, get_type_history_docs),
            |route| route.tag("history"),
        )
        .api_route_with(
            "/{entityType}/value",
            get_with(get_type_history_values::<T>, get_type_history_values_docs),
            |route| route.tag("history"),
        )
}

fn get_type_history_docs(op: TransformOperation) -> TransformOperation<'_> {
    op.summary("Query the history of all entities of a type")
        .description(
            r#"
            History of N attributes of N entities of the same type.

            The result can be filtered by entity id, attribute name, time
            range and geospatial predicate, paginated with `lastN`, `limit`
            and `offset`, and aggregated with `aggrMethod` (optionally
            bucketed by `aggrPeriod`). Tenancy is scoped with the
            `Fiware-Service` and `Fiware-ServicePath` headers.
            "#,
        )
        .response_with::<400, Json<ErrorDescription>, _>(|res| {
            res.description("Malformed parameter combination")
        })
        .response_with::<404, Json<ErrorDescription>, _>(|res| {
            res.description("No records were found for the query")
        })
        .response_with::<422, Json<ErrorDescription>, _>(|res| {
            res.description("Invalid parameter value")
        })
        .response_with::<500, String, _>(|res| res.description("Query execution failed"))
}

fn get_type_history_values_docs(op: TransformOperation) -> TransformOperation<'_> {
    op.summary("Query the history of all entities of a type, values only")
        .description(
            r#"
            Identical to the parent endpoint, with the entity type dropped
            from the response and the entity list keyed as `values`.
            "#,
        )
        .response_with::<400, Json<ErrorDescription>, _>(|res| {
            res.description("Malformed parameter combination")
        })
        .response_with::<404, Json<ErrorDescription>, _>(|res| {
            res.description("No records were found for the query")
        })
        .response_with::<422, Json<ErrorDescription>, _>(|res| {
            res.description("Invalid parameter value")
        })
        .response_with::<500, String, _>(|res| res.description("Query execution failed"))
}
