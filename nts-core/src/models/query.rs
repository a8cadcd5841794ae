use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};

use super::{
    AggrMethod, AggrPeriod, AggrScope, AggregateError, GeoPredicate, OutputOption, QueryFailure,
};

/// Page size used when the caller does not specify `limit`.
pub const DEFAULT_LIMIT: u64 = 10_000;

/// Tenancy scoping of one request.
///
/// Both values come from the `Fiware-Service` / `Fiware-ServicePath` headers
/// and are passed through to the storage translator untouched; this core
/// neither validates nor interprets them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Logical namespace all storage access is scoped to.
    pub service: Option<String>,
    /// Hierarchical path within the service.
    pub service_path: Option<String>,
}

/// Raw query-string parameters of the historical-query endpoints.
///
/// Every field is optional on the wire. The option-like fields stay as text
/// here on purpose: an unknown `aggrMethod` token must surface as an invalid
/// parameter value, not as a deserialization failure, so the parse into the
/// closed enums is deferred to [`QueryRequest::new`].
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct QueryParams {
    /// Comma-separated list of entity ids to filter on.
    pub id: Option<String>,
    /// Comma-separated list of attribute names; absent means all attributes.
    pub attrs: Option<String>,
    /// Reducer to apply to the raw samples.
    pub aggr_method: Option<String>,
    /// Bucket width for the reducer.
    pub aggr_period: Option<String>,
    /// Whether to reduce per entity or across entities.
    pub aggr_scope: Option<String>,
    /// Comma-separated output toggles.
    pub options: Option<String>,
    /// Inclusive lower bound of the time range, ISO 8601.
    pub from_date: Option<String>,
    /// Inclusive upper bound of the time range, ISO 8601.
    pub to_date: Option<String>,
    /// Return only the last N samples.
    pub last_n: Option<i64>,
    /// Maximum number of results.
    pub limit: Option<i64>,
    /// Number of initial results to skip.
    pub offset: Option<i64>,
    /// Spatial relation, e.g. `near;maxDistance:1000`.
    pub georel: Option<String>,
    /// Reference shape kind for the spatial relation.
    pub geometry: Option<String>,
    /// Coordinate pairs of the reference shape, `lat,lon` separated by `;`.
    pub coords: Option<String>,
}

/// A validated historical-data query, immutable once built.
///
/// This is what reaches the storage translator. Everything in here has been
/// checked by [`QueryRequest::new`]; translators may trust the enums and the
/// geo predicate without re-validating.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    /// The entity type whose history is queried.
    pub entity_type: String,
    /// Entity ids to restrict to, in first-occurrence order; `None` means
    /// all entities of the type.
    pub entity_ids: Option<IndexSet<String, FxBuildHasher>>,
    /// Attribute names to restrict to; `None` means all attributes.
    pub attr_names: Option<IndexSet<String, FxBuildHasher>>,
    /// Reducer to apply, if any.
    pub aggr_method: Option<AggrMethod>,
    /// Bucket width for the reducer. Only meaningful with a method; when
    /// absent, the reducer collapses the whole window into one bucket.
    pub aggr_period: Option<AggrPeriod>,
    /// Reduction scope, honored by the translator.
    pub aggr_scope: Option<AggrScope>,
    /// Output toggles, honored by the translator.
    pub options: Vec<OutputOption>,
    /// Raw lower time bound, forwarded as received. The response normalizer
    /// parses it best-effort when rendering an aggregation window.
    pub from_date: Option<String>,
    /// Raw upper time bound, forwarded as received.
    pub to_date: Option<String>,
    /// Return only the last N samples. May be combined with `limit`: the
    /// effective row budget is `min(last_n, limit)`, applied after `offset`.
    pub last_n: Option<u64>,
    /// Maximum number of results.
    pub limit: u64,
    /// Number of initial results to skip.
    pub offset: u64,
    /// Tenancy scoping, passed through to the translator.
    pub tenant: Tenant,
    /// Spatial filter, passed through to the translator.
    pub geo_query: Option<GeoPredicate>,
}

impl QueryRequest {
    /// Validate raw parameters into a canonical request.
    ///
    /// This is a pure check: no I/O happens here, and a failure is reported
    /// as a classified [`QueryFailure`] so the caller can still produce a
    /// well-formed error response.
    pub fn new(
        entity_type: impl Into<String>,
        params: QueryParams,
        tenant: Tenant,
    ) -> Result<Self, QueryFailure> {
        // The combination rule is checked on the raw text, before the token
        // parses: a period without a method is a usage error even when the
        // period token itself is garbage.
        if params.aggr_period.is_some() && params.aggr_method.is_none() {
            return Err(AggregateError::PeriodWithoutMethod.into());
        }

        let aggr_method = parse_token::<AggrMethod>(params.aggr_method.as_deref())?;
        let aggr_period = parse_token::<AggrPeriod>(params.aggr_period.as_deref())?;
        let aggr_scope = parse_token::<AggrScope>(params.aggr_scope.as_deref())?;
        let options = match params.options.as_deref() {
            Some(raw) => OutputOption::parse_list(raw)?,
            None => Vec::new(),
        };

        let geo_query = GeoPredicate::from_params(
            params.georel.as_deref(),
            params.geometry.as_deref(),
            params.coords.as_deref(),
        )?;

        let last_n = match params.last_n {
            Some(n) if n >= 1 => Some(n as u64),
            Some(_) => return Err(PaginationError::NonPositiveLastN.into()),
            None => None,
        };
        let limit = match params.limit {
            Some(n) if n >= 0 => n as u64,
            Some(_) => return Err(PaginationError::NegativeLimit.into()),
            None => DEFAULT_LIMIT,
        };
        let offset = match params.offset {
            Some(n) if n >= 0 => n as u64,
            Some(_) => return Err(PaginationError::NegativeOffset.into()),
            None => 0,
        };

        Ok(Self {
            entity_type: entity_type.into(),
            entity_ids: params.id.as_deref().map(parse_list).filter(|s| !s.is_empty()),
            attr_names: params
                .attrs
                .as_deref()
                .map(parse_list)
                .filter(|s| !s.is_empty()),
            aggr_method,
            aggr_period,
            aggr_scope,
            options,
            from_date: params.from_date,
            to_date: params.to_date,
            last_n,
            limit,
            offset,
            tenant,
            geo_query,
        })
    }
}

fn parse_token<T: std::str::FromStr>(raw: Option<&str>) -> Result<Option<T>, T::Err> {
    raw.map(str::parse).transpose()
}

/// Split a comma-separated parameter into an ordered set: whitespace
/// trimmed, empty tokens dropped, duplicates collapsed to the first
/// occurrence.
fn parse_list(raw: &str) -> IndexSet<String, FxBuildHasher> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Errors raised while validating the pagination parameters.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// `lastN` only makes sense for one or more samples.
    #[error("lastN must be a positive integer")]
    NonPositiveLastN,
    /// A negative `limit` has no meaning.
    #[error("limit must be a non-negative integer")]
    NegativeLimit,
    /// A negative `offset` has no meaning.
    #[error("offset must be a non-negative integer")]
    NegativeOffset,
}
