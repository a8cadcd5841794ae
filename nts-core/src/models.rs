mod aggregate;
mod failure;
mod geo;
mod query;
mod record;
mod response;

pub use aggregate::{AggrMethod, AggrPeriod, AggrScope, AggregateError, OutputOption};
pub use failure::QueryFailure;
pub use geo::{GeoError, GeoPredicate, GeoRelation, Geometry};
pub use query::{DEFAULT_LIMIT, PaginationError, QueryParams, QueryRequest, Tenant};
pub use record::EntityRecord;
pub use response::{AttributeValues, ResponseEntity, TypeResponse, ValuesResponse};
