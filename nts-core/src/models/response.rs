use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use super::{EntityRecord, QueryRequest};

/// One attribute of a response entity: its name and the bare values array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct AttributeValues {
    /// Attribute name as stored.
    pub attr_name: String,
    /// Per-sample (or per-bucket) values; any other metadata the storage
    /// row carried is dropped.
    pub values: Vec<Value>,
}

/// One entity of a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ResponseEntity {
    /// The entity id.
    pub entity_id: String,
    /// The time axis: per-sample (or per-bucket) timestamps, or the
    /// two-element `[from, to]` window when aggregation collapsed the
    /// series into a single bucket.
    pub index: Vec<Value>,
    /// The entity's attributes, alphabetically sorted by name.
    pub attributes: Vec<AttributeValues>,
}

/// The response of the historical query for one entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct TypeResponse {
    /// The queried entity type.
    pub entity_type: String,
    /// The matching entities.
    pub entities: Vec<ResponseEntity>,
}

/// The values-only variant of [`TypeResponse`].
///
/// Identical entity content; the entity type is dropped and the key is
/// renamed to `values`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct ValuesResponse {
    /// The matching entities.
    pub values: Vec<ResponseEntity>,
}

impl TypeResponse {
    /// Normalize storage rows into the external response shape.
    ///
    /// The attribute list of each entity is re-derived from the row itself
    /// (sorted, reserved keys excluded) rather than from the request's
    /// `attrs` filter, so the response always reflects what storage actually
    /// returned. The index diverges on aggregation: a method without a
    /// period collapses the series, so the row's own index is replaced by
    /// the requested `[from, to]` window.
    pub fn build(records: &[EntityRecord], request: &QueryRequest) -> Self {
        let window = (request.aggr_method.is_some() && request.aggr_period.is_none()).then(|| {
            vec![
                Value::String(normalize_window_bound(request.from_date.as_deref())),
                Value::String(normalize_window_bound(request.to_date.as_deref())),
            ]
        });

        let entities = records
            .iter()
            .map(|record| {
                let attributes = record
                    .attribute_names()
                    .into_iter()
                    .map(|name| AttributeValues {
                        attr_name: name.to_owned(),
                        values: record.values_of(name),
                    })
                    .collect();
                let index = match &window {
                    Some(window) => window.clone(),
                    None => record.index().map(<[Value]>::to_vec).unwrap_or_default(),
                };
                ResponseEntity {
                    entity_id: record.id().unwrap_or_default().to_owned(),
                    index,
                    attributes,
                }
            })
            .collect();

        Self {
            entity_type: request.entity_type.clone(),
            entities,
        }
    }

    /// Convert into the values-only response variant.
    pub fn into_values(self) -> ValuesResponse {
        ValuesResponse {
            values: self.entities,
        }
    }
}

/// Render one bound of the aggregation window as a UTC RFC 3339 instant.
///
/// The window is best-effort metadata: an absent or unparseable bound
/// degrades to an empty string and never fails the response.
fn normalize_window_bound(raw: Option<&str>) -> String {
    raw.and_then(parse_instant)
        .and_then(|instant| instant.format(&Rfc3339).ok())
        .unwrap_or_default()
}

/// Parse an ISO 8601 instant, assuming UTC when no offset is given and
/// midnight when only a date is given.
fn parse_instant(raw: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(raw, &Iso8601::DEFAULT)
        .map(|instant| instant.to_offset(UtcOffset::UTC))
        .or_else(|_| {
            PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT).map(PrimitiveDateTime::assume_utc)
        })
        .or_else(|_| {
            Date::parse(raw, &Iso8601::DEFAULT).map(|date| date.midnight().assume_utc())
        })
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{QueryParams, Tenant};
    use serde_json::json;

    fn record(id: &str, attrs: &[(&str, Value)]) -> EntityRecord {
        let mut entries = vec![
            ("id".to_owned(), json!(id)),
            ("type".to_owned(), json!("Room")),
            (
                "index".to_owned(),
                json!(["2024-03-01T00:00:00Z", "2024-03-01T01:00:00Z"]),
            ),
        ];
        entries.extend(
            attrs
                .iter()
                .map(|(name, values)| ((*name).to_owned(), json!({"values": values}))),
        );
        EntityRecord::from_iter(entries)
    }

    fn request(params: QueryParams) -> QueryRequest {
        QueryRequest::new("Room", params, Tenant::default()).unwrap()
    }

    #[test]
    fn test_raw_index_passes_through() {
        let records = [record("Room1", &[("temperature", json!([20, 21]))])];
        let response = TypeResponse::build(&records, &request(QueryParams::default()));
        assert_eq!(response.entity_type, "Room");
        assert_eq!(
            response.entities[0].index,
            vec![json!("2024-03-01T00:00:00Z"), json!("2024-03-01T01:00:00Z")]
        );
    }

    #[test]
    fn test_periodic_aggregation_keeps_row_index() {
        let records = [record("Room1", &[("temperature", json!([20.5]))])];
        let params = QueryParams {
            aggr_method: Some("avg".to_owned()),
            aggr_period: Some("hour".to_owned()),
            from_date: Some("2024-03-01T00:00:00Z".to_owned()),
            to_date: Some("2024-03-02T00:00:00Z".to_owned()),
            ..Default::default()
        };
        let response = TypeResponse::build(&records, &request(params));
        assert_eq!(
            response.entities[0].index,
            vec![json!("2024-03-01T00:00:00Z"), json!("2024-03-01T01:00:00Z")]
        );
    }

    #[test]
    fn test_collapsed_aggregation_replaces_index_with_window() {
        let records = [record("Room1", &[("temperature", json!([20.5]))])];
        let params = QueryParams {
            aggr_method: Some("avg".to_owned()),
            from_date: Some("2024-03-01T00:00:00+01:00".to_owned()),
            to_date: Some("2024-03-02T12:30:00".to_owned()),
            ..Default::default()
        };
        let response = TypeResponse::build(&records, &request(params));
        assert_eq!(
            response.entities[0].index,
            vec![
                json!("2024-02-29T23:00:00Z"),
                json!("2024-03-02T12:30:00Z"),
            ]
        );
    }

    #[test]
    fn test_unparseable_window_bound_degrades_to_empty_string() {
        let records = [record("Room1", &[("temperature", json!([20.5]))])];
        let params = QueryParams {
            aggr_method: Some("max".to_owned()),
            from_date: Some("not-a-date".to_owned()),
            ..Default::default()
        };
        let response = TypeResponse::build(&records, &request(params));
        assert_eq!(response.entities[0].index, vec![json!(""), json!("")]);
    }

    #[test]
    fn test_attributes_sorted_and_projected() {
        let records = [record(
            "Room1",
            &[
                ("pressure", json!([1008])),
                ("humidity", json!([40])),
                ("temperature", json!([21])),
            ],
        )];
        let response = TypeResponse::build(&records, &request(QueryParams::default()));
        let names: Vec<&str> = response.entities[0]
            .attributes
            .iter()
            .map(|attr| attr.attr_name.as_str())
            .collect();
        assert_eq!(names, ["humidity", "pressure", "temperature"]);
    }

    #[test]
    fn test_values_variant_keeps_entity_content() {
        let records = [
            record("Room1", &[("temperature", json!([20]))]),
            record("Room2", &[("temperature", json!([23]))]),
        ];
        let response = TypeResponse::build(&records, &request(QueryParams::default()));
        let values = response.clone().into_values();
        assert_eq!(values.values, response.entities);

        let rendered = serde_json::to_value(&values).unwrap();
        assert!(rendered.get("entityType").is_none());
        assert!(rendered.get("values").is_some());
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let records = [record("Room1", &[("temperature", json!([20]))])];
        let response = TypeResponse::build(&records, &request(QueryParams::default()));
        let rendered = serde_json::to_value(&response).unwrap();
        assert_eq!(rendered["entityType"], json!("Room"));
        assert_eq!(rendered["entities"][0]["entityId"], json!("Room1"));
        assert_eq!(
            rendered["entities"][0]["attributes"][0]["attrName"],
            json!("temperature")
        );
    }

    #[test]
    fn test_date_only_bound_normalizes_to_midnight() {
        assert_eq!(
            normalize_window_bound(Some("2024-03-01")),
            "2024-03-01T00:00:00Z"
        );
    }
}
