use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Spatial relation of a geo query.
///
/// `near` carries its distance qualifiers; all other relations take none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoRelation {
    /// Entity geometry equals the reference shape.
    Equals,
    /// Entity geometry shares no point with the reference shape.
    Disjoint,
    /// Entity geometry shares at least one point with the reference shape.
    Intersects,
    /// Entity geometry lies inside the reference shape.
    Within,
    /// Entity geometry contains the reference shape.
    Contains,
    /// Entity geometry overlaps the reference shape.
    Overlaps,
    /// Entity geometry crosses the reference shape.
    Crosses,
    /// Entity geometry touches the boundary of the reference shape.
    Touches,
    /// Entity geometry lies within a distance band around the reference
    /// shape. At least one bound must be given.
    Near {
        /// Lower bound of the band, in meters.
        min_distance: Option<f64>,
        /// Upper bound of the band, in meters.
        max_distance: Option<f64>,
    },
}

/// Kind of reference shape a geo query is expressed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Geometry {
    /// A single coordinate pair.
    Point,
    /// A polyline of two or more pairs.
    Line,
    /// A closed ring of three or more pairs.
    Polygon,
    /// An axis-aligned box given by two opposite corners.
    Box,
}

impl Geometry {
    fn as_str(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Line => "line",
            Self::Polygon => "polygon",
            Self::Box => "box",
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Geometry {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "point" => Ok(Self::Point),
            "line" => Ok(Self::Line),
            "polygon" => Ok(Self::Polygon),
            "box" => Ok(Self::Box),
            other => Err(GeoError::UnknownGeometry(other.to_owned())),
        }
    }
}

/// A validated geospatial filter.
///
/// The predicate is syntactic only: relation, shape kind, and coordinate
/// pairs, checked for arity and well-formedness. It is handed to the storage
/// translator unmodified; interpreting it is the translator's business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPredicate {
    /// The spatial relation, including any distance qualifiers.
    pub relation: GeoRelation,
    /// The kind of reference shape the coordinates describe.
    pub geometry: Geometry,
    /// The coordinate pairs, in input order. Polygon rings are closed.
    pub coords: Vec<[f64; 2]>,
}

impl GeoPredicate {
    /// Build a predicate from the `georel`/`geometry`/`coords` parameter
    /// triple.
    ///
    /// The three parameters must be given together or not at all; all-absent
    /// yields `Ok(None)`, a partial combination is a usage error.
    pub fn from_params(
        georel: Option<&str>,
        geometry: Option<&str>,
        coords: Option<&str>,
    ) -> Result<Option<Self>, GeoError> {
        match (georel, geometry, coords) {
            (None, None, None) => Ok(None),
            (Some(georel), Some(geometry), Some(coords)) => {
                Self::build(georel, geometry, coords).map(Some)
            }
            _ => Err(GeoError::PartialSpecification),
        }
    }

    fn build(georel: &str, geometry: &str, coords: &str) -> Result<Self, GeoError> {
        let relation = parse_relation(georel)?;
        let geometry = geometry.parse::<Geometry>()?;
        let mut coords = parse_coords(coords)?;

        let (minimum, maximum) = match geometry {
            Geometry::Point => (1, Some(1)),
            Geometry::Box => (2, Some(2)),
            Geometry::Line => (2, None),
            Geometry::Polygon => (3, None),
        };
        if coords.len() < minimum || maximum.is_some_and(|max| coords.len() > max) {
            return Err(GeoError::CoordinateArity {
                geometry,
                actual: coords.len(),
            });
        }

        // Polygon rings must be closed; callers may send them open.
        if geometry == Geometry::Polygon && coords.first() != coords.last() {
            coords.push(coords[0]);
        }

        Ok(Self {
            relation,
            geometry,
            coords,
        })
    }
}

/// Split `georel` into the relation name and its `key:value` modifiers.
fn parse_relation(raw: &str) -> Result<GeoRelation, GeoError> {
    let mut parts = raw.split(';');
    let name = parts.next().unwrap_or_default();

    let mut min_distance = None;
    let mut max_distance = None;
    for modifier in parts {
        let (key, value) = modifier
            .split_once(':')
            .ok_or_else(|| GeoError::InvalidModifier(modifier.to_owned()))?;
        let distance = value
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite() && *d >= 0.0)
            .ok_or_else(|| GeoError::InvalidModifier(modifier.to_owned()))?;
        match key {
            "minDistance" => min_distance = Some(distance),
            "maxDistance" => max_distance = Some(distance),
            _ => return Err(GeoError::InvalidModifier(modifier.to_owned())),
        }
    }

    let relation = match name {
        "equals" => GeoRelation::Equals,
        "disjoint" => GeoRelation::Disjoint,
        "intersects" => GeoRelation::Intersects,
        "within" => GeoRelation::Within,
        "contains" => GeoRelation::Contains,
        "overlaps" => GeoRelation::Overlaps,
        "crosses" => GeoRelation::Crosses,
        "touches" => GeoRelation::Touches,
        "near" => {
            if min_distance.is_none() && max_distance.is_none() {
                return Err(GeoError::MissingDistance);
            }
            return Ok(GeoRelation::Near {
                min_distance,
                max_distance,
            });
        }
        other => return Err(GeoError::UnknownRelation(other.to_owned())),
    };

    // Distance qualifiers only make sense on `near`.
    if min_distance.is_some() || max_distance.is_some() {
        return Err(GeoError::UnexpectedModifier);
    }
    Ok(relation)
}

/// Split `coords` into numeric pairs: pairs on `;`, components on `,`.
fn parse_coords(raw: &str) -> Result<Vec<[f64; 2]>, GeoError> {
    raw.split(';')
        .map(|pair| {
            let mut components = pair.split(',');
            let (Some(first), Some(second), None) =
                (components.next(), components.next(), components.next())
            else {
                return Err(GeoError::InvalidCoordinate(pair.to_owned()));
            };
            let parse = |text: &str| {
                text.trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .ok_or_else(|| GeoError::InvalidCoordinate(pair.to_owned()))
            };
            Ok([parse(first)?, parse(second)?])
        })
        .collect()
}

/// Errors raised while building a [`GeoPredicate`].
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum GeoError {
    /// Only some of `georel`/`geometry`/`coords` were supplied.
    #[error("georel, geometry and coords must be provided together")]
    PartialSpecification,
    /// The `georel` token names no supported relation.
    #[error("unknown geo relation: {0}")]
    UnknownRelation(String),
    /// The `geometry` token names no supported shape kind.
    #[error("unknown geometry: {0}")]
    UnknownGeometry(String),
    /// A `georel` modifier was malformed, negative, or unrecognized.
    #[error("invalid georel modifier: {0}")]
    InvalidModifier(String),
    /// `near` was given without a distance bound to evaluate.
    #[error("georel 'near' requires a maxDistance or minDistance modifier")]
    MissingDistance,
    /// A distance qualifier was attached to a relation other than `near`.
    #[error("distance modifiers are only valid with georel 'near'")]
    UnexpectedModifier,
    /// A coordinate token was not a pair of finite numbers.
    #[error("invalid coordinate pair: {0}")]
    InvalidCoordinate(String),
    /// The number of coordinate pairs does not fit the geometry kind.
    #[error("geometry '{geometry}' cannot be described by {actual} coordinate pair(s)")]
    CoordinateArity {
        /// The shape kind whose arity rule was violated.
        geometry: Geometry,
        /// How many pairs were actually supplied.
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_absent_is_no_predicate() {
        assert_eq!(GeoPredicate::from_params(None, None, None), Ok(None));
    }

    #[test]
    fn test_partial_triple_is_rejected() {
        assert_eq!(
            GeoPredicate::from_params(Some("near;maxDistance:10"), None, None),
            Err(GeoError::PartialSpecification)
        );
        assert_eq!(
            GeoPredicate::from_params(None, Some("point"), Some("0,0")),
            Err(GeoError::PartialSpecification)
        );
    }

    #[test]
    fn test_near_point() {
        let predicate =
            GeoPredicate::from_params(Some("near;maxDistance:1000"), Some("point"), Some("40.1,-3.2"))
                .unwrap()
                .unwrap();
        assert_eq!(
            predicate.relation,
            GeoRelation::Near {
                min_distance: None,
                max_distance: Some(1000.0),
            }
        );
        assert_eq!(predicate.geometry, Geometry::Point);
        assert_eq!(predicate.coords, vec![[40.1, -3.2]]);
    }

    #[test]
    fn test_point_arity() {
        // Three components are not a pair.
        assert_eq!(
            GeoPredicate::from_params(Some("near;maxDistance:1000"), Some("point"), Some("1,2,3")),
            Err(GeoError::InvalidCoordinate("1,2,3".to_owned()))
        );
        // Two pairs are one too many for a point.
        assert_eq!(
            GeoPredicate::from_params(Some("near;maxDistance:1000"), Some("point"), Some("1,2;3,4")),
            Err(GeoError::CoordinateArity {
                geometry: Geometry::Point,
                actual: 2,
            })
        );
    }

    #[test]
    fn test_box_takes_exactly_two_corners() {
        let predicate =
            GeoPredicate::from_params(Some("within"), Some("box"), Some("0,0;10,10"))
                .unwrap()
                .unwrap();
        assert_eq!(predicate.coords.len(), 2);

        assert_eq!(
            GeoPredicate::from_params(Some("within"), Some("box"), Some("0,0")),
            Err(GeoError::CoordinateArity {
                geometry: Geometry::Box,
                actual: 1,
            })
        );
    }

    #[test]
    fn test_polygon_ring_is_closed() {
        let open = GeoPredicate::from_params(
            Some("intersects"),
            Some("polygon"),
            Some("0,0;0,4;4,0"),
        )
        .unwrap()
        .unwrap();
        assert_eq!(open.coords.len(), 4);
        assert_eq!(open.coords.first(), open.coords.last());

        // Pre-closed input is left alone.
        let closed = GeoPredicate::from_params(
            Some("intersects"),
            Some("polygon"),
            Some("0,0;0,4;4,0;0,0"),
        )
        .unwrap()
        .unwrap();
        assert_eq!(closed.coords.len(), 4);
    }

    #[test]
    fn test_near_requires_a_distance() {
        assert_eq!(
            GeoPredicate::from_params(Some("near"), Some("point"), Some("0,0")),
            Err(GeoError::MissingDistance)
        );
    }

    #[test]
    fn test_modifiers_only_on_near() {
        assert_eq!(
            GeoPredicate::from_params(Some("within;maxDistance:5"), Some("point"), Some("0,0")),
            Err(GeoError::UnexpectedModifier)
        );
    }

    #[test]
    fn test_bad_modifiers() {
        for georel in ["near;maxDistance", "near;maxDistance:abc", "near;maxDistance:-1", "near;radius:5"] {
            let result = GeoPredicate::from_params(Some(georel), Some("point"), Some("0,0"));
            assert!(
                matches!(result, Err(GeoError::InvalidModifier(_))),
                "{georel} should be rejected, got {result:?}"
            );
        }
    }

    #[test]
    fn test_malformed_coordinates() {
        for coords in ["abc,1", "1", "1,NaN", "1,inf", ""] {
            let result =
                GeoPredicate::from_params(Some("near;maxDistance:10"), Some("point"), Some(coords));
            assert!(
                matches!(result, Err(GeoError::InvalidCoordinate(_))),
                "{coords:?} should be rejected, got {result:?}"
            );
        }
    }

    #[test]
    fn test_unknown_tokens() {
        assert_eq!(
            GeoPredicate::from_params(Some("besides"), Some("point"), Some("0,0")),
            Err(GeoError::UnknownRelation("besides".to_owned()))
        );
        assert_eq!(
            GeoPredicate::from_params(Some("within"), Some("circle"), Some("0,0")),
            Err(GeoError::UnknownGeometry("circle".to_owned()))
        );
    }
}
