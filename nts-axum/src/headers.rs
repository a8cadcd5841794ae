//! Typed tenancy headers.
//!
//! `Fiware-Service` and `Fiware-ServicePath` scope every storage access to a
//! logical namespace. They are forwarded to the translator untouched; this
//! layer only lifts them out of the header map.

use headers::{Header, HeaderName, HeaderValue};

static FIWARE_SERVICE: HeaderName = HeaderName::from_static("fiware-service");
static FIWARE_SERVICEPATH: HeaderName = HeaderName::from_static("fiware-servicepath");

/// The `Fiware-Service` header: the tenant's service name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiwareService(String);

/// The `Fiware-ServicePath` header: the hierarchical path within a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiwareServicePath(String);

macro_rules! opaque_header {
    ($struct:ident, $name:ident) => {
        impl $struct {
            /// The raw header value.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the header into its raw value.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Header for $struct {
            fn name() -> &'static HeaderName {
                &$name
            }

            fn decode<'i, I>(values: &mut I) -> Result<Self, headers::Error>
            where
                I: Iterator<Item = &'i HeaderValue>,
            {
                let value = values.next().ok_or_else(headers::Error::invalid)?;
                let text = value.to_str().map_err(|_| headers::Error::invalid())?;
                Ok(Self(text.to_owned()))
            }

            fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
                if let Ok(value) = HeaderValue::from_str(&self.0) {
                    values.extend(std::iter::once(value));
                }
            }
        }

        impl From<$struct> for String {
            fn from(header: $struct) -> Self {
                header.0
            }
        }
    };
}

opaque_header!(FiwareService, FIWARE_SERVICE);
opaque_header!(FiwareServicePath, FIWARE_SERVICEPATH);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_takes_first_value() {
        let values = [
            HeaderValue::from_static("smartcity"),
            HeaderValue::from_static("ignored"),
        ];
        let header = FiwareService::decode(&mut values.iter()).unwrap();
        assert_eq!(header.as_str(), "smartcity");
    }

    #[test]
    fn test_decode_requires_a_value() {
        assert!(FiwareServicePath::decode(&mut [].iter()).is_err());
    }

    #[test]
    fn test_roundtrip() {
        let mut encoded: Vec<HeaderValue> = Vec::new();
        FiwareServicePath("/basement".to_owned()).encode(&mut encoded);
        let decoded = FiwareServicePath::decode(&mut encoded.iter()).unwrap();
        assert_eq!(decoded.into_inner(), "/basement");
    }
}
