mod application;
mod translator;

pub use application::TestApp;
pub use translator::InjectedFailure;

use nts_core::models::EntityRecord;
use serde_json::{Value, json};

/// A storage row shaped the way translators return them: the reserved keys
/// plus one object per attribute. Attribute keys are inserted in the order
/// given, so fixtures can exercise the normalizer's sorting.
pub fn row(id: &str, entity_type: &str, index: &[&str], attrs: &[(&str, Value)]) -> EntityRecord {
    let mut entries = vec![
        ("id".to_owned(), json!(id)),
        ("type".to_owned(), json!(entity_type)),
        ("index".to_owned(), json!(index)),
    ];
    entries.extend(attrs.iter().map(|(name, values)| {
        (
            (*name).to_owned(),
            json!({"values": values, "type": "Number"}),
        )
    }));
    EntityRecord::from_iter(entries)
}
