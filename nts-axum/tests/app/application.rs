use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize};

use nts_core::models::{EntityRecord, QueryFailure, Tenant};
use nts_core::ports::Application;

use super::translator::{InjectedFailure, MemTranslator};

/// Test application: fixture rows partitioned by `Fiware-Service`, plus the
/// counters the assertions read.
#[derive(Clone, Default)]
pub struct TestApp {
    data: Arc<HashMap<Option<String>, Vec<EntityRecord>>>,
    inject: Option<InjectedFailure>,
    pub queries: Arc<AtomicUsize>,
    pub released: Arc<AtomicBool>,
}

impl TestApp {
    /// Rows for the default tenant (no `Fiware-Service` header).
    pub fn with_rows(rows: Vec<EntityRecord>) -> Self {
        Self::with_tenants(HashMap::from([(None, rows)]))
    }

    /// Rows partitioned per service.
    pub fn with_tenants(data: HashMap<Option<String>, Vec<EntityRecord>>) -> Self {
        Self {
            data: Arc::new(data),
            ..Default::default()
        }
    }

    /// An application whose translator fails every query.
    pub fn failing(inject: InjectedFailure) -> Self {
        Self {
            inject: Some(inject),
            ..Default::default()
        }
    }
}

impl Application for TestApp {
    type Translator = MemTranslator;

    async fn translator_for(&self, tenant: &Tenant) -> Result<MemTranslator, QueryFailure> {
        Ok(MemTranslator {
            rows: self.data.get(&tenant.service).cloned().unwrap_or_default(),
            inject: self.inject,
            queries: self.queries.clone(),
            released: self.released.clone(),
        })
    }
}
