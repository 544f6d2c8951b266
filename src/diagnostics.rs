//! Passive per-request record of every boundary query the resolver made.

use std::sync::Mutex;

use serde::Serialize;

use crate::arcgis::Exchange;
use crate::registry::EndpointConfig;

/// Which resolution step issued a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    County,
    City,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticRecord {
    pub phase: Phase,
    pub endpoint: EndpointConfig,
    pub exchange: Exchange,
}

/// Collector handed to the resolver for one request.
///
/// When disabled, `record` drops its input and the resolver behaves exactly
/// as it would without a collector.
#[derive(Debug, Default)]
pub struct Diagnostics {
    records: Option<Mutex<Vec<DiagnosticRecord>>>,
}

impl Diagnostics {
    pub fn enabled() -> Self {
        Self {
            records: Some(Mutex::new(Vec::new())),
        }
    }

    pub fn disabled() -> Self {
        Self { records: None }
    }

    pub fn new(enabled: bool) -> Self {
        if enabled {
            Self::enabled()
        } else {
            Self::disabled()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.records.is_some()
    }

    pub fn record(&self, phase: Phase, endpoint: &EndpointConfig, exchange: Exchange) {
        let Some(records) = &self.records else {
            return;
        };

        let record = DiagnosticRecord {
            phase,
            endpoint: endpoint.clone(),
            exchange,
        };

        match records.lock() {
            Ok(mut guard) => guard.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
    }

    /// Snapshot of the records so far, in the order queries completed
    pub fn records(&self) -> Vec<DiagnosticRecord> {
        match &self.records {
            Some(records) => match records.lock() {
                Ok(guard) => guard.clone(),
                Err(poisoned) => poisoned.into_inner().clone(),
            },
            None => Vec::new(),
        }
    }

    pub fn into_records(self) -> Vec<DiagnosticRecord> {
        match self.records {
            Some(records) => records
                .into_inner()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
            None => Vec::new(),
        }
    }
}
