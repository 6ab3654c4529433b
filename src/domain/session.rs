use chrono::{DateTime, Local};

use crate::{
    dal::company_store::{CompanyStore, StoreError},
    domain::company::CompanyRecord,
    services::RefreshReport,
};

/// Outcome of the most recent refresh, shown once above the dashboard.
#[derive(Debug, Clone)]
pub enum RefreshNotice {
    Succeeded(RefreshReport),
    Failed(String),
}

/// Everything the dashboard keeps between requests. Lives for the lifetime
/// of the server; the store file is the only thing that outlives it.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub table: Vec<CompanyRecord>,
    pub last_updated: DateTime<Local>,
    pub last_refresh: Option<RefreshNotice>,
}

impl SessionState {
    pub fn new(table: Vec<CompanyRecord>) -> Self {
        Self {
            table,
            last_updated: Local::now(),
            last_refresh: None,
        }
    }

    pub fn load(store: &CompanyStore) -> Result<Self, StoreError> {
        Ok(Self::new(store.load()?))
    }

    pub fn refreshed(self, table: Vec<CompanyRecord>, report: RefreshReport) -> Self {
        Self {
            table,
            last_updated: Local::now(),
            last_refresh: Some(RefreshNotice::Succeeded(report)),
        }
    }

    /// Table and timestamp stay as they were.
    pub fn refresh_failed(self, reason: String) -> Self {
        Self {
            last_refresh: Some(RefreshNotice::Failed(reason)),
            ..self
        }
    }

    pub fn last_updated_caption(&self) -> String {
        self.last_updated.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> CompanyRecord {
        CompanyRecord {
            name: name.to_string(),
            description: None,
            yc_page: format!("https://www.ycombinator.com/companies/{}", name),
            website: None,
            linkedin_url: None,
            mentions_batch: false,
        }
    }

    #[test]
    fn failed_refresh_keeps_table_and_timestamp() {
        let state = SessionState::new(vec![record("acme")]);
        let before = state.last_updated;

        let state = state.refresh_failed("listing never appeared".to_string());

        assert_eq!(state.table, vec![record("acme")]);
        assert_eq!(state.last_updated, before);
        assert!(matches!(state.last_refresh, Some(RefreshNotice::Failed(_))));
    }

    #[test]
    fn successful_refresh_replaces_table() {
        let state = SessionState::new(vec![record("acme")]);
        let before = state.last_updated;

        let state = state.refreshed(
            vec![record("acme"), record("zenith")],
            RefreshReport::default(),
        );

        assert_eq!(state.table.len(), 2);
        assert!(state.last_updated >= before);
        assert!(matches!(
            state.last_refresh,
            Some(RefreshNotice::Succeeded(_))
        ));
    }
}
