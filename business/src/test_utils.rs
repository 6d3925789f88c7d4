//! In-memory [`OutpostsClient`] for unit tests.
//!
//! Keeps outposts in a `Vec`, answers list requests with search, ordering and
//! paging applied, and records every call so tests can assert on traffic.

#![cfg(test)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use outposts_states::{ApiError, PageRequest};
use ustr::Ustr;

use crate::{
    Outpost, OutpostHealth, OutpostRequest, OutpostType, OutpostsClient, Paginated, Pagination,
    ProviderRef,
};

/// Builds an outpost with the given providers.
pub fn outpost(pk: &str, name: &str, providers: &[(u32, &str)]) -> Outpost {
    Outpost {
        pk: Ustr::from(pk),
        name: name.to_owned(),
        outpost_type: OutpostType::Proxy,
        providers: providers.iter().map(|(pk, _)| *pk).collect(),
        providers_obj: providers
            .iter()
            .map(|(pk, name)| ProviderRef {
                pk: *pk,
                name: (*name).to_owned(),
            })
            .collect(),
        service_connection: None,
        token_identifier: format!("ak-outpost-{pk}-api"),
        config: serde_json::json!({}),
    }
}

pub fn health(version: &str, version_should: &str) -> OutpostHealth {
    OutpostHealth {
        last_seen: Utc.with_ymd_and_hms(2021, 3, 1, 12, 0, 0).unwrap(),
        version: version.to_owned(),
        version_should: version_should.to_owned(),
        version_outdated: version != version_should,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(PageRequest),
    Retrieve(Ustr),
    Create(String),
    Update(Ustr),
    Delete(Ustr),
    Health(Ustr),
    ViewKey(String),
}

#[derive(Default)]
pub struct MemoryOutposts {
    records: Mutex<Vec<Outpost>>,
    health: Mutex<Vec<OutpostHealth>>,
    calls: Mutex<Vec<Call>>,
    fail_next: Mutex<Option<ApiError>>,
}

impl MemoryOutposts {
    pub fn with(records: Vec<Outpost>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    /// The next call of any kind fails with `err`.
    pub fn fail_next(&self, err: ApiError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    pub fn set_health(&self, reports: Vec<OutpostHealth>) {
        *self.health.lock().unwrap() = reports;
    }

    pub fn remove(&self, pk: &str) {
        self.records.lock().unwrap().retain(|o| o.pk.as_str() != pk);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::List(_)))
            .count()
    }

    pub fn names(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|o| o.name.clone())
            .collect()
    }

    fn record(&self, call: Call) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        match self.fail_next.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl OutpostsClient for MemoryOutposts {
    async fn list(&self, params: &PageRequest) -> Result<Paginated<Outpost>, ApiError> {
        self.record(Call::List(params.clone()))?;

        let mut matching: Vec<Outpost> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.name.contains(&params.search))
            .cloned()
            .collect();
        match params.ordering.as_deref() {
            Some("name") => matching.sort_by(|a, b| a.name.cmp(&b.name)),
            Some("-name") => matching.sort_by(|a, b| b.name.cmp(&a.name)),
            _ => {}
        }

        let count = matching.len() as u64;
        let size = params.page_size as usize;
        let start = (params.page as usize - 1) * size;
        let results: Vec<Outpost> = matching.into_iter().skip(start).take(size).collect();
        Ok(Paginated {
            pagination: Pagination {
                count,
                current: params.page,
                total_pages: outposts_states::total_pages(count, params.page_size),
                ..Pagination::default()
            },
            results,
        })
    }

    async fn retrieve(&self, pk: Ustr) -> Result<Outpost, ApiError> {
        self.record(Call::Retrieve(pk))?;
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.pk == pk)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn create(&self, body: &OutpostRequest) -> Result<Outpost, ApiError> {
        self.record(Call::Create(body.name.clone()))?;
        let mut records = self.records.lock().unwrap();
        let created = Outpost {
            pk: ustr::ustr(&format!("pk-{}", records.len() + 1)),
            name: body.name.clone(),
            outpost_type: body.outpost_type,
            providers: body.providers.clone(),
            providers_obj: Vec::new(),
            service_connection: body.service_connection,
            token_identifier: String::new(),
            config: body.config.clone(),
        };
        records.push(created.clone());
        Ok(created)
    }

    async fn update(&self, pk: Ustr, body: &OutpostRequest) -> Result<Outpost, ApiError> {
        self.record(Call::Update(pk))?;
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|o| o.pk == pk)
            .ok_or(ApiError::NotFound)?;
        record.name = body.name.clone();
        record.outpost_type = body.outpost_type;
        record.providers = body.providers.clone();
        record.service_connection = body.service_connection;
        record.config = body.config.clone();
        Ok(record.clone())
    }

    async fn delete(&self, pk: Ustr) -> Result<(), ApiError> {
        self.record(Call::Delete(pk))?;
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|o| o.pk != pk);
        if records.len() == before {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }

    async fn health(&self, pk: Ustr) -> Result<Vec<OutpostHealth>, ApiError> {
        self.record(Call::Health(pk))?;
        Ok(self.health.lock().unwrap().clone())
    }

    async fn view_token_key(&self, identifier: &str) -> Result<String, ApiError> {
        self.record(Call::ViewKey(identifier.to_owned()))?;
        Ok(format!("key-of-{identifier}"))
    }
}
