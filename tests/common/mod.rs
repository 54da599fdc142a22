#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use csl_quickstatements::domain::{IdentifierKind, ItemId};
use csl_quickstatements::error::QsError;
use csl_quickstatements::lookup::{Fetcher, LookupClient, OpenUrlQuery};
use csl_quickstatements::record::Work;

/// In-memory lookup that records every call it receives.
#[derive(Default)]
pub struct MockLookup {
    items: HashMap<(IdentifierKind, String), ItemId>,
    openurl: Vec<(OpenUrlQuery, ItemId)>,
    failing: Vec<IdentifierKind>,
    openurl_failing: bool,
    calls: Mutex<Vec<(IdentifierKind, String)>>,
    openurl_calls: Mutex<Vec<OpenUrlQuery>>,
}

impl MockLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, kind: IdentifierKind, value: &str, item: &str) -> Self {
        self.items
            .insert((kind, value.to_string()), item.parse().unwrap());
        self
    }

    pub fn with_openurl(mut self, query: OpenUrlQuery, item: &str) -> Self {
        self.openurl.push((query, item.parse().unwrap()));
        self
    }

    pub fn failing(mut self, kind: IdentifierKind) -> Self {
        self.failing.push(kind);
        self
    }

    pub fn failing_openurl(mut self) -> Self {
        self.openurl_failing = true;
        self
    }

    pub fn calls(&self) -> Vec<(IdentifierKind, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn openurl_calls(&self) -> Vec<OpenUrlQuery> {
        self.openurl_calls.lock().unwrap().clone()
    }
}

impl LookupClient for MockLookup {
    fn lookup(&self, kind: IdentifierKind, value: &str) -> Result<Option<ItemId>, QsError> {
        self.calls.lock().unwrap().push((kind, value.to_string()));
        if self.failing.contains(&kind) {
            return Err(QsError::LookupHttp("connection reset".to_string()));
        }
        Ok(self.items.get(&(kind, value.to_string())).cloned())
    }

    fn lookup_openurl(&self, query: &OpenUrlQuery) -> Result<Option<ItemId>, QsError> {
        self.openurl_calls.lock().unwrap().push(query.clone());
        if self.openurl_failing {
            return Err(QsError::LookupStatus {
                status: 503,
                message: "query service busy".to_string(),
            });
        }
        Ok(self
            .openurl
            .iter()
            .find(|(known, _)| known == query)
            .map(|(_, item)| item.clone()))
    }
}

/// Returns one canned body for every request and remembers the URLs.
pub struct MockFetcher {
    body: Option<Vec<u8>>,
    pub requests: Mutex<Vec<(String, Option<String>)>>,
}

impl MockFetcher {
    pub fn answering(body: &str) -> Self {
        Self {
            body: Some(body.as_bytes().to_vec()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn not_found() -> Self {
        Self {
            body: None,
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl Fetcher for MockFetcher {
    fn fetch(&self, url: &str, accept: Option<&str>) -> Result<Option<Vec<u8>>, QsError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), accept.map(str::to_string)));
        Ok(self.body.clone())
    }
}

pub fn work(value: serde_json::Value) -> Work {
    serde_json::from_value(value).unwrap()
}
