use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;

use crate::domain::{IdentifierKind, ItemId};
use crate::error::QsError;

pub const WIKIDATA_SPARQL: &str = "https://query.wikidata.org/sparql";
const SPARQL_JSON: &str = "application/sparql-results+json";
const ENTITY_PREFIX: &str = "http://www.wikidata.org/entity/";

pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str, accept: Option<&str>) -> Result<Option<Vec<u8>>, QsError>;
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub user_agent: String,
    pub timeout: Duration,
    pub strict_tls: bool,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            user_agent: format!("csl-qs/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(30),
            strict_tls: false,
        }
    }
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self, QsError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&settings.user_agent)
                .map_err(|err| QsError::LookupHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout)
            .danger_accept_invalid_certs(!settings.strict_tls)
            .build()
            .map_err(|err| QsError::LookupHttp(err.to_string()))?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, accept: Option<&str>) -> Result<Option<Vec<u8>>, QsError> {
        let mut request = self.client.get(url);
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }
        let response = request
            .send()
            .map_err(|err| QsError::LookupHttp(err.to_string()))?;
        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "lookup request failed".to_string());
            return Err(QsError::LookupStatus {
                status: status.as_u16(),
                message,
            });
        }
        let bytes = response
            .bytes()
            .map_err(|err| QsError::LookupHttp(err.to_string()))?;
        Ok(Some(bytes.to_vec()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenUrlQuery {
    pub issn: String,
    pub volume: String,
    pub first_page: String,
    pub year: i64,
}

pub trait LookupClient: Send + Sync {
    fn lookup(&self, kind: IdentifierKind, value: &str) -> Result<Option<ItemId>, QsError>;

    fn lookup_openurl(&self, query: &OpenUrlQuery) -> Result<Option<ItemId>, QsError>;
}

pub struct SparqlLookup<F: Fetcher> {
    fetcher: F,
    endpoint: String,
}

impl<F: Fetcher> SparqlLookup<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_endpoint(fetcher, WIKIDATA_SPARQL)
    }

    pub fn with_endpoint(fetcher: F, endpoint: &str) -> Self {
        Self {
            fetcher,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    fn select_item(&self, query: &str) -> Result<Option<ItemId>, QsError> {
        let url = format!(
            "{}?format=json&query={}",
            self.endpoint,
            encode_url_component(query)
        );
        let Some(body) = self.fetcher.fetch(&url, Some(SPARQL_JSON))? else {
            return Ok(None);
        };
        first_item(&body)
    }
}

impl<F: Fetcher> LookupClient for SparqlLookup<F> {
    fn lookup(&self, kind: IdentifierKind, value: &str) -> Result<Option<ItemId>, QsError> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }
        let query = identifier_query(kind, value);
        tracing::debug!(%kind, value, "sparql lookup");
        self.select_item(&query)
    }

    fn lookup_openurl(&self, query: &OpenUrlQuery) -> Result<Option<ItemId>, QsError> {
        tracing::debug!(issn = %query.issn, volume = %query.volume, page = %query.first_page, year = query.year, "sparql openurl lookup");
        self.select_item(&openurl_query(query))
    }
}

pub fn wikidata_property(kind: IdentifierKind) -> &'static str {
    match kind {
        IdentifierKind::Doi => "P356",
        IdentifierKind::Pmid => "P698",
        IdentifierKind::Pmc => "P932",
        IdentifierKind::Zoobank => "P2007",
        IdentifierKind::Jstor => "P888",
        IdentifierKind::Handle => "P1184",
        IdentifierKind::Sudoc => "P1025",
        IdentifierKind::Biostor => "P5315",
        IdentifierKind::Cnki => "P6769",
        IdentifierKind::Persee => "P8758",
        IdentifierKind::Dialnet => "P1610",
        IdentifierKind::Cinii => "P2409",
        IdentifierKind::Bhl => "P687",
        IdentifierKind::BhlPart => "P6535",
        IdentifierKind::Archive => "P724",
        IdentifierKind::Pdf | IdentifierKind::Url => "P953",
        IdentifierKind::Issn => "P236",
    }
}

pub fn identifier_query(kind: IdentifierKind, value: &str) -> String {
    let property = wikidata_property(kind);
    let object = if kind.is_url() {
        format!("<{}>", value.replace('>', "%3E"))
    } else if kind == IdentifierKind::Doi {
        // Wikidata stores DOIs upper-cased.
        sparql_string(&value.to_uppercase())
    } else {
        sparql_string(value)
    };
    format!("SELECT ?item WHERE {{ ?item wdt:{property} {object} . }} LIMIT 1")
}

pub fn openurl_query(query: &OpenUrlQuery) -> String {
    let page_pattern = format!("^{}([^0-9]|$)", regex::escape(&query.first_page));
    format!(
        "SELECT ?item WHERE {{ \
         ?journal wdt:P236 {issn} . \
         ?item wdt:P1433 ?journal ; wdt:P478 {volume} ; wdt:P304 ?page ; wdt:P577 ?date . \
         FILTER(REGEX(?page, {pattern})) \
         FILTER(YEAR(?date) = {year}) \
         }} LIMIT 1",
        issn = sparql_string(&query.issn),
        volume = sparql_string(&query.volume),
        pattern = sparql_string(&page_pattern),
        year = query.year,
    )
}

fn sparql_string(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r");
    format!("\"{escaped}\"")
}

#[derive(Debug, Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    bindings: Vec<SparqlBinding>,
}

#[derive(Debug, Deserialize)]
struct SparqlBinding {
    item: Option<SparqlTerm>,
}

#[derive(Debug, Deserialize)]
struct SparqlTerm {
    value: String,
}

pub fn first_item(body: &[u8]) -> Result<Option<ItemId>, QsError> {
    let response: SparqlResponse =
        serde_json::from_slice(body).map_err(|err| QsError::LookupParse(err.to_string()))?;
    let Some(term) = response
        .results
        .bindings
        .into_iter()
        .find_map(|binding| binding.item)
    else {
        return Ok(None);
    };
    let id = term
        .value
        .strip_prefix(ENTITY_PREFIX)
        .unwrap_or(&term.value);
    id.parse()
        .map(Some)
        .map_err(|_| QsError::LookupParse(format!("unexpected item iri {}", term.value)))
}

fn encode_url_component(value: &str) -> String {
    let mut out = String::new();
    for byte in value.as_bytes() {
        let ch = *byte as char;
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.' || ch == '~' {
            out.push(ch);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}
