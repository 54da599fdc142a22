use serde_json::Value as Json;

use crate::config::ResolvedConfig;
use crate::domain::{ItemId, Statement, Value};
use crate::error::QsError;
use crate::lookup::{LookupClient, OpenUrlQuery};
use crate::record::{Message, Reference};
use crate::resolver::IdentifierResolver;

const CROSSREF_ISSN_PREFIX: &str = "http://id.crossref.org/issn/";

pub struct ReferenceProcessor<'a, L: LookupClient> {
    config: &'a ResolvedConfig,
    resolver: IdentifierResolver<'a, L>,
}

impl<'a, L: LookupClient> ReferenceProcessor<'a, L> {
    pub fn new(config: &'a ResolvedConfig, lookup: &'a L) -> Self {
        Self {
            config,
            resolver: IdentifierResolver::new(lookup),
        }
    }

    pub fn map_references(&self, message: &Message) -> Result<Vec<Statement>, QsError> {
        let Some(raw) = &message.reference else {
            return Ok(Vec::new());
        };
        let Json::Array(entries) = raw else {
            tracing::warn!("reference field is not a list; skipping citations");
            return Ok(Vec::new());
        };

        let property = self.config.property("reference")?;
        let mut statements = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            let reference: Reference = match serde_json::from_value(entry.clone()) {
                Ok(reference) => reference,
                Err(err) => {
                    tracing::debug!(index, error = %err, "skipping malformed reference");
                    continue;
                }
            };
            if let Some(cited) = self.resolve_reference(&reference) {
                statements.push(Statement::new(property.clone(), Value::Item(cited)));
            }
        }
        Ok(statements)
    }

    fn resolve_reference(&self, reference: &Reference) -> Option<ItemId> {
        if let Some(doi) = reference.doi.as_deref().filter(|doi| !doi.trim().is_empty()) {
            return self.resolver.resolve_doi(doi);
        }
        if reference.issn.is_some() {
            return reference_query(reference).and_then(|query| self.resolver.resolve_openurl(&query));
        }
        // Unstructured references and anything else have no reliable match.
        None
    }
}

pub fn reference_query(reference: &Reference) -> Option<OpenUrlQuery> {
    let issn = reference.issn.as_deref()?;
    let issn = issn.strip_prefix(CROSSREF_ISSN_PREFIX).unwrap_or(issn).trim();
    let volume = reference.volume.as_ref()?.to_string();
    let first_page = reference.first_page.as_ref()?.to_string();
    let year = reference.year.as_ref()?.as_integer()?;
    if issn.is_empty() || volume.trim().is_empty() || first_page.trim().is_empty() {
        return None;
    }
    Some(OpenUrlQuery {
        issn: issn.to_string(),
        volume,
        first_page,
        year,
    })
}
