use crate::domain::{EntityRef, IdentifierKind, ItemId};
use crate::lookup::{LookupClient, OpenUrlQuery};
use crate::record::Message;

#[derive(Clone, Copy)]
enum Source {
    Field,
    PdfLinks,
    Urls,
}

struct LookupStep {
    kind: IdentifierKind,
    source: Source,
}

impl LookupStep {
    const fn field(kind: IdentifierKind) -> Self {
        Self {
            kind,
            source: Source::Field,
        }
    }

    fn values(&self, message: &Message) -> Vec<String> {
        match self.source {
            Source::Field => message.identifier(self.kind).into_iter().collect(),
            Source::PdfLinks => message.pdf_urls(),
            Source::Urls => message.urls(),
        }
    }
}

const RESOLUTION_ORDER: &[LookupStep] = &[
    LookupStep::field(IdentifierKind::Doi),
    LookupStep::field(IdentifierKind::Pmid),
    LookupStep::field(IdentifierKind::Pmc),
    LookupStep::field(IdentifierKind::Zoobank),
    LookupStep::field(IdentifierKind::Jstor),
    LookupStep::field(IdentifierKind::Handle),
    LookupStep::field(IdentifierKind::Sudoc),
    LookupStep::field(IdentifierKind::Biostor),
    LookupStep::field(IdentifierKind::Cnki),
    LookupStep::field(IdentifierKind::Persee),
    LookupStep::field(IdentifierKind::Dialnet),
    LookupStep::field(IdentifierKind::Cinii),
    LookupStep {
        kind: IdentifierKind::Pdf,
        source: Source::PdfLinks,
    },
    LookupStep {
        kind: IdentifierKind::Url,
        source: Source::Urls,
    },
];

pub fn resolution_order() -> Vec<IdentifierKind> {
    RESOLUTION_ORDER.iter().map(|step| step.kind).collect()
}

pub struct IdentifierResolver<'a, L: LookupClient> {
    lookup: &'a L,
}

impl<'a, L: LookupClient> IdentifierResolver<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Self { lookup }
    }

    pub fn resolve_entity(&self, message: &Message) -> EntityRef {
        for step in RESOLUTION_ORDER {
            for value in step.values(message) {
                if let Some(item) = self.find_item(step.kind, &value) {
                    tracing::debug!(kind = %step.kind, %value, %item, "matched existing item");
                    return EntityRef::Existing(item);
                }
            }
        }

        match OpenUrlQuery::from_message(message) {
            Some(query) => self.resolve_openurl(&query).into(),
            None => EntityRef::PendingCreation,
        }
    }

    pub fn resolve_doi(&self, doi: &str) -> Option<ItemId> {
        self.find_item(IdentifierKind::Doi, doi)
    }

    pub fn resolve_openurl(&self, query: &OpenUrlQuery) -> Option<ItemId> {
        match self.lookup.lookup_openurl(query) {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(error = %err, issn = %query.issn, "openurl lookup failed; treating as no match");
                None
            }
        }
    }

    pub fn resolve_journal(&self, issns: &[String]) -> Option<ItemId> {
        issns
            .iter()
            .find_map(|issn| self.find_item(IdentifierKind::Issn, issn))
    }

    fn find_item(&self, kind: IdentifierKind, value: &str) -> Option<ItemId> {
        match self.lookup.lookup(kind, value) {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(error = %err, %kind, value, "lookup failed; treating as no match");
                None
            }
        }
    }
}

impl OpenUrlQuery {
    pub fn from_message(message: &Message) -> Option<Self> {
        let issn = message.issns().into_iter().next()?;
        let volume = message.volume.as_ref()?.to_string();
        let first_page = leading_digits(&message.page.as_ref()?.to_string())?;
        let year = message.date_parts()?.year;
        if issn.trim().is_empty() || volume.trim().is_empty() {
            return None;
        }
        Some(Self {
            issn,
            volume,
            first_page,
            year,
        })
    }
}

fn leading_digits(value: &str) -> Option<String> {
    let digits: String = value.chars().take_while(|ch| ch.is_ascii_digit()).collect();
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}
