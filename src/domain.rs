use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::QsError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = QsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_uppercase();
        let is_valid = normalized
            .strip_prefix('Q')
            .map(|rest| !rest.is_empty() && rest.chars().all(|ch| ch.is_ascii_digit()))
            .unwrap_or(false);
        if !is_valid {
            return Err(QsError::InvalidItemId(value.to_string()));
        }
        Ok(Self(normalized))
    }
}

impl TryFrom<String> for ItemId {
    type Error = QsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ItemId> for String {
    fn from(value: ItemId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PropertyId(String);

impl PropertyId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn label(language: &str) -> Result<Self, QsError> {
        format!("L{language}").parse()
    }

    pub fn description(language: &str) -> Result<Self, QsError> {
        format!("D{language}").parse()
    }

    pub fn is_term(&self) -> bool {
        self.0.starts_with(['L', 'D', 'A'])
    }

    pub fn source_code(&self) -> String {
        format!("S{}", &self.0[1..])
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PropertyId {
    type Err = QsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let mut chars = trimmed.chars();
        let valid = match chars.next() {
            Some('P') => {
                let rest = chars.as_str();
                !rest.is_empty() && rest.chars().all(|ch| ch.is_ascii_digit())
            }
            Some('L' | 'D' | 'A') => is_language_code(chars.as_str()),
            _ => false,
        };
        if !valid {
            return Err(QsError::InvalidPropertyId(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl TryFrom<String> for PropertyId {
    type Error = QsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PropertyId> for String {
    fn from(value: PropertyId) -> Self {
        value.0
    }
}

pub fn is_language_code(value: &str) -> bool {
    let mut parts = value.split('-');
    let primary = parts.next().unwrap_or_default();
    let primary_ok = (2..=3).contains(&primary.len())
        && primary.chars().all(|ch| ch.is_ascii_lowercase());
    primary_ok
        && parts.all(|part| !part.is_empty() && part.chars().all(|ch| ch.is_ascii_alphanumeric()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Item(ItemId),
    Text(String),
    Monolingual { language: String, text: String },
    Time(String),
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    pub fn day(date: NaiveDate) -> Self {
        Value::Time(format!(
            "+{}-{:02}-{:02}T00:00:00Z/11",
            date.year(),
            date.month(),
            date.day()
        ))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Item(id) => write!(f, "{id}"),
            Value::Text(text) => write!(f, "\"{text}\""),
            Value::Monolingual { language, text } => write!(f, "{language}:\"{text}\""),
            Value::Time(literal) => write!(f, "{literal}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub property: PropertyId,
    pub value: Value,
    pub qualifiers: Vec<(PropertyId, Value)>,
}

impl Statement {
    pub fn new(property: PropertyId, value: Value) -> Self {
        Self {
            property,
            value,
            qualifiers: Vec::new(),
        }
    }

    pub fn with_qualifier(mut self, property: PropertyId, value: Value) -> Self {
        self.qualifiers.push((property, value));
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    pairs: Vec<(PropertyId, Value)>,
}

impl Provenance {
    pub fn parse_pairs<S: AsRef<str>>(values: &[S]) -> Result<Self, QsError> {
        let pairs = values
            .iter()
            .map(|value| parse_source_pair(value.as_ref()))
            .collect::<Result<Vec<_>, QsError>>()?;
        Ok(Self { pairs })
    }

    pub fn retrieved_on(mut self, date: NaiveDate) -> Self {
        self.pairs
            .push((PropertyId("P813".to_string()), Value::day(date)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(PropertyId, Value)] {
        &self.pairs
    }
}

fn parse_source_pair(raw: &str) -> Result<(PropertyId, Value), QsError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| QsError::InvalidProvenance(raw.to_string()))?;
    let key = key.trim();
    let number = key
        .strip_prefix('S')
        .or_else(|| key.strip_prefix('P'))
        .ok_or_else(|| QsError::InvalidProvenance(raw.to_string()))?;
    let property: PropertyId = format!("P{number}")
        .parse()
        .map_err(|_| QsError::InvalidProvenance(raw.to_string()))?;

    let value = value.trim();
    if value.is_empty() {
        return Err(QsError::InvalidProvenance(raw.to_string()));
    }
    let parsed = if let Ok(item) = value.parse::<ItemId>() {
        Value::Item(item)
    } else if value.starts_with('+') {
        Value::Time(value.to_string())
    } else {
        Value::Text(value.trim_matches('"').to_string())
    };
    Ok((property, parsed))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRef {
    Existing(ItemId),
    PendingCreation,
}

impl EntityRef {
    pub fn placeholder(&self) -> &str {
        match self {
            EntityRef::Existing(id) => id.as_str(),
            EntityRef::PendingCreation => "LAST",
        }
    }

    pub fn existing(&self) -> Option<&ItemId> {
        match self {
            EntityRef::Existing(id) => Some(id),
            EntityRef::PendingCreation => None,
        }
    }
}

impl From<Option<ItemId>> for EntityRef {
    fn from(value: Option<ItemId>) -> Self {
        value.map_or(EntityRef::PendingCreation, EntityRef::Existing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdentifierKind {
    Doi,
    Pmid,
    Pmc,
    Zoobank,
    Jstor,
    Handle,
    Sudoc,
    Biostor,
    Cnki,
    Persee,
    Dialnet,
    Cinii,
    Bhl,
    BhlPart,
    Archive,
    Pdf,
    Url,
    Issn,
}

impl IdentifierKind {
    pub fn field_name(&self) -> &'static str {
        match self {
            IdentifierKind::Doi => "DOI",
            IdentifierKind::Pmid => "PMID",
            IdentifierKind::Pmc => "PMC",
            IdentifierKind::Zoobank => "ZOOBANK",
            IdentifierKind::Jstor => "JSTOR",
            IdentifierKind::Handle => "HANDLE",
            IdentifierKind::Sudoc => "SUDOC",
            IdentifierKind::Biostor => "BIOSTOR",
            IdentifierKind::Cnki => "CNKI",
            IdentifierKind::Persee => "PERSEE",
            IdentifierKind::Dialnet => "DIALNET",
            IdentifierKind::Cinii => "CINII",
            IdentifierKind::Bhl => "BHL",
            IdentifierKind::BhlPart => "BHLPART",
            IdentifierKind::Archive => "ARCHIVE",
            IdentifierKind::Pdf => "PDF",
            IdentifierKind::Url => "URL",
            IdentifierKind::Issn => "ISSN",
        }
    }

    pub fn is_url(&self) -> bool {
        matches!(self, IdentifierKind::Pdf | IdentifierKind::Url)
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.field_name())
    }
}
