use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::IdentifierKind;
use crate::error::QsError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Work {
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<Message>,
}

impl Work {
    pub fn from_json(text: &str) -> Result<Self, QsError> {
        serde_json::from_str(text).map_err(|err| QsError::InputParse(err.to_string()))
    }
}

pub fn parse_works(text: &str) -> Result<Vec<Work>, QsError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).map_err(|err| QsError::InputParse(err.to_string()));
    }
    if let Ok(work) = Work::from_json(trimmed) {
        return Ok(vec![work]);
    }
    trimmed
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            serde_json::from_str(line)
                .map_err(|err| QsError::InputParse(format!("line {}: {err}", number + 1)))
        })
        .collect()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Message {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub work_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<Title>,

    #[serde(rename = "DOI", default, deserialize_with = "lenient")]
    pub doi: Option<Scalar>,
    #[serde(rename = "PMID", default, deserialize_with = "lenient")]
    pub pmid: Option<Scalar>,
    #[serde(rename = "PMC", default, deserialize_with = "lenient")]
    pub pmc: Option<Scalar>,
    #[serde(rename = "ZOOBANK", default, deserialize_with = "lenient")]
    pub zoobank: Option<Scalar>,
    #[serde(rename = "JSTOR", default, deserialize_with = "lenient")]
    pub jstor: Option<Scalar>,
    #[serde(rename = "HANDLE", default, deserialize_with = "lenient")]
    pub handle: Option<Scalar>,
    #[serde(rename = "SUDOC", default, deserialize_with = "lenient")]
    pub sudoc: Option<Scalar>,
    #[serde(rename = "BIOSTOR", default, deserialize_with = "lenient")]
    pub biostor: Option<Scalar>,
    #[serde(rename = "CNKI", default, deserialize_with = "lenient")]
    pub cnki: Option<Scalar>,
    #[serde(rename = "PERSEE", default, deserialize_with = "lenient")]
    pub persee: Option<Scalar>,
    #[serde(rename = "DIALNET", default, deserialize_with = "lenient")]
    pub dialnet: Option<Scalar>,
    #[serde(rename = "CINII", default, deserialize_with = "lenient")]
    pub cinii: Option<Scalar>,
    #[serde(rename = "BHL", default, deserialize_with = "lenient")]
    pub bhl: Option<Scalar>,
    #[serde(rename = "BHLPART", default, deserialize_with = "lenient")]
    pub bhl_part: Option<Scalar>,
    #[serde(rename = "ARCHIVE", default, deserialize_with = "lenient")]
    pub archive: Option<Scalar>,

    #[serde(rename = "URL", default, deserialize_with = "lenient")]
    pub url: Option<OneOrMany<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub link: Option<Vec<Link>>,
    #[serde(rename = "container-title", default, deserialize_with = "lenient")]
    pub container_title: Option<Title>,
    #[serde(rename = "ISSN", default, deserialize_with = "lenient")]
    pub issn: Option<OneOrMany<String>>,

    #[serde(default, deserialize_with = "lenient")]
    pub volume: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub issue: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub page: Option<Scalar>,
    #[serde(rename = "article-number", default, deserialize_with = "lenient")]
    pub article_number: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub issued: Option<Issued>,

    #[serde(default, deserialize_with = "lenient")]
    pub degree: Option<OneOrMany<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<Vec<Name>>,
    #[serde(rename = "abstract", default, deserialize_with = "lenient")]
    pub abstract_text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub language: Option<String>,

    /// Kept raw: a malformed reference list must only disable citation
    /// processing, not the rest of the record.
    #[serde(default)]
    pub reference: Option<Value>,
}

impl Message {
    pub fn identifier(&self, kind: IdentifierKind) -> Option<String> {
        let value = match kind {
            IdentifierKind::Doi => &self.doi,
            IdentifierKind::Pmid => &self.pmid,
            IdentifierKind::Pmc => &self.pmc,
            IdentifierKind::Zoobank => &self.zoobank,
            IdentifierKind::Jstor => &self.jstor,
            IdentifierKind::Handle => &self.handle,
            IdentifierKind::Sudoc => &self.sudoc,
            IdentifierKind::Biostor => &self.biostor,
            IdentifierKind::Cnki => &self.cnki,
            IdentifierKind::Persee => &self.persee,
            IdentifierKind::Dialnet => &self.dialnet,
            IdentifierKind::Cinii => &self.cinii,
            IdentifierKind::Bhl => &self.bhl,
            IdentifierKind::BhlPart => &self.bhl_part,
            IdentifierKind::Archive => &self.archive,
            IdentifierKind::Pdf => return self.pdf_urls().into_iter().next(),
            IdentifierKind::Url => return self.urls().into_iter().next(),
            IdentifierKind::Issn => return self.issns().into_iter().next(),
        };
        value
            .as_ref()
            .map(Scalar::to_string)
            .filter(|value| !value.is_empty())
    }

    pub fn urls(&self) -> Vec<String> {
        self.url
            .as_ref()
            .map(|urls| urls.to_vec())
            .unwrap_or_default()
    }

    pub fn pdf_urls(&self) -> Vec<String> {
        self.link
            .iter()
            .flatten()
            .filter(|link| link.is_pdf())
            .filter_map(|link| link.url.clone())
            .collect()
    }

    pub fn issns(&self) -> Vec<String> {
        self.issn
            .as_ref()
            .map(|issns| issns.to_vec())
            .unwrap_or_default()
    }

    pub fn first_degree(&self) -> Option<String> {
        self.degree
            .as_ref()
            .and_then(|degrees| degrees.to_vec().into_iter().next())
    }

    pub fn date_parts(&self) -> Option<DateParts> {
        self.issued.as_ref().and_then(Issued::first)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Title {
    One(String),
    Many(Vec<String>),
}

impl Title {
    pub fn first(&self) -> Option<&str> {
        let value = match self {
            Title::One(value) => Some(value.as_str()),
            Title::Many(values) => values.first().map(String::as_str),
        };
        value.filter(|value| !value.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T: Clone> OneOrMany<T> {
    pub fn to_vec(&self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value.clone()],
            OneOrMany::Many(values) => values.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl Scalar {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Scalar::Text(value) => value.trim().parse().ok(),
            Scalar::Integer(value) => Some(*value),
            Scalar::Float(value) if value.fract() == 0.0 => Some(*value as i64),
            Scalar::Float(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(value) => write!(f, "{value}"),
            Scalar::Integer(value) => write!(f, "{value}"),
            Scalar::Float(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    #[serde(rename = "content-type", default)]
    pub content_type: Option<String>,
    #[serde(rename = "URL", default)]
    pub url: Option<String>,
}

impl Link {
    pub fn is_pdf(&self) -> bool {
        self.content_type.as_deref() == Some("application/pdf")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issued {
    #[serde(rename = "date-parts", default)]
    pub date_parts: Vec<Vec<Option<Scalar>>>,
}

impl Issued {
    pub fn first(&self) -> Option<DateParts> {
        let parts = self.date_parts.first()?;
        let mut values = parts
            .iter()
            .map(|part| part.as_ref().and_then(Scalar::as_integer));
        let year = values.next().flatten()?;
        let month = values.next().flatten();
        let day = month.and(values.next().flatten());
        Some(DateParts { year, month, day })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub year: i64,
    pub month: Option<i64>,
    pub day: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Name {
    #[serde(default)]
    pub given: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub suffix: Option<String>,
    #[serde(default)]
    pub literal: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Reference {
    #[serde(rename = "DOI", default, deserialize_with = "lenient")]
    pub doi: Option<String>,
    #[serde(rename = "ISSN", default, deserialize_with = "lenient")]
    pub issn: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub volume: Option<Scalar>,
    #[serde(rename = "first-page", default, deserialize_with = "lenient")]
    pub first_page: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub year: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub unstructured: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(err) => {
            tracing::debug!(error = %err, "ignoring field with unexpected shape");
            Ok(None)
        }
    }
}
