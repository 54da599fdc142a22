use std::sync::LazyLock;

use regex::Regex;

use crate::config::ResolvedConfig;
use crate::domain::{IdentifierKind, ItemId, PropertyId, Statement, Value};
use crate::error::QsError;
use crate::lookup::LookupClient;
use crate::record::{DateParts, Message, Scalar};
use crate::resolver::IdentifierResolver;
use crate::tables;
use crate::text;

static ERRATA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^ERRATA\b").expect("errata pattern"));
static ERRATA_ADDENDA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^ERRATA ET ADDENDA").expect("addenda pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub statements: Vec<Statement>,
    pub description: String,
    pub label: String,
    pub language: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldRule {
    WorkType,
    Title,
    Errata,
    Identifier(IdentifierKind),
    Url,
    PdfLink,
    Journal,
    Scalar(&'static str),
    Issued,
    Authors,
    Abstract,
    Language,
}

const FIELD_RULES: &[FieldRule] = &[
    FieldRule::WorkType,
    FieldRule::Title,
    FieldRule::Errata,
    FieldRule::Identifier(IdentifierKind::Doi),
    FieldRule::Identifier(IdentifierKind::Pmid),
    FieldRule::Identifier(IdentifierKind::Pmc),
    FieldRule::Identifier(IdentifierKind::Zoobank),
    FieldRule::Identifier(IdentifierKind::Jstor),
    FieldRule::Identifier(IdentifierKind::Handle),
    FieldRule::Identifier(IdentifierKind::Sudoc),
    FieldRule::Identifier(IdentifierKind::Biostor),
    FieldRule::Identifier(IdentifierKind::Cnki),
    FieldRule::Identifier(IdentifierKind::Persee),
    FieldRule::Identifier(IdentifierKind::Dialnet),
    FieldRule::Identifier(IdentifierKind::Cinii),
    FieldRule::Identifier(IdentifierKind::Bhl),
    FieldRule::Identifier(IdentifierKind::BhlPart),
    FieldRule::Identifier(IdentifierKind::Archive),
    FieldRule::Url,
    FieldRule::PdfLink,
    FieldRule::Journal,
    FieldRule::Scalar("volume"),
    FieldRule::Scalar("issue"),
    FieldRule::Scalar("page"),
    FieldRule::Scalar("article-number"),
    FieldRule::Issued,
    FieldRule::Authors,
    FieldRule::Abstract,
    FieldRule::Language,
];

struct Context<'m> {
    message: &'m Message,
    title: String,
    language: String,
    explicit_language: bool,
}

pub struct Mapper<'a, L: LookupClient> {
    config: &'a ResolvedConfig,
    resolver: IdentifierResolver<'a, L>,
}

impl<'a, L: LookupClient> Mapper<'a, L> {
    pub fn new(config: &'a ResolvedConfig, lookup: &'a L) -> Self {
        Self {
            config,
            resolver: IdentifierResolver::new(lookup),
        }
    }

    pub fn map_to_statements(&self, message: &Message) -> Result<Option<Mapping>, QsError> {
        let Some(title) = usable_title(message) else {
            return Ok(None);
        };

        let (language, explicit_language) = self.work_language(message);
        let context = Context {
            message,
            title,
            language,
            explicit_language,
        };

        let mut statements = Vec::new();
        for rule in FIELD_RULES {
            self.apply(*rule, &context, &mut statements)?;
        }

        Ok(Some(Mapping {
            statements,
            description: self.type_description(message),
            label: text::shorten(&context.title, self.config.max_label_length),
            language: context.language,
        }))
    }

    pub fn has_usable_title(&self, message: &Message) -> bool {
        usable_title(message).is_some()
    }

    fn apply(
        &self,
        rule: FieldRule,
        context: &Context<'_>,
        out: &mut Vec<Statement>,
    ) -> Result<(), QsError> {
        let message = context.message;
        match rule {
            FieldRule::WorkType => {
                let property = self.property("type")?;
                for class in self.type_classes(message) {
                    out.push(Statement::new(property.clone(), Value::Item(class)));
                }
            }
            FieldRule::Title => {
                out.push(Statement::new(
                    self.property("title")?,
                    Value::Monolingual {
                        language: context.language.clone(),
                        text: context.title.clone(),
                    },
                ));
            }
            FieldRule::Errata => {
                if ERRATA.is_match(&context.title) {
                    let property = self.property("type")?;
                    out.push(Statement::new(
                        property.clone(),
                        Value::Item(tables::ERRATUM_CLASS.parse()?),
                    ));
                    if ERRATA_ADDENDA.is_match(&context.title) {
                        out.push(Statement::new(
                            property,
                            Value::Item(tables::ADDENDUM_CLASS.parse()?),
                        ));
                    }
                }
            }
            FieldRule::Identifier(kind) => {
                if let Some(value) = message.identifier(kind) {
                    out.push(Statement::new(
                        self.property(kind.field_name())?,
                        Value::Text(text::single_line(&value)),
                    ));
                }
            }
            FieldRule::Url => {
                let property = self.property("URL")?;
                for url in message.urls() {
                    out.push(Statement::new(
                        property.clone(),
                        Value::Text(text::single_line(&url)),
                    ));
                }
            }
            FieldRule::PdfLink => {
                let property = self.property("PDF")?;
                for url in message.pdf_urls() {
                    out.push(Statement::new(
                        property.clone(),
                        Value::Text(text::single_line(&url)),
                    ));
                }
            }
            FieldRule::Journal => {
                let issns = message.issns();
                if message.container_title.is_some() && !issns.is_empty() {
                    if let Some(journal) = self.resolver.resolve_journal(&issns) {
                        out.push(Statement::new(
                            self.property("container-title")?,
                            Value::Item(journal),
                        ));
                    }
                }
            }
            FieldRule::Scalar(field) => {
                if let Some(value) = scalar_field(message, field) {
                    let cleaned = text::single_line(&text::decode_entities(&value.to_string()));
                    if !cleaned.is_empty() {
                        out.push(Statement::new(self.property(field)?, Value::Text(cleaned)));
                    }
                }
            }
            FieldRule::Issued => {
                if let Some(parts) = message.date_parts() {
                    out.push(Statement::new(
                        self.property("issued")?,
                        Value::Time(encode_date(parts)),
                    ));
                }
            }
            FieldRule::Authors => {
                let property = self.property("author")?;
                let ordinal = self.property("ordinal")?;
                let names = message
                    .author
                    .iter()
                    .flatten()
                    .filter_map(text::author_name);
                for (index, name) in names.enumerate() {
                    out.push(
                        Statement::new(property.clone(), Value::Text(name))
                            .with_qualifier(ordinal.clone(), Value::Text((index + 1).to_string())),
                    );
                }
            }
            FieldRule::Abstract => {
                if let Some(abstract_text) = &message.abstract_text {
                    let cleaned = text::shorten(
                        &text::strip_tags(abstract_text),
                        tables::MAX_ABSTRACT_LENGTH,
                    );
                    if !cleaned.is_empty() {
                        out.push(Statement::new(
                            self.property("abstract")?,
                            Value::Monolingual {
                                language: context.language.clone(),
                                text: cleaned,
                            },
                        ));
                    }
                }
            }
            FieldRule::Language => {
                if context.explicit_language {
                    if let Some(item) = self.config.languages.get(&context.language) {
                        out.push(Statement::new(
                            self.property("language")?,
                            Value::Item(item.clone()),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    fn property(&self, field: &str) -> Result<PropertyId, QsError> {
        self.config.property(field).cloned()
    }

    fn type_classes(&self, message: &Message) -> Vec<ItemId> {
        let work_type = message.work_type.as_deref();
        if work_type == Some("dissertation") {
            let degree_class = message
                .first_degree()
                .and_then(|degree| self.config.degree_classes.get(&degree).cloned());
            if let Some(class) = degree_class {
                return vec![class];
            }
        }
        self.config.type_rule(work_type).classes.clone()
    }

    fn type_description(&self, message: &Message) -> String {
        self.config
            .type_rule(message.work_type.as_deref())
            .description
            .clone()
    }

    fn work_language(&self, message: &Message) -> (String, bool) {
        if let Some(code) = message.language.as_deref().map(primary_subtag) {
            if self.config.languages.contains_key(&code) {
                return (code, true);
            }
        }
        let from_issn = message
            .issns()
            .iter()
            .find_map(|issn| self.config.issn_languages.get(issn.trim()).cloned());
        match from_issn {
            Some(code) => (code, false),
            None => (self.config.default_language.clone(), false),
        }
    }
}

fn usable_title(message: &Message) -> Option<String> {
    let raw = message.title.as_ref()?.first()?;
    let title = text::strip_tags(raw);
    (!title.is_empty()).then_some(title)
}

fn scalar_field<'m>(message: &'m Message, field: &str) -> Option<&'m Scalar> {
    match field {
        "volume" => message.volume.as_ref(),
        "issue" => message.issue.as_ref(),
        "page" => message.page.as_ref(),
        "article-number" => message.article_number.as_ref(),
        _ => None,
    }
}

fn primary_subtag(language: &str) -> String {
    language
        .trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Wikidata time literal with precision 11 (day), 10 (month) or 9 (year).
pub fn encode_date(parts: DateParts) -> String {
    let year = parts.year;
    match (parts.month, parts.day) {
        (Some(month), Some(day)) => format!("+{year}-{month:02}-{day:02}T00:00:00Z/11"),
        (Some(month), None) => format!("+{year}-{month:02}-00T00:00:00Z/10"),
        _ => format!("+{year}-00-00T00:00:00Z/9"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_precisions() {
        let year = DateParts {
            year: 1998,
            month: None,
            day: None,
        };
        assert_eq!(encode_date(year), "+1998-00-00T00:00:00Z/9");
        assert_eq!(
            encode_date(DateParts {
                month: Some(3),
                ..year
            }),
            "+1998-03-00T00:00:00Z/10"
        );
        assert_eq!(
            encode_date(DateParts {
                month: Some(3),
                day: Some(7),
                ..year
            }),
            "+1998-03-07T00:00:00Z/11"
        );
    }

    #[test]
    fn language_subtag() {
        assert_eq!(primary_subtag("pt-BR"), "pt");
        assert_eq!(primary_subtag(" EN_us "), "en");
    }
}
