use serde::Serialize;

use crate::config::ResolvedConfig;
use crate::domain::{EntityRef, IdentifierKind, ItemId, PropertyId, Provenance, Statement, Value};
use crate::error::QsError;
use crate::lookup::LookupClient;
use crate::mapper::Mapper;
use crate::record::Work;
use crate::references::ReferenceProcessor;
use crate::resolver::IdentifierResolver;
use crate::serializer;

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub check: bool,
    pub update: bool,
    pub provenance: Provenance,
    pub include_citations: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            check: true,
            update: true,
            provenance: Provenance::default(),
            include_citations: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingMessage,
    MissingTitle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Skipped(SkipReason),
    Existing(ItemId),
    Commands { entity: EntityRef, text: String },
}

impl Outcome {
    pub fn commands(&self) -> Option<&str> {
        match self {
            Outcome::Commands { text, .. } => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub records: Vec<RecordReport>,
}

impl BatchReport {
    pub fn commands(&self) -> String {
        self.records
            .iter()
            .filter_map(|record| record.commands.as_deref())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordReport {
    pub index: usize,
    pub action: String,
    pub item: Option<String>,
    pub skip_reason: Option<SkipReason>,
    pub commands: Option<String>,
}

impl RecordReport {
    fn from_outcome(index: usize, outcome: Outcome) -> Self {
        match outcome {
            Outcome::Skipped(reason) => Self {
                index,
                action: "skipped".to_string(),
                item: None,
                skip_reason: Some(reason),
                commands: None,
            },
            Outcome::Existing(id) => Self {
                index,
                action: "existing".to_string(),
                item: Some(id.to_string()),
                skip_reason: None,
                commands: None,
            },
            Outcome::Commands { entity, text } => Self {
                index,
                action: match entity {
                    EntityRef::Existing(_) => "updated",
                    EntityRef::PendingCreation => "created",
                }
                .to_string(),
                item: entity.existing().map(ToString::to_string),
                skip_reason: None,
                commands: Some(text),
            },
        }
    }
}

pub struct Generator<L: LookupClient> {
    config: ResolvedConfig,
    lookup: L,
}

impl<L: LookupClient> Generator<L> {
    pub fn new(config: ResolvedConfig, lookup: L) -> Self {
        Self { config, lookup }
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn generate(&self, work: &Work, options: &GenerateOptions) -> Result<Outcome, QsError> {
        let Some(message) = &work.message else {
            tracing::warn!("record has no message; skipping");
            return Ok(Outcome::Skipped(SkipReason::MissingMessage));
        };

        let mapper = Mapper::new(&self.config, &self.lookup);
        if !mapper.has_usable_title(message) {
            tracing::warn!(
                doi = ?message.identifier(IdentifierKind::Doi),
                "record has no usable title; skipping"
            );
            return Ok(Outcome::Skipped(SkipReason::MissingTitle));
        }

        let entity = if options.check {
            IdentifierResolver::new(&self.lookup).resolve_entity(message)
        } else {
            EntityRef::PendingCreation
        };
        if let EntityRef::Existing(id) = &entity {
            if !options.update {
                tracing::debug!(item = %id, "record already has an item; not updating");
                return Ok(Outcome::Existing(id.clone()));
            }
        }

        let Some(mapping) = mapper.map_to_statements(message)? else {
            return Ok(Outcome::Skipped(SkipReason::MissingTitle));
        };

        let mut statements = Vec::with_capacity(mapping.statements.len() + 2);
        if matches!(entity, EntityRef::PendingCreation) {
            statements.push(Statement::new(
                PropertyId::label(&mapping.language)?,
                Value::Text(mapping.label),
            ));
            statements.push(Statement::new(
                PropertyId::description(&mapping.language)?,
                Value::Text(mapping.description),
            ));
        }
        statements.extend(mapping.statements);

        let mut text = serializer::serialize(
            &entity,
            &statements,
            &options.provenance,
            &self.config.record_exclusions,
        )?;
        if options.include_citations {
            let citations =
                ReferenceProcessor::new(&self.config, &self.lookup).map_references(message)?;
            text.push_str(&serializer::rows(
                &entity,
                &citations,
                &options.provenance,
                &self.config.citation_exclusions,
            )?);
        }

        Ok(Outcome::Commands { entity, text })
    }

    pub fn generate_citations(
        &self,
        work: &Work,
        item: &ItemId,
        provenance: &Provenance,
    ) -> Result<String, QsError> {
        let Some(message) = &work.message else {
            tracing::warn!("record has no message; no citations");
            return Ok(String::new());
        };
        let citations =
            ReferenceProcessor::new(&self.config, &self.lookup).map_references(message)?;
        tracing::debug!(item = %item, count = citations.len(), "resolved citations");
        serializer::rows(
            &EntityRef::Existing(item.clone()),
            &citations,
            provenance,
            &self.config.citation_exclusions,
        )
    }

    pub fn generate_batch(
        &self,
        works: &[Work],
        options: &GenerateOptions,
        sink: &dyn ProgressSink,
    ) -> Result<BatchReport, QsError> {
        let total = works.len();
        let mut records = Vec::with_capacity(total);
        for (index, work) in works.iter().enumerate() {
            sink.event(ProgressEvent {
                message: format!("phase=Generate; record {}/{}", index + 1, total),
            });
            let report = RecordReport::from_outcome(index, self.generate(work, options)?);
            sink.event(ProgressEvent {
                message: format!(
                    "phase=Done; record {}/{} {}{}",
                    index + 1,
                    total,
                    report.action,
                    report
                        .item
                        .as_deref()
                        .map(|item| format!(" {item}"))
                        .unwrap_or_default()
                ),
            });
            records.push(report);
        }
        Ok(BatchReport { records })
    }
}
