use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::domain::{ItemId, PropertyId, is_language_code};
use crate::error::QsError;
use crate::tables;

pub const CONFIG_FILE_NAME: &str = "csl-qs.json";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub types: BTreeMap<String, TypeEntry>,
    #[serde(default)]
    pub default_type: Option<TypeEntry>,
    #[serde(default)]
    pub degree_classes: BTreeMap<String, String>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default)]
    pub provenance_exclusions: Option<Vec<String>>,
    #[serde(default)]
    pub citation_provenance_exclusions: Option<Vec<String>>,
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
    #[serde(default)]
    pub issn_languages: BTreeMap<String, String>,
    #[serde(default)]
    pub default_language: Option<String>,
    #[serde(default)]
    pub max_label_length: Option<usize>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TypeEntry {
    Shorthand(String),
    Detailed(TypeEntryObject),
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TypeEntryObject {
    pub classes: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRule {
    pub classes: Vec<ItemId>,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub types: BTreeMap<String, TypeRule>,
    pub default_type: TypeRule,
    pub degree_classes: BTreeMap<String, ItemId>,
    pub properties: BTreeMap<String, PropertyId>,
    pub record_exclusions: BTreeSet<PropertyId>,
    pub citation_exclusions: BTreeSet<PropertyId>,
    pub languages: BTreeMap<String, ItemId>,
    pub issn_languages: BTreeMap<String, String>,
    pub default_language: String,
    pub max_label_length: usize,
}

impl ResolvedConfig {
    pub fn builtin() -> Result<Self, QsError> {
        ConfigLoader::resolve_config(Config::default())
    }

    pub fn property(&self, field: &str) -> Result<&PropertyId, QsError> {
        self.properties
            .get(field)
            .ok_or_else(|| QsError::UnmappedField(field.to_string()))
    }

    pub fn type_rule(&self, work_type: Option<&str>) -> &TypeRule {
        work_type
            .and_then(|value| self.types.get(value))
            .unwrap_or(&self.default_type)
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, QsError> {
        let config_path = match path {
            Some(path) => {
                let path = PathBuf::from(path);
                if !path.exists() {
                    return Err(QsError::MissingConfig(path));
                }
                Some(path)
            }
            None => default_config_paths().into_iter().find(|path| path.exists()),
        };

        match config_path {
            Some(config_path) => {
                tracing::debug!(path = %config_path.display(), "loading config");
                Self::resolve_config(Self::read(&config_path)?)
            }
            None => ResolvedConfig::builtin(),
        }
    }

    fn read(path: &Path) -> Result<Config, QsError> {
        let content =
            fs::read_to_string(path).map_err(|_| QsError::ConfigRead(path.to_path_buf()))?;
        serde_json::from_str(&content).map_err(|err| QsError::ConfigParse(err.to_string()))
    }

    pub fn resolve_config(config: Config) -> Result<ResolvedConfig, QsError> {
        let schema_version = config.schema_version.unwrap_or(1);

        let mut types = BTreeMap::new();
        for (name, classes, description) in tables::TYPE_RULES {
            types.insert(name.to_string(), builtin_rule(classes, description)?);
        }
        for (name, entry) in config.types {
            let fallback = types
                .get(&name)
                .map(|rule: &TypeRule| rule.description.clone())
                .unwrap_or_else(|| name.clone());
            types.insert(name, resolve_type_entry(entry, &fallback)?);
        }

        let (default_classes, default_description) = tables::DEFAULT_TYPE;
        let default_type = match config.default_type {
            Some(entry) => resolve_type_entry(entry, default_description)?,
            None => builtin_rule(default_classes, default_description)?,
        };

        let degree_classes = overlay(tables::DEGREE_CLASSES, config.degree_classes)
            .into_iter()
            .map(|(degree, class)| Ok((degree, class.parse::<ItemId>()?)))
            .collect::<Result<BTreeMap<String, ItemId>, QsError>>()?;

        let properties = overlay(tables::FIELD_PROPERTIES, config.properties)
            .into_iter()
            .map(|(field, property)| Ok((field, property.parse::<PropertyId>()?)))
            .collect::<Result<BTreeMap<String, PropertyId>, QsError>>()?;

        let record_exclusions = resolve_exclusions(
            config.provenance_exclusions,
            tables::RECORD_PROVENANCE_EXCLUSIONS,
        )?;
        let citation_exclusions = resolve_exclusions(
            config.citation_provenance_exclusions,
            tables::CITATION_PROVENANCE_EXCLUSIONS,
        )?;

        let languages = overlay(tables::LANGUAGES, config.languages)
            .into_iter()
            .map(|(code, item)| {
                if !is_language_code(&code) {
                    return Err(QsError::InvalidLanguage(code));
                }
                Ok((code, item.parse::<ItemId>()?))
            })
            .collect::<Result<BTreeMap<String, ItemId>, QsError>>()?;

        let issn_languages = overlay(tables::ISSN_LANGUAGES, config.issn_languages);
        if let Some(code) = issn_languages.values().find(|code| !is_language_code(code)) {
            return Err(QsError::InvalidLanguage(code.clone()));
        }

        let default_language = config
            .default_language
            .unwrap_or_else(|| tables::DEFAULT_LANGUAGE.to_string());
        if !is_language_code(&default_language) {
            return Err(QsError::InvalidLanguage(default_language));
        }

        Ok(ResolvedConfig {
            schema_version,
            types,
            default_type,
            degree_classes,
            properties,
            record_exclusions,
            citation_exclusions,
            languages,
            issn_languages,
            default_language,
            max_label_length: config.max_label_length.unwrap_or(tables::MAX_LABEL_LENGTH),
        })
    }
}

pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dirs) = ProjectDirs::from("org", "wikicite", "csl-qs") {
        paths.push(dirs.config_dir().join("config.json"));
    }
    paths
}

fn builtin_rule(classes: &[&str], description: &str) -> Result<TypeRule, QsError> {
    Ok(TypeRule {
        classes: classes
            .iter()
            .map(|class| class.parse::<ItemId>())
            .collect::<Result<Vec<_>, QsError>>()?,
        description: description.to_string(),
    })
}

fn resolve_type_entry(entry: TypeEntry, fallback_description: &str) -> Result<TypeRule, QsError> {
    match entry {
        TypeEntry::Shorthand(class) => Ok(TypeRule {
            classes: vec![class.parse()?],
            description: fallback_description.to_string(),
        }),
        TypeEntry::Detailed(obj) => Ok(TypeRule {
            classes: obj
                .classes
                .iter()
                .map(|class| class.parse::<ItemId>())
                .collect::<Result<Vec<_>, QsError>>()?,
            description: obj
                .description
                .unwrap_or_else(|| fallback_description.to_string()),
        }),
    }
}

fn overlay(
    defaults: &[(&str, &str)],
    overrides: BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged = defaults
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect::<BTreeMap<_, _>>();
    merged.extend(overrides);
    merged
}

fn resolve_exclusions(
    configured: Option<Vec<String>>,
    defaults: &[&str],
) -> Result<BTreeSet<PropertyId>, QsError> {
    match configured {
        Some(values) => values.iter().map(|value| value.parse::<PropertyId>()).collect(),
        None => defaults.iter().map(|value| value.parse::<PropertyId>()).collect(),
    }
}
