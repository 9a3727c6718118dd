//! Named template catalog.
//!
//! The set of names is fixed at compile time; the texts live in an embedded
//! JSON document and are checked once, at startup.

use std::collections::HashMap;

use tracing::warn;

use super::{Template, TemplateError};

const EMBEDDED: &str = include_str!("messages.json");

/// Every template the bot renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateName {
    GroupOnly,
    UnknownCommand,
    Error,
    Help,
    AlreadySelected,
    Selected,
    NoActiveMembers,
    StatsHeader,
    StatsEntry,
    StatsEmpty,
    Info,
    InfoNotSelected,
}

impl TemplateName {
    pub const ALL: [TemplateName; 12] = [
        Self::GroupOnly,
        Self::UnknownCommand,
        Self::Error,
        Self::Help,
        Self::AlreadySelected,
        Self::Selected,
        Self::NoActiveMembers,
        Self::StatsHeader,
        Self::StatsEntry,
        Self::StatsEmpty,
        Self::Info,
        Self::InfoNotSelected,
    ];

    /// Key in the catalog document.
    pub fn key(self) -> &'static str {
        match self {
            Self::GroupOnly => "group_only",
            Self::UnknownCommand => "unknown_command",
            Self::Error => "error",
            Self::Help => "help",
            Self::AlreadySelected => "already_selected",
            Self::Selected => "selected",
            Self::NoActiveMembers => "no_active_members",
            Self::StatsHeader => "stats_header",
            Self::StatsEntry => "stats_entry",
            Self::StatsEmpty => "stats_empty",
            Self::Info => "info",
            Self::InfoNotSelected => "info_not_selected",
        }
    }
}

/// All templates, parsed and complete.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    templates: HashMap<TemplateName, Template>,
}

impl MessageCatalog {
    /// Load the catalog compiled into the binary.
    pub fn embedded() -> Result<Self, TemplateError> {
        Self::from_json(EMBEDDED)
    }

    /// Parse a JSON object of `name -> template text`.
    ///
    /// Fails if any `TemplateName` is missing or malformed. Extra keys are
    /// logged and ignored.
    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        let mut raw: HashMap<String, String> = serde_json::from_str(json)?;

        let mut templates = HashMap::with_capacity(TemplateName::ALL.len());
        for name in TemplateName::ALL {
            let source = raw
                .remove(name.key())
                .ok_or(TemplateError::Missing(name.key()))?;
            templates.insert(name, Template::parse(&source)?);
        }

        for unused in raw.keys() {
            warn!("Ignoring unknown message template '{}'", unused);
        }

        Ok(Self { templates })
    }

    /// Look up a template. Every name is present once construction succeeded.
    pub fn get(&self, name: TemplateName) -> &Template {
        &self.templates[&name]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog_is_complete() {
        let catalog = MessageCatalog::embedded().unwrap();
        for name in TemplateName::ALL {
            assert!(!catalog.get(name).text().is_empty(), "{:?} is empty", name);
        }
    }

    #[test]
    fn test_missing_template_fails() {
        let mut doc: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(EMBEDDED).unwrap();
        doc.remove("stats_entry");
        let json = serde_json::Value::Object(doc).to_string();

        assert!(matches!(
            MessageCatalog::from_json(&json),
            Err(TemplateError::Missing("stats_entry"))
        ));
    }

    #[test]
    fn test_invalid_json_fails() {
        assert!(matches!(
            MessageCatalog::from_json("[1, 2]"),
            Err(TemplateError::Json(_))
        ));
    }
}
