//! Renders bot outcomes into reply text.

use super::{MessageCatalog, TemplateData, TemplateError, TemplateName};
use crate::database::{ChatSummary, Member, Ranking};
use crate::selection::Outcome;
use crate::stats::{format_day, position_marker};

/// Turns structured results into user-facing text.
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    catalog: MessageCatalog,
}

impl MessageFormatter {
    pub fn new(catalog: MessageCatalog) -> Self {
        Self { catalog }
    }

    /// Formatter over the embedded catalog.
    pub fn embedded() -> Result<Self, TemplateError> {
        Ok(Self::new(MessageCatalog::embedded()?))
    }

    fn plain(&self, name: TemplateName) -> String {
        self.catalog.get(name).text()
    }

    fn with_member(&self, name: TemplateName, member: &Member) -> String {
        self.catalog
            .get(name)
            .render(&TemplateData::from([("member", member.display_name())]))
    }

    pub fn help(&self) -> String {
        self.plain(TemplateName::Help)
    }

    pub fn group_only(&self) -> String {
        self.plain(TemplateName::GroupOnly)
    }

    pub fn unknown_command(&self) -> String {
        self.plain(TemplateName::UnknownCommand)
    }

    /// Generic failure; `detail` says what was being done.
    pub fn error(&self, detail: &str) -> String {
        self.catalog
            .get(TemplateName::Error)
            .render(&TemplateData::from([("detail", detail.to_string())]))
    }

    pub fn selection(&self, outcome: &Outcome) -> String {
        match outcome {
            Outcome::JustSelected(winner) => self.with_member(TemplateName::Selected, &winner.member),
            Outcome::AlreadySelected(winner) => {
                self.with_member(TemplateName::AlreadySelected, &winner.member)
            }
            Outcome::NoActiveMembers => self.plain(TemplateName::NoActiveMembers),
        }
    }

    pub fn stats(&self, ranking: &Ranking) -> String {
        let entries = match ranking {
            Ranking::Empty => return self.plain(TemplateName::StatsEmpty),
            Ranking::Entries(entries) => entries,
        };

        let row = self.catalog.get(TemplateName::StatsEntry);
        let mut text = self.plain(TemplateName::StatsHeader);
        for (i, entry) in entries.iter().enumerate() {
            text.push_str(&row.render(&TemplateData::from([
                ("position", position_marker(i + 1)),
                ("member", entry.member.display_name()),
                ("count", entry.wins.to_string()),
            ])));
        }
        text
    }

    pub fn info(&self, summary: &ChatSummary) -> String {
        let mut data = TemplateData::from([
            ("members", summary.members.to_string()),
            ("days", summary.days_played.to_string()),
        ]);

        match &summary.today {
            Some(winner) => {
                data.insert("member", winner.member.display_name());
                data.insert("date", format_day(winner.selection.day));
                self.catalog.get(TemplateName::Info).render(&data)
            }
            None => self.catalog.get(TemplateName::InfoNotSelected).render(&data),
        }
    }
}
