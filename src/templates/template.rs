//! Flat `{{key}}` placeholder templates.
//!
//! No nesting, no conditionals: a template is literal text interleaved with
//! named holes. Keys missing from the data render as nothing.

use std::collections::HashMap;

use super::TemplateError;

/// Values substituted into a template, by placeholder name.
pub type TemplateData<'a> = HashMap<&'a str, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Placeholder(String),
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse `source`. An opening `{{` without a matching `}}` is rejected.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                segments.push(Segment::Text(rest[..start].to_string()));
            }
            let after_open = &rest[start + 2..];
            let Some(end) = after_open.find("}}") else {
                return Err(TemplateError::Malformed(source.to_string()));
            };
            segments.push(Segment::Placeholder(after_open[..end].trim().to_string()));
            rest = &after_open[end + 2..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        Ok(Self { segments })
    }

    /// Substitute `data` into the template.
    pub fn render(&self, data: &TemplateData<'_>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Placeholder(key) => {
                    if let Some(value) = data.get(key.as_str()) {
                        out.push_str(value);
                    }
                }
            }
        }
        out
    }

    /// Render with no data.
    pub fn text(&self) -> String {
        self.render(&TemplateData::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_placeholders() {
        let template = Template::parse("{{position}} {{member}} - {{count}} times").unwrap();
        let data = TemplateData::from([
            ("position", "🥇".to_string()),
            ("member", "Anna (@anna)".to_string()),
            ("count", "3".to_string()),
        ]);

        assert_eq!(template.render(&data), "🥇 Anna (@anna) - 3 times");
    }

    #[test]
    fn test_missing_key_renders_empty() {
        let template = Template::parse("Error: {{detail}}!").unwrap();
        assert_eq!(template.text(), "Error: !");
    }

    #[test]
    fn test_whitespace_inside_braces_is_ignored() {
        let template = Template::parse("Hi {{ name }}").unwrap();
        let data = TemplateData::from([("name", "Bob".to_string())]);
        assert_eq!(template.render(&data), "Hi Bob");
    }

    #[test]
    fn test_values_are_not_reexpanded() {
        let template = Template::parse("{{a}}").unwrap();
        let data = TemplateData::from([("a", "{{b}}".to_string()), ("b", "x".to_string())]);
        assert_eq!(template.render(&data), "{{b}}");
    }

    #[test]
    fn test_unclosed_placeholder_is_rejected() {
        assert!(matches!(
            Template::parse("oops {{member"),
            Err(TemplateError::Malformed(_))
        ));
    }

    #[test]
    fn test_plain_text() {
        let template = Template::parse("no holes here").unwrap();
        assert_eq!(template.text(), "no holes here");
    }
}
