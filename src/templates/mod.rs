//! Message templates and formatting.
//!
//! - `template` - `{{key}}` substitution
//! - `catalog` - the fixed set of named templates, validated at startup
//! - `formatter` - typed rendering of bot outcomes

mod catalog;
mod formatter;
mod template;

use thiserror::Error;

pub use catalog::{MessageCatalog, TemplateName};
pub use formatter::MessageFormatter;
pub use template::{Template, TemplateData};

/// Template configuration errors. Raised at startup only.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("message template '{0}' not found")]
    Missing(&'static str),

    #[error("unclosed placeholder in template: {0}")]
    Malformed(String),

    #[error("invalid template catalog: {0}")]
    Json(#[from] serde_json::Error),
}
