//! Key report formatting
//!
//! Formats rendered key material for terminal output in text and JSON.

use serde::Serialize;

use super::base::{BaseForm, RenderedForms};
use crate::error::SoliResult;

/// Everything the `key` command prints
#[derive(Debug, Clone, Serialize)]
pub struct KeyReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,
    pub byte_count: usize,
    pub bytes: &'a [u8],
    #[serde(skip_serializing_if = "no_forms")]
    pub forms: &'a [BaseForm],
}

fn no_forms(forms: &&[BaseForm]) -> bool {
    forms.is_empty()
}

impl<'a> KeyReport<'a> {
    /// Report for the session key: id, bytes and every base
    pub fn for_key(id: &'a str, rendered: &'a RenderedForms) -> Self {
        Self {
            id: Some(id),
            byte_count: rendered.byte_count(),
            bytes: &rendered.bytes,
            forms: &rendered.forms,
        }
    }

    /// Report for a parsed literal: bytes only
    pub fn for_literal(bytes: &'a [u8]) -> Self {
        Self {
            id: None,
            byte_count: bytes.len(),
            bytes,
            forms: &[],
        }
    }

    /// Format as JSON
    pub fn to_json(&self) -> SoliResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Format a byte buffer as `(<n>*bytes)[b0 b1 ...]`
pub fn format_byte_listing(bytes: &[u8]) -> String {
    let values: Vec<String> = bytes.iter().map(u8::to_string).collect();
    format!("({}*bytes)[{}]", bytes.len(), values.join(" "))
}

/// Format the report as text, one line per item
pub fn format_key_report(report: &KeyReport<'_>) -> String {
    let mut output = String::new();

    if let Some(id) = report.id {
        output.push_str(&format!("id={}\n", id));
    }

    output.push_str(&format_byte_listing(report.bytes));
    output.push('\n');

    for form in report.forms {
        output.push_str(&format!(
            "({}*base{}){}\n",
            form.digits.len(),
            form.base,
            form.digits
        ));
    }

    output
}
