//! Prompt template rendering.
//!
//! Templates use a small `{{variable}}` syntax with optional
//! `{{#if variable}}...{{else}}...{{/if}}` blocks.

use std::collections::HashMap;

use super::error::PromptError;
use super::record::{Prompt, PromptArgumentSpec};

/// A prompt body ready to be instantiated with arguments.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub name: String,

    pub description: Option<String>,

    /// The arguments that this prompt accepts.
    pub arguments: Vec<PromptArgumentSpec>,

    /// The template string with placeholders.
    pub template: String,
}

impl From<Prompt> for PromptTemplate {
    fn from(prompt: Prompt) -> Self {
        Self {
            name: prompt.name,
            description: prompt.description,
            arguments: prompt.arguments.unwrap_or_default(),
            template: prompt.template,
        }
    }
}

impl PromptTemplate {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            arguments: Vec::new(),
            template: template.into(),
        }
    }

    /// Names of required arguments absent from `arguments`, in declaration order.
    pub fn missing_required<'a>(&'a self, arguments: &HashMap<String, String>) -> Vec<&'a str> {
        self.arguments
            .iter()
            .filter(|arg| arg.is_required() && !arguments.contains_key(&arg.name))
            .map(|arg| arg.name.as_str())
            .collect()
    }

    /// Render the template with the given arguments.
    ///
    /// - `{{variable}}` is replaced with the value of `variable`
    /// - `{{#if variable}}content{{/if}}` keeps content only if `variable` is non-empty
    /// - `{{#if variable}}content{{else}}alternative{{/if}}` with else support
    ///
    /// Placeholders with no matching argument are removed.
    pub fn render(&self, arguments: &HashMap<String, String>) -> Result<String, PromptError> {
        let expanded = process_conditionals(&self.template, arguments)?;
        Ok(substitute_placeholders(&expanded, arguments))
    }
}

fn process_conditionals(
    template: &str,
    arguments: &HashMap<String, String>,
) -> Result<String, PromptError> {
    const IF_OPEN: &str = "{{#if ";
    const ENDIF: &str = "{{/if}}";
    const ELSE: &str = "{{else}}";

    let mut result = template.to_string();

    while let Some(if_start) = result.find(IF_OPEN) {
        let var_end = result[if_start..]
            .find("}}")
            .map(|pos| if_start + pos)
            .ok_or_else(|| PromptError::template("Unclosed {{#if}} tag"))?;
        let var_name = result[if_start + IF_OPEN.len()..var_end].trim();

        let endif_pos = result[var_end..]
            .find(ENDIF)
            .map(|pos| var_end + pos)
            .ok_or_else(|| PromptError::template("Missing {{/if}} tag"))?;

        let block = &result[var_end + 2..endif_pos];
        let (when_set, when_unset) = match block.find(ELSE) {
            Some(else_pos) => (&block[..else_pos], &block[else_pos + ELSE.len()..]),
            None => (block, ""),
        };

        let is_set = arguments.get(var_name).is_some_and(|v| !v.is_empty());
        let replacement = if is_set { when_set } else { when_unset };

        result = format!(
            "{}{}{}",
            &result[..if_start],
            replacement,
            &result[endif_pos + ENDIF.len()..]
        );
    }

    Ok(result)
}

/// Replace every `{{name}}` in one left-to-right pass.
///
/// Inserted values are never scanned again, so a value containing `{{...}}`
/// is emitted verbatim. Placeholders with no matching argument are dropped;
/// stray block tags (`{{#...}}`, `{{/...}}`) are kept as written.
fn substitute_placeholders(template: &str, arguments: &HashMap<String, String>) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        output.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];

        let Some(close) = after_open.find("}}") else {
            output.push_str(&rest[open..]);
            return output;
        };

        let inner = &after_open[..close];
        if inner.contains('#') || inner.contains('/') {
            output.push_str(&rest[open..open + 2 + close + 2]);
        } else if let Some(value) = arguments.get(inner.trim()) {
            output.push_str(value);
        }

        rest = &after_open[close + 2..];
    }

    output.push_str(rest);
    output
}
