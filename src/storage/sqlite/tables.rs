//! Column mappings for the built-in content tables.

use rusqlite::Row;
use rusqlite::types::Value;

use super::SqlRecord;
use crate::domains::prompts::{Prompt, PromptArgumentSpec};
use crate::domains::resources::Resource;
use crate::storage::error::RegistryResult;

fn text_or_null(value: &Option<String>) -> Value {
    value.clone().map(Value::Text).unwrap_or(Value::Null)
}

fn flag(enabled: bool) -> Value {
    Value::Integer(i64::from(enabled))
}

impl SqlRecord for Prompt {
    const TABLE: &'static str = "builtin_prompts";
    const KEY_COLUMN: &'static str = "name";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "title",
        "description",
        "template",
        "arguments",
        "enabled",
    ];

    fn to_values(&self) -> RegistryResult<Vec<Value>> {
        let arguments = match &self.arguments {
            Some(arguments) => Value::Text(serde_json::to_string(arguments)?),
            None => Value::Null,
        };

        Ok(vec![
            Value::Text(self.name.clone()),
            text_or_null(&self.title),
            text_or_null(&self.description),
            Value::Text(self.template.clone()),
            arguments,
            flag(self.enabled),
        ])
    }

    fn from_row(row: &Row<'_>) -> RegistryResult<Self> {
        let arguments = match row.get::<_, Option<String>>("arguments")? {
            Some(raw) => Some(serde_json::from_str::<Vec<PromptArgumentSpec>>(&raw)?),
            None => None,
        };

        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            title: row.get("title")?,
            description: row.get("description")?,
            template: row.get("template")?,
            arguments,
            enabled: row.get("enabled")?,
        })
    }
}

impl SqlRecord for Resource {
    const TABLE: &'static str = "builtin_resources";
    const KEY_COLUMN: &'static str = "uri";
    const COLUMNS: &'static [&'static str] = &[
        "uri",
        "name",
        "description",
        "mime_type",
        "content",
        "enabled",
    ];

    fn to_values(&self) -> RegistryResult<Vec<Value>> {
        Ok(vec![
            Value::Text(self.uri.clone()),
            text_or_null(&self.name),
            text_or_null(&self.description),
            text_or_null(&self.mime_type),
            Value::Text(self.content.clone()),
            flag(self.enabled),
        ])
    }

    fn from_row(row: &Row<'_>) -> RegistryResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            uri: row.get("uri")?,
            name: row.get("name")?,
            description: row.get("description")?,
            mime_type: row.get("mime_type")?,
            content: row.get("content")?,
            enabled: row.get("enabled")?,
        })
    }
}
