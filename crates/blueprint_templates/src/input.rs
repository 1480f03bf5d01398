//! Input collected from the user before materialization.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{TemplateError, TemplateResult};

/// Value the user supplied for one dynamic token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicValue {
    pub user_input: String,
}

impl DynamicValue {
    pub fn new(user_input: impl Into<String>) -> Self {
        Self {
            user_input: user_input.into(),
        }
    }
}

/// Dynamic token values keyed by token, e.g. `$status`.
pub type DynamicTemplateValues = BTreeMap<String, DynamicValue>;

/// Rendering-context key for a dynamic token: `{{$status}}` and `$status`
/// both become `status`.
pub fn context_key(token: &str) -> String {
    token
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | '$'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Dynamic values keyed by their rendering-context name.
pub fn context_values(values: &DynamicTemplateValues) -> BTreeMap<String, String> {
    values
        .iter()
        .map(|(token, value)| (context_key(token), value.user_input.clone()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// Parse a `token=value` assignment such as `$status=draft`.
///
/// The token is stored with a leading `$` so it matches what discovery
/// reports, whether or not the caller typed one.
pub fn parse_dynamic_assignment(assignment: &str) -> TemplateResult<(String, DynamicValue)> {
    let (token, value) = assignment.split_once('=').ok_or_else(|| {
        TemplateError::InvalidInput(format!("expected token=value, got '{}'", assignment))
    })?;

    let key = context_key(token);
    if key.is_empty() {
        return Err(TemplateError::InvalidInput(format!(
            "missing token name in '{}'",
            assignment
        )));
    }
    Ok((format!("${}", key), DynamicValue::new(value)))
}

/// Everything needed to materialize one template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    pub input_name: String,
    pub selected_template_path: PathBuf,
    #[serde(default)]
    pub dynamic_template_values: DynamicTemplateValues,
}

impl UserInput {
    pub fn new(input_name: impl Into<String>, selected_template_path: impl Into<PathBuf>) -> Self {
        Self {
            input_name: input_name.into(),
            selected_template_path: selected_template_path.into(),
            dynamic_template_values: DynamicTemplateValues::new(),
        }
    }

    pub fn with_dynamic_value(mut self, token: impl Into<String>, value: impl Into<String>) -> Self {
        self.dynamic_template_values
            .insert(token.into(), DynamicValue::new(value));
        self
    }

    pub fn with_dynamic_values(mut self, values: DynamicTemplateValues) -> Self {
        self.dynamic_template_values.extend(values);
        self
    }

    /// Dynamic values keyed by their rendering-context name.
    pub fn context_values(&self) -> BTreeMap<String, String> {
        context_values(&self.dynamic_template_values)
    }

    /// Reject input the engine cannot act on.
    pub fn validate(&self) -> TemplateResult<()> {
        if self.input_name.trim().is_empty() {
            return Err(TemplateError::NoNameGiven);
        }
        if self.selected_template_path.as_os_str().is_empty()
            || !self.selected_template_path.is_dir()
        {
            return Err(TemplateError::NoTemplateSelected);
        }
        Ok(())
    }
}
