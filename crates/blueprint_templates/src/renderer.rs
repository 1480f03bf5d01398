//! Template content rendering.
//!
//! File contents go through two passes: the text is rendered as a Handlebars
//! template with one helper per case transform, then the literal name and
//! date tokens (`__pascalCase_name__`, `__currentYear__`, ...) are
//! substituted into the output. The name never reaches the template parser. Each [`TemplateRenderer`] owns its own Handlebars registry, so
//! independent renderers never share state.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use handlebars::{handlebars_helper, no_escape, Handlebars, Template};
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::input::{context_values, DynamicTemplateValues};
use crate::transforms::{apply_date_transforms, apply_name_transforms, date_components, CaseTransform};

/// Result of rendering one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedContent {
    /// Content produced by the template engine.
    Rendered(String),
    /// The file could not be rendered and must be copied unmodified.
    Verbatim { reason: String },
}

fn helper_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

handlebars_helper!(kebab_case: |v: Json| CaseTransform::Kebab.apply(&helper_text(v)));
handlebars_helper!(pascal_case: |v: Json| CaseTransform::Pascal.apply(&helper_text(v)));
handlebars_helper!(snake_case: |v: Json| CaseTransform::Snake.apply(&helper_text(v)));
handlebars_helper!(lower_dot_case: |v: Json| CaseTransform::LowerDot.apply(&helper_text(v)));
handlebars_helper!(camel_case: |v: Json| CaseTransform::Camel.apply(&helper_text(v)));
handlebars_helper!(upper_case: |v: Json| CaseTransform::Upper.apply(&helper_text(v)));
handlebars_helper!(lower_case: |v: Json| CaseTransform::Lower.apply(&helper_text(v)));
handlebars_helper!(upper_snake_case: |v: Json| CaseTransform::UpperSnake.apply(&helper_text(v)));

/// Template renderer with case helpers bound at construction.
pub struct TemplateRenderer {
    registry: Handlebars<'static>,
    mustache_pattern: Regex,
    dollar_pattern: Regex,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Create a new template renderer.
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(no_escape);

        registry.register_helper(CaseTransform::Kebab.helper_name(), Box::new(kebab_case));
        registry.register_helper(CaseTransform::Pascal.helper_name(), Box::new(pascal_case));
        registry.register_helper(CaseTransform::Snake.helper_name(), Box::new(snake_case));
        registry.register_helper(CaseTransform::LowerDot.helper_name(), Box::new(lower_dot_case));
        registry.register_helper(CaseTransform::Camel.helper_name(), Box::new(camel_case));
        registry.register_helper(CaseTransform::Upper.helper_name(), Box::new(upper_case));
        registry.register_helper(CaseTransform::Lower.helper_name(), Box::new(lower_case));
        registry.register_helper(
            CaseTransform::UpperSnake.helper_name(),
            Box::new(upper_snake_case),
        );

        Self {
            registry,
            mustache_pattern: Regex::new(r"\{\{[^{}]*\}\}").expect("mustache pattern is valid"),
            // A `$` that starts a token: at the start of the mustache body or
            // after whitespace or an opening parenthesis.
            dollar_pattern: Regex::new(r"(\{\{[~#/^>&]?\s*|[\s(])\$").expect("dollar pattern is valid"),
        }
    }

    /// Build the rendering context for one materialization.
    ///
    /// Exposes `name`, each date component (`currentYear`, ...) and every
    /// dynamic value under its `$`-less key.
    pub fn build_context(
        &self,
        name: &str,
        dynamic_values: &BTreeMap<String, String>,
        date: &NaiveDateTime,
    ) -> Value {
        let mut context = Map::new();
        for (key, value) in dynamic_values {
            context.insert(key.clone(), Value::String(value.clone()));
        }
        for (key, value) in date_components(date) {
            context.insert(key.to_string(), Value::String(value));
        }
        context.insert("name".to_string(), Value::String(name.to_string()));
        Value::Object(context)
    }

    /// Rewrite `{{$token}}` style references to the `$`-less context keys.
    pub fn normalize_dynamic_tokens(&self, content: &str) -> String {
        if !content.contains('$') {
            return content.to_string();
        }
        self.mustache_pattern
            .replace_all(content, |caps: &regex::Captures| {
                self.dollar_pattern.replace_all(&caps[0], "$1").into_owned()
            })
            .into_owned()
    }

    /// Render text already prepared with [`Self::build_context`].
    pub fn render_with_context(
        &self,
        raw_content: &str,
        name: &str,
        date: &NaiveDateTime,
        context: &Value,
    ) -> RenderedContent {
        let content = self.normalize_dynamic_tokens(raw_content);

        if let Err(e) = Template::compile(&content) {
            return RenderedContent::Verbatim {
                reason: format!("template syntax error: {}", e),
            };
        }

        match self.registry.render_template(&content, context) {
            Ok(rendered) => RenderedContent::Rendered(apply_date_transforms(
                &apply_name_transforms(&rendered, name),
                date,
            )),
            Err(e) => {
                debug!("Render error, keeping content verbatim: {}", e);
                RenderedContent::Verbatim {
                    reason: format!("render error: {}", e),
                }
            }
        }
    }

    /// Render file content for `name`, dynamic values and reference date.
    pub fn render_template_content(
        &self,
        raw_content: &str,
        name: &str,
        dynamic_values: &DynamicTemplateValues,
        date: &NaiveDateTime,
    ) -> RenderedContent {
        let context = self.build_context(name, &context_values(dynamic_values), date);
        self.render_with_context(raw_content, name, date, &context)
    }
}
