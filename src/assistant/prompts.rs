//! Prompt templates for the synthesis step.

use crate::error::AppError;
use handlebars::Handlebars;
use serde_json::json;

const SYNTHESIS_CONTEXT: &str = "synthesis_context";
const SYNTHESIS_REQUEST: &str = "synthesis_request";

const SYNTHESIS_CONTEXT_TEMPLATE: &str = "Text Analysis: {{text}}\nImage Analysis: {{image}}";
const SYNTHESIS_REQUEST_TEMPLATE: &str = "Given the analyses, {{query}}";

/// Registry of the prompts the assistant renders.
///
/// Output is plain text for a model, so HTML escaping is disabled.
pub struct PromptTemplates {
    registry: Handlebars<'static>,
}

impl PromptTemplates {
    pub fn new() -> Result<Self, AppError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);

        for (name, source) in [
            (SYNTHESIS_CONTEXT, SYNTHESIS_CONTEXT_TEMPLATE),
            (SYNTHESIS_REQUEST, SYNTHESIS_REQUEST_TEMPLATE),
        ] {
            registry
                .register_template_string(name, source)
                .map_err(|e| AppError::TemplateRender {
                    name: name.to_string(),
                    message: e.to_string(),
                })?;
        }

        Ok(Self { registry })
    }

    /// System message carrying both analyses.
    pub fn synthesis_context(&self, text: &str, image: &str) -> Result<String, AppError> {
        Ok(self
            .registry
            .render(SYNTHESIS_CONTEXT, &json!({ "text": text, "image": image }))?)
    }

    /// User message restating the question.
    pub fn synthesis_request(&self, query: &str) -> Result<String, AppError> {
        Ok(self
            .registry
            .render(SYNTHESIS_REQUEST, &json!({ "query": query }))?)
    }
}
