//! Template engine for advisory prompt generation

use crate::{AnsaError, Result};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Template engine wrapper
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    /// Create a new template engine
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();

        // Configure handlebars
        handlebars.set_strict_mode(false);

        Self { handlebars }
    }

    /// Render a template with data
    pub fn render(
        &self,
        template: &str,
        data: &HashMap<String, serde_json::Value>,
    ) -> Result<String> {
        self.handlebars
            .render_template(template, data)
            .map_err(|e| AnsaError::template(e.to_string()))
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Advisory prompt template
///
/// Triple-stache keeps the quotes around each match verbatim.
pub const ADVISORY_PROMPT_TEMPLATE: &str =
    r#"User asked: "{{{query}}}". Given these top matches: {{{matches}}}, suggest which one is best and why."#;

/// Compose the advisory prompt from a query and the returned question texts
///
/// Each question is double-quoted and the list is joined with ", ", matching
/// the wording the advisory endpoint is tuned for.
pub fn compose_advisory_prompt(query: &str, top_questions: &[String]) -> Result<String> {
    let matches = top_questions
        .iter()
        .map(|q| format!("\"{}\"", q))
        .collect::<Vec<_>>()
        .join(", ");

    let mut data: HashMap<String, serde_json::Value> = HashMap::new();
    data.insert(
        "query".to_string(),
        serde_json::Value::String(query.to_string()),
    );
    data.insert("matches".to_string(), serde_json::Value::String(matches));

    TemplateEngine::new().render(ADVISORY_PROMPT_TEMPLATE, &data)
}
