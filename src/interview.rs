//! The fixed SWOT interview and the step that rewrites it for a new business domain.

use std::sync::Arc;

use minijinja::{context, Environment};
use tracing::{debug, info, instrument};

use crate::completion::{CompletionProvider, CompletionRequest};
use crate::config::CompletionOptions;
use crate::error::SwotError;

/// The interview every domain shift starts from, written for a pizza shop.
pub const INTERVIEW_TEMPLATE: &str = "\
1. **Strengths**
    - What unique recipes or ingredients does the pizza shop use?
    - What are the skills and experience of the staff?
    - Does the pizza shop have a strong reputation in the local area?
    - Are there any unique features of the shop or its location that attract customers?
2. **Weaknesses**
    - What are the operational challenges of the pizza shop? (e.g., slow service, high staff turnover)
    - Are there financial constraints that limit growth or improvements?
    - Are there any gaps in the product offering?
    - Are there customer complaints or negative reviews that need to be addressed?
3. **Opportunities**
    - Is there potential for new products or services (e.g., catering, delivery)?
    - Are there under-served customer segments or market areas?
    - Can new technologies or systems enhance the business operations?
    - Are there partnerships or local events that can be leveraged for marketing?
4. **Threats**
    - Who are the major competitors and what are they offering?
    - Are there potential negative impacts due to changes in the local area (e.g., construction, closure of nearby businesses)?
    - Are there economic or industry trends that could impact the business negatively (e.g., increased ingredient costs)?
    - Is there any risk due to changes in regulations or legislation (e.g., health and safety, employment)?
";

const SHIFT_PROMPT: &str = "
{{ input }}

Convert the analysis provided above to the business domain of {{ domain }} (ALWAYS in the form of SWOT questions).
";

/// Fill the shift prompt with the interview and the target domain, both verbatim.
pub fn shift_prompt(template: &str, domain: &str) -> Result<String, minijinja::Error> {
    // render_str never autoescapes, so markup in either value is kept as typed.
    let env = Environment::new();
    env.render_str(SHIFT_PROMPT, context! { input => template, domain => domain })
}

/// Rewrites the interview questions for a user-supplied domain.
pub struct DomainShifter {
    provider: Arc<dyn CompletionProvider>,
    options: CompletionOptions,
    template: String,
}

impl DomainShifter {
    pub fn new(provider: Arc<dyn CompletionProvider>, options: CompletionOptions) -> Self {
        Self {
            provider,
            options,
            template: INTERVIEW_TEMPLATE.to_string(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    #[instrument(skip(self))]
    pub async fn shift(&self, domain: &str) -> Result<String, SwotError> {
        let prompt = shift_prompt(&self.template, domain)?;
        debug!(?prompt, "Constructed domain shift prompt");

        info!("Requesting SWOT questions for the new domain");
        let request = CompletionRequest {
            prompt,
            options: self.options.clone(),
        };
        let questions = self.provider.complete(&request).await?;
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_has_four_sections() {
        for section in ["**Strengths**", "**Weaknesses**", "**Opportunities**", "**Threats**"] {
            assert!(INTERVIEW_TEMPLATE.contains(section), "missing {section}");
        }
        let questions = INTERVIEW_TEMPLATE
            .lines()
            .filter(|line| line.trim_start().starts_with("- "))
            .count();
        assert_eq!(questions, 16);
    }

    #[test]
    fn test_shift_prompt_embeds_inputs_verbatim() {
        let prompt = shift_prompt(INTERVIEW_TEMPLATE, "construction management").unwrap();
        assert!(prompt.contains(INTERVIEW_TEMPLATE.trim_end()));
        assert!(prompt.contains(
            "Convert the analysis provided above to the business domain of construction management (ALWAYS in the form of SWOT questions)."
        ));
    }

    #[test]
    fn test_shift_prompt_does_not_escape_markup() {
        let prompt = shift_prompt("<b>Q</b>", "R&D | *labs* {{ x }}").unwrap();
        assert!(prompt.contains("<b>Q</b>"));
        assert!(prompt.contains("R&D | *labs* {{ x }}"));
    }

    #[test]
    fn test_empty_domain_passes_through() {
        let prompt = shift_prompt(INTERVIEW_TEMPLATE, "").unwrap();
        assert!(prompt.contains("business domain of  (ALWAYS"));
    }
}
