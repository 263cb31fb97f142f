//! Turns interview answers into four strategy tables, one per SWOT quadrant.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::completion::{CompletionProvider, CompletionRequest};
use crate::config::CompletionOptions;
use crate::error::SwotError;
use crate::quadrant::Quadrant;
use crate::report::ReportOutline;

const LEVERS_PREAMBLE: &str = "\
Every business benefits from four courses of action to be used together or in combination:

1. Grow the existing business
2. Save money and time
3. Add completely new business
4. Prepare for the unknown

Growth as built upon a business' existing strengths is always a great place to start. \
And by finding any kinds of savings, those benefits can either be banked or reinvested. \
Sometimes a new line of business can be pursued with successful growth or savings initiatives. \
And as we all learned from the pandemic era, there's a certain benefit to businesses that are \
resilient to unexpected shifts that sit out their control. This leads us to a simplified way of \
thinking how best to tackle one's business challenges:

";

const UNSTRUCTURED_HINT: &str = "For more unstructured answers from users (such as in a paragraph \
that doesn't explicitly state whether the user is talking about 'strengths' or 'weaknesses' for \
example), attempt to extract the meaning in relation to the below formats.";

const EXAMPLE_ROWS: usize = 4;

/// Build the strategy instruction prompt.
///
/// The domain, answers and questions are embedded as written.
pub fn strategy_prompt(domain: &str, answers: &str, questions: Option<&str>) -> String {
    let mut prompt = String::from(LEVERS_PREAMBLE);

    for quadrant in Quadrant::ALL {
        prompt.push_str(&format!("* {}: {}\n", quadrant, quadrant.motto()));
    }

    prompt.push_str(&format!("\nHelp a business in the domain of \"{}\".\n\n", domain));

    if let Some(questions) = questions.filter(|q| !q.trim().is_empty()) {
        prompt.push_str("The user was asked the following SWOT interview questions:\n\n");
        prompt.push_str(questions.trim());
        prompt.push_str("\n\n");
    }

    prompt.push_str(&format!(
        "Address the following specific answers from the user: \"{}\". {}\n",
        answers, UNSTRUCTURED_HINT
    ));

    for (index, quadrant) in Quadrant::ALL.into_iter().enumerate() {
        let lead = if index == 0 { "Add" } else { "Before the next section add" };
        prompt.push_str(&format!(
            "\n{} a markdown ### heading entitled \"{}\"\n\n",
            lead,
            quadrant.heading()
        ));
        prompt.push_str(&format!(
            "Define at least four ways in which the business can {}.\n",
            quadrant.goal()
        ));
        prompt.push_str("The format should read in markdown format as:\n");
        prompt.push_str(&quadrant.table_header());
        prompt.push('\n');
        prompt.push_str(&quadrant.table_separator());
        prompt.push('\n');
        for _ in 0..EXAMPLE_ROWS {
            prompt.push_str(&quadrant.example_row());
            prompt.push('\n');
        }
    }

    prompt
}

/// Produces the markdown strategy report from a domain and the user's answers.
pub struct StrategySynthesizer {
    provider: Arc<dyn CompletionProvider>,
    options: CompletionOptions,
}

impl StrategySynthesizer {
    pub fn new(provider: Arc<dyn CompletionProvider>, options: CompletionOptions) -> Self {
        Self { provider, options }
    }

    /// Returns the model's markdown unmodified. Missing tables are logged, not rejected.
    #[instrument(skip(self, answers, questions))]
    pub async fn synthesize(
        &self,
        domain: &str,
        answers: &str,
        questions: Option<&str>,
    ) -> Result<String, SwotError> {
        let prompt = strategy_prompt(domain, answers, questions);
        debug!(?prompt, "Constructed strategy prompt");

        info!("Requesting strategy tables");
        let request = CompletionRequest {
            prompt,
            options: self.options.clone(),
        };
        let report = self.provider.complete(&request).await?;

        let outline = ReportOutline::inspect(&report);
        if !outline.is_complete() {
            warn!(
                tables = outline.table_count,
                missing = ?outline.missing(),
                "Strategy report is missing quadrant tables"
            );
        }
        Ok(report)
    }
}
