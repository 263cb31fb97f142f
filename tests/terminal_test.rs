use async_trait::async_trait;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use swot_builder::config::CompletionOptions;
use swot_builder::interview::DomainShifter;
use swot_builder::quadrant::Quadrant;
use swot_builder::report::ReportOutline;
use swot_builder::strategy::StrategySynthesizer;
use swot_builder::terminal::run_interview;
use swot_builder::{CompletionProvider, CompletionRequest, ProviderError, Stage, Workflow};

/// Answers the shift prompt with questions and the strategy prompt with a four-table report.
struct CannedProvider {
    prompts: Mutex<Vec<String>>,
    fail_strategy: bool,
}

fn four_table_report() -> String {
    Quadrant::ALL
        .iter()
        .map(|q| {
            format!(
                "### {}\n\n{}\n{}\n| A | B | C | D |\n| E | F | G | H |\n| I | J | K | L |\n| M | N | O | P |\n",
                q.heading(),
                q.table_header(),
                q.table_separator()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl CompletionProvider for CannedProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        if request.prompt.contains("Convert the analysis provided above") {
            Ok("SWOT questions:\n1. **Strengths**\n    - What do customers love about your bread?".to_string())
        } else if self.fail_strategy {
            Err(ProviderError::Api {
                status: 503,
                message: "overloaded".to_string(),
            })
        } else {
            Ok(four_table_report())
        }
    }
}

fn workflow(fail_strategy: bool) -> (Workflow, Arc<CannedProvider>) {
    let provider = Arc::new(CannedProvider {
        prompts: Mutex::new(Vec::new()),
        fail_strategy,
    });
    let workflow = Workflow::new(
        DomainShifter::new(provider.clone(), CompletionOptions::domain_shift()),
        StrategySynthesizer::new(provider.clone(), CompletionOptions::strategy()),
    );
    (workflow, provider)
}

#[tokio::test]
async fn test_interview_reads_domain_and_answers_from_input() {
    let (workflow, provider) = workflow(false);
    let mut input = Cursor::new("bakery\nWe offer free samples.\n.\n");
    let mut output = Vec::new();

    let session = run_interview(&workflow, None, &mut input, &mut output).await.unwrap();

    assert_eq!(session.stage(), Stage::AnswersSubmitted);
    assert_eq!(session.domain, "bakery");
    assert_eq!(session.answers.as_deref(), Some("We offer free samples."));

    let printed = String::from_utf8(output).unwrap();
    assert!(printed.contains("Shifted SWOT Interview Questions to bakery"));
    assert!(printed.contains("What do customers love about your bread?"));
    assert!(printed.contains("Business strategy thinking based on SWOT analysis"));

    let outline = ReportOutline::inspect(&printed);
    assert_eq!(outline.quadrants, Quadrant::ALL.to_vec());

    let prompts = provider.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[1].contains("Help a business in the domain of \"bakery\"."));
}

#[tokio::test]
async fn test_interview_with_domain_flag_escapes_heading() {
    let (workflow, _) = workflow(false);
    let mut input = Cursor::new("answers until eof");
    let mut output = Vec::new();

    run_interview(&workflow, Some("bars | *pubs*".to_string()), &mut input, &mut output)
        .await
        .unwrap();

    let printed = String::from_utf8(output).unwrap();
    assert!(printed.contains(r"Shifted SWOT Interview Questions to bars \| \*pubs\*"));
    assert!(!printed.contains("Enter the business domain"));
}

#[tokio::test]
async fn test_interview_reports_provider_failure() {
    let (workflow, _) = workflow(true);
    let mut input = Cursor::new("bakery\nanswers\n");
    let mut output = Vec::new();

    let err = run_interview(&workflow, None, &mut input, &mut output)
        .await
        .unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("Could not build the strategy report"));
    assert!(message.contains("overloaded"));

    let printed = String::from_utf8(output).unwrap();
    assert!(!printed.contains("Business strategy thinking"));
}
