// Terminal rendition of the interview: the same session transitions as the web
// page, driven from stdin/stdout.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::info;

use crate::markdown::escape_inline;
use crate::session::{Action, Session, Workflow};

/// A line holding only this marker ends the answers.
pub const END_OF_ANSWERS: &str = ".";

pub async fn run_interview<R: BufRead, W: Write>(
    workflow: &Workflow,
    domain: Option<String>,
    input: &mut R,
    output: &mut W,
) -> Result<Session> {
    let mut session = Session::new();

    let domain = match domain {
        Some(domain) => domain,
        None => {
            write!(output, "Enter the business domain (e.g., construction management): ")?;
            output.flush()?;
            let mut line = String::new();
            input.read_line(&mut line).context("Failed to read the domain")?;
            line.trim().to_string()
        }
    };

    info!(%domain, "Starting terminal interview");
    session
        .apply(Action::CreateQuestions { domain: domain.clone() }, workflow)
        .await
        .context("Could not create the interview questions")?;

    writeln!(output, "\n### Shifted SWOT Interview Questions to {}\n", escape_inline(&domain))?;
    writeln!(output, "{}", session.shifted_questions.as_deref().unwrap_or_default())?;
    writeln!(
        output,
        "\nPlease provide your answers to the SWOT questions (finish with a line containing only '{}', or EOF):",
        END_OF_ANSWERS
    )?;
    output.flush()?;

    let answers = read_answers(input)?;
    session
        .apply(Action::SubmitAnswers { answers }, workflow)
        .await
        .context("Could not build the strategy report")?;

    writeln!(output, "\n### Business strategy thinking based on SWOT analysis\n")?;
    writeln!(output, "{}", session.report.as_deref().unwrap_or_default())?;
    output.flush()?;

    Ok(session)
}

fn read_answers<R: BufRead>(input: &mut R) -> Result<String> {
    let mut lines = Vec::new();
    for line in input.lines() {
        let line = line.context("Failed to read answers")?;
        if line.trim() == END_OF_ANSWERS {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n").trim().to_string())
}
