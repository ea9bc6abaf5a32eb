//! Interactive console front-end
//!
//! Reads one problem statement, runs the pipeline and prints each stage's
//! output as soon as that stage finishes. Generic over the reader and writer so it can be driven from
//! tests without a terminal.

use std::io::{self, BufRead, Write};

use promptforge_pipeline::{Pipeline, Stage, is_blank_problem};

const BANNER: &str = "=== promptforge ===\n\
This tool will help optimize your problem statement into an effective ChatGPT prompt.\n";

/// Console behaviour switches
#[derive(Debug, Clone, Default)]
pub struct ConsoleOptions {
    /// Use this problem instead of prompting for one
    pub problem: Option<String>,
    /// Do not wait for Enter after printing the optimized prompt
    pub no_wait: bool,
}

/// How a console session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleOutcome {
    /// Blank input; the pipeline was not called
    NoProblem,
    Completed,
    /// The pipeline failed and the error was printed
    Failed(String),
}

/// Run one console session.
///
/// # Errors
///
/// Returns an error only if reading input or writing output fails.
pub async fn run_console<R, W>(
    pipeline: &Pipeline,
    mut input: R,
    output: &mut W,
    options: &ConsoleOptions,
) -> io::Result<ConsoleOutcome>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "{BANNER}")?;

    let problem = match &options.problem {
        Some(problem) => problem.clone(),
        None => {
            write!(output, "Enter your problem or question: ")?;
            output.flush()?;
            read_line(&mut input)?
        }
    };

    if is_blank_problem(&problem) {
        writeln!(output, "No problem provided. Exiting.")?;
        return Ok(ConsoleOutcome::NoProblem);
    }

    writeln!(
        output,
        "\nProcessing your problem through the prompt optimization pipeline...\n"
    )?;
    output.flush()?;

    let mut write_error: Option<io::Error> = None;
    let result = pipeline
        .run_with_progress(&problem, |stage, text| {
            if write_error.is_none()
                && let Err(e) = write_stage_section(output, stage, text)
            {
                write_error = Some(e);
            }
        })
        .await;
    if let Some(e) = write_error {
        return Err(e);
    }

    match result {
        Ok(_) => {
            if !options.no_wait {
                writeln!(output, "\n(Press Enter to exit)")?;
                output.flush()?;
                read_line(&mut input)?;
            }
            Ok(ConsoleOutcome::Completed)
        }
        Err(err) => {
            let message = promptforge_error_redaction::redact_error_message(&err.to_string());
            writeln!(output, "Error: {message}")?;
            Ok(ConsoleOutcome::Failed(message))
        }
    }
}

/// Print one stage's section as soon as the stage finishes
fn write_stage_section<W: Write>(output: &mut W, stage: Stage, text: &str) -> io::Result<()> {
    match stage {
        Stage::Analyze => writeln!(output, "Analysis:\n{text}\n")?,
        Stage::EnrichContext => writeln!(output, "Context Enrichment:\n{text}\n")?,
        Stage::GenerateOptimizedPrompt => {
            writeln!(output, "=== OPTIMIZED PROMPT ===")?;
            writeln!(output, "{text}")?;
        }
    }
    output.flush()
}

/// Read one line; end of input reads as an empty line
fn read_line<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
