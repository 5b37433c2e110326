//! Plain-text rendering of results and grades.

use crate::db::{Effect, QueryResult};
use crate::grading::{GradingOutcome, QuizReport};
use crate::quiz::QuizItem;
use crate::session::DatabaseSession;

/// Formats a table as a string for display.
pub fn format_table<H: AsRef<str>>(headers: &[H], rows: &[Vec<String>]) -> String {
    if headers.is_empty() {
        return String::new();
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.as_ref().chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let mut output = String::new();

    let header_line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h.as_ref(), width = widths[i]))
        .collect();
    output.push_str(&header_line.join(" │ "));
    output.push('\n');

    let separator: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    output.push_str(&separator.join("─┼─"));
    output.push('\n');

    for row in rows {
        let row_line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let width = widths.get(i).copied().unwrap_or(cell.chars().count());
                format!("{:width$}", cell, width = width)
            })
            .collect();
        output.push_str(&row_line.join(" │ "));
        output.push('\n');
    }

    output.trim_end().to_string()
}

/// Formats a statement result with a one-line summary of its effect.
pub fn format_result(result: &QueryResult) -> String {
    let rows: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| row.iter().map(|v| v.to_display_string()).collect())
        .collect();

    let summary = match &result.effect {
        Effect::Rows => format!("{} row(s) returned", result.row_count()),
        Effect::TableContents(table) => format!(
            "{} would contain {} row(s) (not saved)",
            table,
            result.row_count()
        ),
        Effect::Schema => format!(
            "schema would contain {} definition(s) (not saved)",
            result.row_count()
        ),
    };

    let table = format_table(&result.column_names(), &rows);
    if table.is_empty() {
        format!("{summary} in {:?}", result.execution_time)
    } else {
        format!("{table}\n\n{summary} in {:?}", result.execution_time)
    }
}

/// Formats one grading verdict.
pub fn format_outcome(outcome: &GradingOutcome) -> String {
    let mut lines = vec![if outcome.correct {
        "Correct!".to_string()
    } else {
        "Incorrect.".to_string()
    }];

    if let Some(error) = &outcome.user_error {
        lines.push(format!("Your answer: {error}"));
    } else if let Some(result) = outcome.user_result.as_ref().filter(|_| !outcome.correct) {
        lines.push(format!("Your answer returned:\n{}", format_result(result)));
    }

    if let Some(error) = &outcome.model_error {
        lines.push(format!("The reference answer is broken: {error}"));
    } else if let Some(result) = outcome.model_result.as_ref().filter(|_| !outcome.correct) {
        lines.push(format!("Expected:\n{}", format_result(result)));
    }

    lines.join("\n")
}

/// Formats a whole quiz report, question by question.
pub fn format_report(items: &[QuizItem], report: &QuizReport) -> String {
    let mut sections: Vec<String> = items
        .iter()
        .zip(&report.outcomes)
        .enumerate()
        .map(|(i, (item, outcome))| {
            format!(
                "Question {}: {}\n{}\nReference answer: {}",
                i + 1,
                item.question,
                format_outcome(outcome),
                item.answer
            )
        })
        .collect();

    sections.push(format!("Score: {}/{}", report.score(), report.total()));
    sections.join("\n\n")
}

/// Formats the cached catalog state of a session.
pub fn format_session(session: &DatabaseSession) -> String {
    let mut sections = vec![format!(
        "{} database with {} table(s): {}",
        session.rdbms().display_name(),
        session.tables().len(),
        session.tables().join(", ")
    )];

    sections.push(session.get_schema().to_sql());

    for (table, sample) in session.sample_data().iter() {
        let rows: Vec<Vec<String>> = sample
            .rows
            .iter()
            .map(|row| row.iter().map(|v| v.to_display_string()).collect())
            .collect();
        sections.push(format!(
            "{table}\n{}",
            format_table(&sample.column_names(), &rows)
        ));
    }

    sections.join("\n\n")
}
