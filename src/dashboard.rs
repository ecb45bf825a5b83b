//! Text rendering of the predictor and insights views, and the interactive
//! prompt that ties them together.

use std::fmt::Write as _;
use std::io::{BufRead, Write};

use colored::Colorize;
use tracing::debug;

use crate::algorithm::Algorithm;
use crate::assets::AssetStore;
use crate::error::{Result, SizeError};
use crate::measurements::{ClothingItem, Measurements};
use crate::pipeline::Recommendation;
use crate::stats::{Report, ReportRow, StatsBundle, format_accuracy};

const RULE: &str = "──────────────────────────────────────────────────────";

pub fn render_recommendation(rec: &Recommendation) -> String {
    let accuracy = rec
        .accuracy
        .map(format_accuracy)
        .unwrap_or_else(|| "n/a".to_string());
    format!(
        "Recommended {} Size: {}\n{} Model Accuracy: {}\n",
        rec.item,
        rec.size.bold().green(),
        rec.algorithm,
        accuracy
    )
}

/// `Algorithm | Accuracy` table of every model in the bundle.
pub fn render_accuracy_table(stats: &StatsBundle) -> String {
    let rows = stats.accuracy_rows();
    let width = rows
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0)
        .max("Algorithm".len());

    let mut out = String::new();
    let _ = writeln!(out, "Algorithm Performance Summary");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "{:<width$}  {:>9}", "Algorithm", "Accuracy");
    for (name, accuracy) in rows {
        let _ = writeln!(out, "{name:<width$}  {:>9}", format_accuracy(accuracy));
    }
    out
}

/// Per-class report table. The largest value of each column is highlighted.
/// The scalar `accuracy` row repeats its score in every column.
pub fn render_report(algorithm: Algorithm, report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Classification Report: {algorithm}");
    let _ = writeln!(out, "{RULE}");
    if report.is_empty() {
        let _ = writeln!(out, "no report recorded");
        return out;
    }

    let width = report.keys().map(String::len).max().unwrap_or(0).max(5);
    let maxima: Vec<f64> = (0..4)
        .map(|i| {
            report
                .values()
                .map(|row| row.column(i))
                .fold(f64::NEG_INFINITY, f64::max)
        })
        .collect();

    let _ = writeln!(
        out,
        "{:<width$}  {:>9}  {:>9}  {:>9}  {:>9}",
        "", "precision", "recall", "f1-score", "support"
    );
    for (label, row) in report {
        let _ = write!(out, "{label:<width$}");
        for (i, max) in maxima.iter().enumerate() {
            let value = row.column(i);
            let cell = if i == 3 && matches!(row, ReportRow::Metrics(_)) {
                format!("{value:>9.0}")
            } else {
                format!("{value:>9.2}")
            };
            if value == *max {
                let _ = write!(out, "  {}", cell.black().on_yellow());
            } else {
                let _ = write!(out, "  {cell}");
            }
        }
        out.push('\n');
    }
    out
}

/// Both analytics tables for `algorithm`.
pub fn render_insights(stats: &StatsBundle, algorithm: Algorithm) -> String {
    let mut out = render_accuracy_table(stats);
    out.push('\n');
    match stats.get(algorithm) {
        Some(s) => out.push_str(&render_report(algorithm, &s.report)),
        None => {
            let _ = writeln!(out, "No statistics recorded for {algorithm}");
        }
    }
    out
}

/// Listing of the algorithms and whether their artifacts are present.
pub fn render_algorithms(store: &AssetStore) -> String {
    let mut out = String::new();
    for alg in Algorithm::ALL {
        let status = if store.has_model(alg) {
            "ready".green()
        } else {
            "missing".red()
        };
        let accuracy = store
            .stats()
            .accuracy(alg)
            .map(format_accuracy)
            .unwrap_or_else(|| "n/a".to_string());
        let _ = writeln!(
            out,
            "{:<20} {:<20} {:>8}  {}",
            alg.display_name(),
            alg.key(),
            accuracy,
            status
        );
    }
    out
}

/// A parsed line of the interactive prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Predict {
        measurements: Measurements,
        algorithm: Option<Algorithm>,
        item: Option<ClothingItem>,
    },
    Insights(Option<Algorithm>),
    List,
    Help,
    Exit,
    Empty,
}

fn parse_number<T: std::str::FromStr>(field: &'static str, token: &str) -> Result<T> {
    token.parse().map_err(|_| SizeError::InvalidNumber {
        field,
        token: token.to_string(),
    })
}

/// Parse one prompt line.
///
/// `<weight> <height> <age> [algorithm] [item]`, `insights [algorithm]`,
/// `list`, `help`, `exit`. Multi-word algorithm names take underscores
/// (`random_forest`).
pub fn parse_command(line: &str) -> Result<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(&head) = tokens.first() else {
        return Ok(Command::Empty);
    };
    match head.to_lowercase().as_str() {
        "exit" | "quit" => return Ok(Command::Exit),
        "help" | "?" => return Ok(Command::Help),
        "list" => return Ok(Command::List),
        "insights" => {
            let algorithm = tokens.get(1).map(|t| t.parse()).transpose()?;
            return Ok(Command::Insights(algorithm));
        }
        _ => {}
    }

    if tokens.len() < 3 {
        return Err(SizeError::UnknownCommand(line.trim().to_string()));
    }
    let weight: f64 = parse_number("weight", tokens[0])?;
    let height: f64 = parse_number("height", tokens[1])?;
    let age: u32 = parse_number("age", tokens[2])?;
    let measurements = Measurements::new(weight, height, age)?;
    let algorithm = tokens.get(3).map(|t| t.parse()).transpose()?;
    let item = tokens.get(4).map(|t| t.parse()).transpose()?;
    Ok(Command::Predict {
        measurements,
        algorithm,
        item,
    })
}

const HELP: &str = "\
  <weight> <height> <age> [algorithm] [item]   recommend a size
  insights [algorithm]                        accuracy table and report
  list                                        algorithms and artifact status
  exit                                        leave
";

/// Read commands from `input` until `exit` or end of input. Request errors are
/// printed and the loop goes on.
pub fn run_interactive<R: BufRead, W: Write>(
    store: &AssetStore,
    mut input: R,
    mut output: W,
) -> Result<()> {
    let settings = store.settings();
    writeln!(output, "StyleFit size predictor. Type 'help' for commands.")?;
    let mut line = String::new();
    loop {
        write!(output, "> ")?;
        output.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let command = match parse_command(&line) {
            Ok(c) => c,
            Err(e) => {
                writeln!(output, "{} {e}", "error:".red())?;
                continue;
            }
        };
        debug!(?command, "Interactive command");

        match command {
            Command::Exit => break,
            Command::Empty => {}
            Command::Help => write!(output, "{HELP}")?,
            Command::List => write!(output, "{}", render_algorithms(store))?,
            Command::Insights(alg) => {
                let alg = alg.unwrap_or(settings.default_algorithm);
                write!(output, "{}", render_insights(store.stats(), alg))?;
            }
            Command::Predict {
                measurements,
                algorithm,
                item,
            } => {
                let algorithm = algorithm.unwrap_or(settings.default_algorithm);
                let item = item.unwrap_or(settings.default_item);
                match store.recommend(&measurements, algorithm, item) {
                    Ok(rec) => write!(output, "{}", render_recommendation(&rec))?,
                    Err(e) => writeln!(output, "{} {e}", "error:".red())?,
                }
            }
        }
    }
    Ok(())
}
