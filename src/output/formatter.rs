use anyhow::{Context, Result};
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::handicap::{HandicapResult, RankedRound};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a Handicap Index for display. Plus handicaps (below zero) are
/// shown with a leading `+`, e.g. `-2.9` renders as `+2.9`.
pub fn format_index(index: f64) -> String {
    if index < 0.0 {
        format!("+{:.1}", -index)
    } else {
        format!("{:.1}", index)
    }
}

pub fn format_differential(differential: f64) -> String {
    format!("{:.1}", differential)
}

/// One player's line in the multi-player listing.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSummary {
    pub player: String,
    pub total_rounds: usize,
    /// `None` while the player has too few rounds for an index.
    pub handicap_index: Option<f64>,
    pub last_played: Option<NaiveDate>,
}

/// Format the headline block for a single player's result
pub fn format_summary(player: Option<&str>, result: &HandicapResult, use_colors: bool) -> String {
    let name = player.unwrap_or("(unnamed)");
    let index = format_index(result.handicap_index);

    if use_colors {
        format!(
            "{}\n  Handicap Index: {}\n  Rounds considered: {}\n  Differentials used: {}",
            name.bold(),
            index.green().bold(),
            result.total_rounds_considered,
            result.differentials_used_count.cyan()
        )
    } else {
        format!(
            "{}\n  Handicap Index: {}\n  Rounds considered: {}\n  Differentials used: {}",
            name, index, result.total_rounds_considered, result.differentials_used_count
        )
    }
}

/// Extra lines shown in verbose mode: the average before the 0.96 multiplier.
pub fn format_calculation(result: &HandicapResult) -> String {
    let average = result.average_differential();
    format!(
        "  Average of best {}: {:.2} x 0.96 = {:.2} -> {}",
        result.differentials_used_count,
        average,
        average * crate::handicap::INDEX_MULTIPLIER,
        format_index(result.handicap_index)
    )
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a course name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

// Date | Gross | Rating | Slope | Diff | Used, plus separators
const DATE_WIDTH: usize = 10;
const GROSS_WIDTH: usize = 5;
const RATING_WIDTH: usize = 6;
const SLOPE_WIDTH: usize = 5;
const DIFF_WIDTH: usize = 6;
const USED_WIDTH: usize = 4;
const SEPARATOR: &str = "  ";

/// Format ranked rounds as a table with a header row.
/// Columns: Date, Course, Gross, Rating, Slope, Diff, Used
pub fn format_rounds_table(rounds: &[RankedRound], use_colors: bool) -> String {
    if rounds.is_empty() {
        return "No rounds found.".to_string();
    }

    let fixed_width = DATE_WIDTH
        + GROSS_WIDTH
        + RATING_WIDTH
        + SLOPE_WIDTH
        + DIFF_WIDTH
        + USED_WIDTH
        + SEPARATOR.len() * 6;
    let longest = rounds
        .iter()
        .map(|r| r.round.course_name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Course".len());
    let course_width = match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => longest.min(width - fixed_width),
        Some(_) => longest.min(20),
        None => longest,
    };

    let header = format!(
        "{:<dw$}{sep}{:<cw$}{sep}{:>gw$}{sep}{:>rw$}{sep}{:>sw$}{sep}{:>fw$}{sep}{:<uw$}",
        "Date",
        "Course",
        "Gross",
        "Rating",
        "Slope",
        "Diff",
        "Used",
        sep = SEPARATOR,
        dw = DATE_WIDTH,
        cw = course_width,
        gw = GROSS_WIDTH,
        rw = RATING_WIDTH,
        sw = SLOPE_WIDTH,
        fw = DIFF_WIDTH,
        uw = USED_WIDTH,
    );

    let mut lines = Vec::with_capacity(rounds.len() + 1);
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    for ranked in rounds {
        let round = &ranked.round;
        let line = format!(
            "{:<dw$}{sep}{:<cw$}{sep}{:>gw$}{sep}{:>rw$.1}{sep}{:>sw$}{sep}{:>fw$}{sep}{:<uw$}",
            round.date.format("%Y-%m-%d").to_string(),
            truncate_name(&round.course_name, course_width),
            round.gross_score,
            round.course_rating,
            round.slope_rating,
            format_differential(ranked.differential),
            if ranked.used { "yes" } else { "" },
            sep = SEPARATOR,
            dw = DATE_WIDTH,
            cw = course_width,
            gw = GROSS_WIDTH,
            rw = RATING_WIDTH,
            sw = SLOPE_WIDTH,
            fw = DIFF_WIDTH,
            uw = USED_WIDTH,
        );
        if use_colors && ranked.used {
            lines.push(line.green().to_string());
        } else if use_colors {
            lines.push(line.dimmed().to_string());
        } else {
            lines.push(line);
        }
    }

    lines.join("\n")
}

/// Format every player's index, best first. Players without an index
/// are listed last as `n/a`.
/// Handicap column: 5 chars (fits "+10.0" and "54.0"), right-aligned
pub fn format_player_table(players: &[PlayerSummary], use_colors: bool) -> String {
    if players.is_empty() {
        return "No players found.".to_string();
    }

    let mut sorted: Vec<&PlayerSummary> = players.iter().collect();
    sorted.sort_by(|a, b| match (a.handicap_index, b.handicap_index) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    let index_width = 5;

    sorted
        .iter()
        .enumerate()
        .map(|(pos, summary)| {
            let pos_str = format!("{:>2}.", pos + 1);
            let index_str = summary
                .handicap_index
                .map(format_index)
                .unwrap_or_else(|| "n/a".to_string());
            let index_padded = format!("{:>width$}", index_str, width = index_width);
            let rounds_str = match summary.last_played {
                Some(date) => format!("({} rounds, last {})", summary.total_rounds, date),
                None => format!("({} rounds)", summary.total_rounds),
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}",
                    pos_str.dimmed(),
                    index_padded.bold(),
                    SEPARATOR,
                    summary.player,
                    SEPARATOR,
                    rounds_str.dimmed()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    pos_str, index_padded, SEPARATOR, summary.player, SEPARATOR, rounds_str
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format ranked rounds as tab-separated values for scripting
/// Columns: date, course, gross, rating, slope, differential, used (no headers, no colors)
pub fn format_tsv(rounds: &[RankedRound]) -> String {
    rounds
        .iter()
        .map(|ranked| {
            let round = &ranked.round;
            format!(
                "{}\t{}\t{}\t{}\t{}\t{:.2}\t{}",
                round.date,
                round.course_name,
                round.gross_score,
                round.course_rating,
                round.slope_rating,
                ranked.differential,
                ranked.used
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serialize a result as pretty-printed JSON
pub fn format_json(result: &HandicapResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize handicap result")
}
