//! Competition summary report.
//!
//! # Responsibility
//! - Snapshot a competition into report sections.
//! - Render the sections as text and derive a safe export file name.
//!
//! # Invariants
//! - Catch rows are ordered heaviest first.
//! - The statistics section is present only when at least one catch exists.
//! - File names contain only `[A-Za-z0-9_-]`, plus the date and extension.

use crate::model::catch::Catch;
use crate::model::competition::{Competition, CompetitionState, CompetitionStatistics};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

const UNSPECIFIED_FISH_TYPE: &str = "Unspecified";
const REPORT_TITLE: &str = "Competition Report";

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static UNSAFE_FILE_CHAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_-]").expect("valid file char regex"));

/// Per-participant totals, in enrollment order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantLine {
    pub number: usize,
    pub full_name: String,
    pub total_catches: usize,
    pub total_weight: f64,
    /// Weight of the participant's best fish, `None` without catches.
    pub heaviest_catch: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankingLine {
    pub position: usize,
    pub full_name: String,
    pub total_weight: f64,
    pub total_catches: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchLine {
    pub participant: String,
    pub fish_type: String,
    pub weight: f64,
    /// Logging day, `DD/MM/YYYY`.
    pub logged_on: String,
}

/// Owned snapshot of everything an export document shows.
#[derive(Debug, Clone, PartialEq)]
pub struct CompetitionReport {
    pub name: String,
    pub date: NaiveDate,
    pub location: String,
    pub state: CompetitionState,
    pub description: Option<String>,
    pub participant_count: usize,
    pub participants: Vec<ParticipantLine>,
    pub ranking: Vec<RankingLine>,
    pub catches: Vec<CatchLine>,
    pub statistics: Option<CompetitionStatistics>,
    pub generated_on: NaiveDate,
}

impl CompetitionReport {
    /// Collects report sections from `competition`.
    pub fn build(competition: &Competition, generated_on: NaiveDate) -> Self {
        let participants = competition
            .participants()
            .iter()
            .enumerate()
            .map(|(index, participant)| ParticipantLine {
                number: index + 1,
                full_name: participant.full_name(),
                total_catches: participant.total_catches(),
                total_weight: participant.total_weight(),
                heaviest_catch: participant.heaviest_catch().map(Catch::weight),
            })
            .collect();

        let ranking = competition
            .ranking()
            .into_iter()
            .map(|entry| RankingLine {
                position: entry.position,
                full_name: entry.participant.full_name(),
                total_weight: entry.total_weight,
                total_catches: entry.total_catches,
            })
            .collect();

        let catches = competition
            .catches_by_weight()
            .into_iter()
            .map(|listing| CatchLine {
                participant: listing.participant.full_name(),
                fish_type: if listing.catch.fish_type().trim().is_empty() {
                    UNSPECIFIED_FISH_TYPE.to_string()
                } else {
                    listing.catch.fish_type().to_string()
                },
                weight: listing.catch.weight(),
                logged_on: listing.catch.timestamp().format("%d/%m/%Y").to_string(),
            })
            .collect::<Vec<_>>();

        let statistics = (!catches.is_empty()).then(|| competition.statistics());
        let description =
            Some(competition.description().to_string()).filter(|value| !value.is_empty());

        Self {
            name: competition.name().to_string(),
            date: competition.date(),
            location: competition.location().to_string(),
            state: competition.state(),
            description,
            participant_count: competition.participants().len(),
            participants,
            ranking,
            catches,
            statistics,
            generated_on,
        }
    }

    /// Renders the report as a plain-text document.
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl Display for CompetitionReport {
    fn fmt(&self, out: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(out, "{REPORT_TITLE}")?;
        writeln!(out, "{}", "=".repeat(REPORT_TITLE.len()))?;

        write_heading(out, "GENERAL INFORMATION")?;
        writeln!(out, "Name: {}", self.name)?;
        writeln!(out, "Date: {}", self.date.format("%B %-d, %Y"))?;
        writeln!(out, "Location: {}", self.location)?;
        writeln!(out, "State: {}", self.state)?;
        writeln!(out, "Participants enrolled: {}", self.participant_count)?;
        if let Some(description) = &self.description {
            writeln!(out, "Description: {description}")?;
        }

        if !self.participants.is_empty() {
            write_heading(out, "PARTICIPANTS")?;
            for line in &self.participants {
                write!(
                    out,
                    "{}. {} | catches: {} | total: {}",
                    line.number,
                    line.full_name,
                    line.total_catches,
                    format_weight(line.total_weight)
                )?;
                match line.heaviest_catch {
                    Some(weight) => writeln!(out, " | heaviest: {}", format_weight(weight))?,
                    None => writeln!(out)?,
                }
            }
        }

        if !self.ranking.is_empty() {
            write_heading(out, "FINAL RANKING")?;
            for line in &self.ranking {
                writeln!(
                    out,
                    "{} {} | {} | {} catch(es)",
                    format_position(line.position),
                    line.full_name,
                    format_weight(line.total_weight),
                    line.total_catches
                )?;
            }
        }

        if !self.catches.is_empty() {
            write_heading(out, "CATCH LOG")?;
            for line in &self.catches {
                writeln!(
                    out,
                    "{} | {} | {} | {}",
                    line.participant,
                    line.fish_type,
                    format_weight(line.weight),
                    line.logged_on
                )?;
            }
        }

        if let Some(statistics) = &self.statistics {
            write_heading(out, "STATISTICS")?;
            writeln!(out, "- Total catches: {}", statistics.catch_count)?;
            writeln!(
                out,
                "- Total weight: {}",
                format_weight(statistics.total_weight)
            )?;
            writeln!(
                out,
                "- Average weight per catch: {} g",
                statistics.average_weight_display()
            )?;
            writeln!(
                out,
                "- Heaviest catch: {}",
                format_weight(statistics.heaviest_catch)
            )?;
            writeln!(
                out,
                "- Lightest catch: {}",
                format_weight(statistics.lightest_catch)
            )?;
        }

        writeln!(out)?;
        writeln!(
            out,
            "Generated on {}",
            self.generated_on.format("%d/%m/%Y")
        )
    }
}

/// Weight with unit, e.g. `450 g` or `12.5 g`.
pub fn format_weight(grams: f64) -> String {
    format!("{grams} g")
}

/// Ranking placement label, e.g. `1°`.
pub fn format_position(position: usize) -> String {
    format!("{position}°")
}

/// Export file name: `Report_<name>_<YYYY-MM-DD>.txt`.
pub fn report_file_name(competition_name: &str, generated_on: NaiveDate) -> String {
    format!(
        "Report_{}_{}.txt",
        sanitize_file_name(competition_name),
        generated_on.format("%Y-%m-%d")
    )
}

fn sanitize_file_name(name: &str) -> String {
    let underscored = WHITESPACE_RE.replace_all(name.trim(), "_");
    UNSAFE_FILE_CHAR_RE.replace_all(&underscored, "").into_owned()
}

fn write_heading(out: &mut Formatter<'_>, title: &str) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "-".repeat(title.chars().count()))
}
