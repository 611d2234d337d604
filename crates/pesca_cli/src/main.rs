//! Command-line front end for competition records.
//!
//! # Responsibility
//! - Map each user action onto one `CompetitionService` call.
//! - Keep output deterministic for quick local checks.
//!
//! Ids printed by `create`, `enroll`, `log` and `show` are the ones the other
//! commands take.

use chrono::Local;
use log::error;
use pesca_core::db::open_db;
use pesca_core::{
    init_logging_from_config, report_file_name, CatchUpdate, Competition, CompetitionDetails,
    CompetitionReport, CompetitionRepository, CompetitionService, CoreConfig, ServiceError,
    SqliteCompetitionRepository,
};
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "usage: pesca_cli <command>
  ping
  list
  create <name> <date> <location> [description]
  edit <competition-id> <name> <date> <location> [description]
  delete <competition-id>
  show <competition-id>
  enroll <competition-id> <name> [family-name]
  withdraw <competition-id> <participant-id>
  log <competition-id> <participant-id> <weight-g> [fish-type]
  edit-catch <competition-id> <participant-id> <catch-id> <weight-g|-> [fish-type]
  delete-catch <competition-id> <participant-id> <catch-id>
  finalize <competition-id>
  ranking <competition-id>
  stats <competition-id>
  report <competition-id>
  export <competition-id> [directory]";

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Ping,
    List,
    Create(CompetitionDetails),
    Edit {
        competition_id: String,
        details: CompetitionDetails,
    },
    Delete {
        competition_id: String,
    },
    Show {
        competition_id: String,
    },
    Enroll {
        competition_id: String,
        name: String,
        family_name: String,
    },
    Withdraw {
        competition_id: String,
        participant_id: String,
    },
    Log {
        competition_id: String,
        participant_id: String,
        weight: f64,
        fish_type: String,
    },
    EditCatch {
        competition_id: String,
        participant_id: String,
        catch_id: String,
        update: CatchUpdate,
    },
    DeleteCatch {
        competition_id: String,
        participant_id: String,
        catch_id: String,
    },
    Finalize {
        competition_id: String,
    },
    Ranking {
        competition_id: String,
    },
    Stats {
        competition_id: String,
    },
    Report {
        competition_id: String,
    },
    Export {
        competition_id: String,
        directory: PathBuf,
    },
}

impl Command {
    fn parse(args: &[String]) -> Result<Self, String> {
        fn owned(value: &str) -> String {
            value.to_string()
        }

        let args = args.iter().map(String::as_str).collect::<Vec<_>>();
        let optional = |index: usize| args.get(index).copied().unwrap_or_default().to_string();

        let command = match args.as_slice() {
            [] | ["ping"] => Self::Ping,
            ["list"] => Self::List,
            ["create", name, date, location, ..] if args.len() <= 5 => {
                Self::Create(CompetitionDetails {
                    name: owned(name),
                    date: owned(date),
                    location: owned(location),
                    description: optional(4),
                })
            }
            ["edit", id, name, date, location, ..] if args.len() <= 6 => Self::Edit {
                competition_id: owned(id),
                details: CompetitionDetails {
                    name: owned(name),
                    date: owned(date),
                    location: owned(location),
                    description: optional(5),
                },
            },
            ["delete", id] => Self::Delete {
                competition_id: owned(id),
            },
            ["show", id] => Self::Show {
                competition_id: owned(id),
            },
            ["enroll", id, name, ..] if args.len() <= 4 => Self::Enroll {
                competition_id: owned(id),
                name: owned(name),
                family_name: optional(3),
            },
            ["withdraw", id, participant_id] => Self::Withdraw {
                competition_id: owned(id),
                participant_id: owned(participant_id),
            },
            ["log", id, participant_id, weight, ..] if args.len() <= 5 => Self::Log {
                competition_id: owned(id),
                participant_id: owned(participant_id),
                weight: parse_weight(weight)?,
                fish_type: optional(4),
            },
            ["edit-catch", id, participant_id, catch_id, weight, ..] if args.len() <= 6 => {
                Self::EditCatch {
                    competition_id: owned(id),
                    participant_id: owned(participant_id),
                    catch_id: owned(catch_id),
                    update: CatchUpdate {
                        weight: match *weight {
                            "-" => None,
                            value => Some(parse_weight(value)?),
                        },
                        fish_type: args.get(5).map(|value| value.to_string()),
                    },
                }
            }
            ["delete-catch", id, participant_id, catch_id] => Self::DeleteCatch {
                competition_id: owned(id),
                participant_id: owned(participant_id),
                catch_id: owned(catch_id),
            },
            ["finalize", id] => Self::Finalize {
                competition_id: owned(id),
            },
            ["ranking", id] => Self::Ranking {
                competition_id: owned(id),
            },
            ["stats", id] => Self::Stats {
                competition_id: owned(id),
            },
            ["report", id] => Self::Report {
                competition_id: owned(id),
            },
            ["export", id, ..] if args.len() <= 3 => Self::Export {
                competition_id: owned(id),
                directory: PathBuf::from(args.get(2).copied().unwrap_or(".")),
            },
            _ => return Err(USAGE.to_string()),
        };
        Ok(command)
    }
}

fn parse_weight(value: &str) -> Result<f64, String> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("weight must be a number of grams, got `{value}`"))
}

fn main() -> ExitCode {
    // A missing .env file is fine; variables may come from the shell.
    let _ = dotenvy::dotenv();
    let config = CoreConfig::from_env();

    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("warning: logging disabled: {err}");
    }

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    match Command::parse(&args).and_then(|command| run(&config, command)) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            error!("event=cli_run module=cli status=error");
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &CoreConfig, command: Command) -> Result<String, String> {
    if command == Command::Ping {
        return Ok(format!(
            "pesca_core ping={} version={}",
            pesca_core::ping(),
            pesca_core::core_version()
        ));
    }

    let conn = open_db(&config.db_path).map_err(|err| {
        format!(
            "failed to open competition store `{}`: {err}",
            config.db_path.display()
        )
    })?;
    let repo = SqliteCompetitionRepository::try_new(&conn).map_err(|err| err.to_string())?;
    execute(&CompetitionService::new(repo), command).map_err(|err| err.to_string())
}

/// Runs one command against `service` and returns the text to print.
fn execute<R: CompetitionRepository>(
    service: &CompetitionService<R>,
    command: Command,
) -> Result<String, CliError> {
    let output = match command {
        Command::Ping => format!("pesca_core ping={}", pesca_core::ping()),
        Command::List => {
            let competitions = service.list_competitions()?;
            if competitions.is_empty() {
                "no competitions stored".to_string()
            } else {
                competitions
                    .iter()
                    .map(summary_line)
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        Command::Create(details) => {
            let competition = service.create_competition(&details)?;
            format!("created {}", competition.id())
        }
        Command::Edit {
            competition_id,
            details,
        } => summary_line(&service.update_competition_details(&competition_id, &details)?),
        Command::Delete { competition_id } => {
            removed_message(service.delete_competition(&competition_id)?, &competition_id)
        }
        Command::Show { competition_id } => detail_text(&require(service, &competition_id)?),
        Command::Enroll {
            competition_id,
            name,
            family_name,
        } => {
            let participant = service.enroll_participant(&competition_id, &name, &family_name)?;
            format!("enrolled {}", participant.id())
        }
        Command::Withdraw {
            competition_id,
            participant_id,
        } => removed_message(
            service.remove_participant(&competition_id, &participant_id)?,
            &participant_id,
        ),
        Command::Log {
            competition_id,
            participant_id,
            weight,
            fish_type,
        } => {
            let catch = service.log_catch(&competition_id, &participant_id, weight, &fish_type)?;
            format!("logged {}", catch.id())
        }
        Command::EditCatch {
            competition_id,
            participant_id,
            catch_id,
            update,
        } => {
            if service.update_catch(&competition_id, &participant_id, &catch_id, update)? {
                format!("updated {catch_id}")
            } else {
                format!("not found: {catch_id}")
            }
        }
        Command::DeleteCatch {
            competition_id,
            participant_id,
            catch_id,
        } => removed_message(
            service.remove_catch(&competition_id, &participant_id, &catch_id)?,
            &catch_id,
        ),
        Command::Finalize { competition_id } => {
            summary_line(&service.finalize_competition(&competition_id)?)
        }
        Command::Ranking { competition_id } => {
            let rows = service.ranking(&competition_id)?;
            if rows.is_empty() {
                "no participants enrolled".to_string()
            } else {
                rows.iter()
                    .map(|row| {
                        format!(
                            "{}° {} | {} g | {} catch(es) | {}",
                            row.position,
                            row.full_name,
                            row.total_weight,
                            row.total_catches,
                            row.participant_id
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        Command::Stats { competition_id } => {
            let statistics = service.statistics(&competition_id)?;
            format!(
                "participants={} catches={} total={} g average={} g heaviest={} g lightest={} g",
                statistics.participant_count,
                statistics.catch_count,
                statistics.total_weight,
                statistics.average_weight_display(),
                statistics.heaviest_catch,
                statistics.lightest_catch
            )
        }
        Command::Report { competition_id } => {
            let competition = require(service, &competition_id)?;
            let generated_on = Local::now().date_naive();
            let report = CompetitionReport::build(&competition, generated_on);
            format!(
                "# {}\n{}",
                report_file_name(competition.name(), generated_on),
                report.render_text()
            )
        }
        Command::Export {
            competition_id,
            directory,
        } => {
            let competition = require(service, &competition_id)?;
            let generated_on = Local::now().date_naive();
            let path = directory.join(report_file_name(competition.name(), generated_on));
            let text = CompetitionReport::build(&competition, generated_on).render_text();
            std::fs::write(&path, text).map_err(|err| {
                CliError::Io(format!("failed to write `{}`: {err}", path.display()))
            })?;
            format!("exported {}", path.display())
        }
    };
    Ok(output)
}

/// Failure of one CLI command.
#[derive(Debug)]
enum CliError {
    Service(ServiceError),
    Io(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Service(err) => write!(f, "{err}"),
            Self::Io(message) => write!(f, "{message}"),
        }
    }
}

impl From<ServiceError> for CliError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

fn require<R: CompetitionRepository>(
    service: &CompetitionService<R>,
    competition_id: &str,
) -> Result<Competition, CliError> {
    service
        .get_competition(competition_id)?
        .ok_or_else(|| ServiceError::CompetitionNotFound(competition_id.to_string()).into())
}

fn removed_message(removed: bool, id: &str) -> String {
    if removed {
        format!("removed {id}")
    } else {
        format!("not found: {id}")
    }
}

fn summary_line(competition: &Competition) -> String {
    format!(
        "{} | {} | {} | {} | {} | participants={}",
        competition.id(),
        competition.name(),
        competition.date(),
        competition.location(),
        competition.state(),
        competition.participants().len()
    )
}

fn detail_text(competition: &Competition) -> String {
    let mut lines = vec![summary_line(competition)];
    for participant in competition.participants() {
        lines.push(format!(
            "  {} {} | catches={} | total={} g",
            participant.id(),
            participant.full_name(),
            participant.total_catches(),
            participant.total_weight()
        ));
        for catch in participant.catches() {
            lines.push(format!(
                "    {} | {} g | {} | {}",
                catch.id(),
                catch.weight(),
                catch.fish_type(),
                catch.timestamp().format("%d/%m/%Y %H:%M")
            ));
        }
    }
    lines.join("\n")
}
