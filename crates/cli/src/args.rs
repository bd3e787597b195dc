use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use clap::{ArgAction, ArgGroup};
use gymmemo_domain::{
    BodyPart, Filter, IntoEnumIterator, Order, Query, Reps, SortKey, Weight, WorkoutRecordID,
};

pub const DATA_DIR_VAR: &str = "GYMMEMO_DATA_DIR";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// --data-dir: directory holding records, settings and log
    pub data_dir: Option<PathBuf>,
    /// -v / --verbose: log debug messages to stderr
    pub verbose: bool,
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add {
        exercise: String,
        total_reps: Option<Reps>,
        weight: Option<Weight>,
        body_part: Option<BodyPart>,
        date: Option<DateTime<Utc>>,
    },
    List(Query),
    Delete(WorkoutRecordID),
    Today,
    Stats,
    Log,
    Settings,
    SetSetting { key: String, value: String },
}

fn labels<T: AsRef<str>>(values: impl Iterator<Item = T>) -> Vec<String> {
    values.map(|v| v.as_ref().to_string()).collect()
}

fn parse_reps(value: &str) -> Result<Reps, String> {
    Reps::try_from(value).map_err(|err| err.to_string())
}

fn parse_weight(value: &str) -> Result<Weight, String> {
    Weight::try_from(value).map_err(|err| err.to_string())
}

fn parse_body_part(value: &str) -> Result<BodyPart, String> {
    value
        .parse::<BodyPart>()
        .map_err(|_| format!("expected one of {}", labels(BodyPart::iter()).join(", ")))
}

fn parse_day(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|err| err.to_string())
}

/// Accepts RFC 3339 or a local "YYYY-MM-DD HH:MM".
fn parse_date(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Ok(date.with_timezone(&Utc));
    }
    let naive =
        NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M").map_err(|err| err.to_string())?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|date| date.with_timezone(&Utc))
        .ok_or_else(|| format!("{value} does not exist in the local timezone"))
}

fn parse_id(value: &str) -> Result<WorkoutRecordID, String> {
    WorkoutRecordID::try_from(value).map_err(|err| err.to_string())
}

fn parse_sort_key(value: &str) -> Result<SortKey, String> {
    value
        .parse::<SortKey>()
        .map_err(|_| format!("expected one of {}", labels(SortKey::iter()).join(", ")))
}

fn parse_order(value: &str) -> Result<Order, String> {
    value
        .parse::<Order>()
        .map_err(|_| format!("expected one of {}", labels(Order::iter()).join(", ")))
}

fn body_part_arg() -> clap::Arg {
    clap::Arg::new("body-part")
        .short('b')
        .long("body-part")
        .value_name("part")
        .value_parser(parse_body_part)
        .num_args(1)
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("gymmemo")
        .about("Log workouts and review today's training")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            clap::Arg::new("data-dir")
                .long("data-dir")
                .value_name("dir")
                .help(format!(
                    "Data directory (default: ${DATA_DIR_VAR} or $XDG_DATA_HOME/gymmemo)"
                ))
                .value_parser(clap::value_parser!(PathBuf))
                .global(true)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log debug messages to stderr")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            clap::Command::new("add")
                .about("Record a workout")
                .arg(
                    clap::Arg::new("exercise")
                        .index(1)
                        .required(true)
                        .help("Name of the exercise"),
                )
                .arg(
                    clap::Arg::new("reps")
                        .short('r')
                        .long("reps")
                        .value_name("n")
                        .help("Total repetitions (1-100)")
                        .value_parser(parse_reps)
                        .num_args(1),
                )
                .arg(
                    clap::Arg::new("weight")
                        .short('w')
                        .long("weight")
                        .value_name("kg")
                        .help("Weight in kg (0-200, steps of 2.5)")
                        .value_parser(parse_weight)
                        .num_args(1),
                )
                .arg(body_part_arg().help("Trained body part"))
                .arg(
                    clap::Arg::new("date")
                        .short('d')
                        .long("date")
                        .value_name("date")
                        .help("Date of the workout (default: now)")
                        .value_parser(parse_date)
                        .num_args(1),
                ),
        )
        .subcommand(
            clap::Command::new("list")
                .about("List workout records")
                .arg(
                    clap::Arg::new("sort")
                        .short('s')
                        .long("sort")
                        .value_name("key")
                        .help(format!(
                            "Sort key: {}",
                            labels(SortKey::iter()).join(", ")
                        ))
                        .value_parser(parse_sort_key)
                        .num_args(1),
                )
                .arg(
                    clap::Arg::new("order")
                        .short('o')
                        .long("order")
                        .value_name("order")
                        .help("Sort order: asc, desc")
                        .value_parser(parse_order)
                        .num_args(1),
                )
                .arg(body_part_arg().help("Only records of this body part"))
                .arg(
                    clap::Arg::new("on")
                        .long("on")
                        .value_name("YYYY-MM-DD")
                        .help("Only records of this day")
                        .value_parser(parse_day)
                        .num_args(1),
                )
                .arg(
                    clap::Arg::new("exercise")
                        .short('e')
                        .long("exercise")
                        .value_name("text")
                        .help("Only records whose exercise contains this text")
                        .num_args(1),
                )
                .group(ArgGroup::new("filter").args(["body-part", "on", "exercise"])),
        )
        .subcommand(
            clap::Command::new("delete")
                .about("Delete a workout record")
                .arg(
                    clap::Arg::new("id")
                        .index(1)
                        .required(true)
                        .value_parser(parse_id)
                        .help("ID of the record"),
                ),
        )
        .subcommand(clap::Command::new("today").about("Show today's summary and all records"))
        .subcommand(clap::Command::new("stats").about("Show record counts per body part"))
        .subcommand(clap::Command::new("log").about("Show recent log messages"))
        .subcommand(
            clap::Command::new("settings")
                .about("Show or change settings")
                .subcommand(
                    clap::Command::new("set")
                        .about("Change a setting")
                        .arg(
                            clap::Arg::new("key")
                                .index(1)
                                .required(true)
                                .value_parser(clap::builder::PossibleValuesParser::new(
                                    gymmemo_app::Settings::KEYS,
                                )),
                        )
                        .arg(clap::Arg::new("value").index(2).required(true)),
                ),
        )
}

fn matches_to_command(matches: &clap::ArgMatches) -> Command {
    match matches.subcommand() {
        Some(("add", m)) => Command::Add {
            exercise: m.get_one::<String>("exercise").cloned().unwrap_or_default(),
            total_reps: m.get_one::<Reps>("reps").copied(),
            weight: m.get_one::<Weight>("weight").copied(),
            body_part: m.get_one::<BodyPart>("body-part").copied(),
            date: m.get_one::<DateTime<Utc>>("date").copied(),
        },
        Some(("list", m)) => {
            let query = Query::new(
                m.get_one::<SortKey>("sort").copied().unwrap_or_default(),
                m.get_one::<Order>("order").copied().unwrap_or_default(),
            );
            let filter = m
                .get_one::<BodyPart>("body-part")
                .map(|b| Filter::BodyPart(*b))
                .or_else(|| m.get_one::<NaiveDate>("on").map(|d| Filter::Day(*d)))
                .or_else(|| {
                    m.get_one::<String>("exercise")
                        .map(|e| Filter::Exercise(e.clone()))
                });
            Command::List(match filter {
                Some(filter) => query.with_filter(filter),
                None => query,
            })
        }
        Some(("delete", m)) => Command::Delete(
            m.get_one::<WorkoutRecordID>("id")
                .copied()
                .unwrap_or_else(WorkoutRecordID::nil),
        ),
        Some(("stats", _)) => Command::Stats,
        Some(("log", _)) => Command::Log,
        Some(("settings", m)) => match m.subcommand() {
            Some(("set", m)) => Command::SetSetting {
                key: m.get_one::<String>("key").cloned().unwrap_or_default(),
                value: m.get_one::<String>("value").cloned().unwrap_or_default(),
            },
            _ => Command::Settings,
        },
        _ => Command::Today,
    }
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    Config {
        data_dir: matches.get_one::<PathBuf>("data-dir").cloned(),
        verbose: matches.get_flag("verbose"),
        command: matches_to_command(matches),
    }
}

/// Parse the command line. Prints help or the error and exits on failure.
pub fn parse_args() -> Config {
    matches_to_config(&build_clap_command().get_matches())
}

#[cfg(test)]
pub fn parse_args_from(args: &[&str]) -> Result<Config, clap::Error> {
    let matches = build_clap_command().try_get_matches_from(args)?;
    Ok(matches_to_config(&matches))
}

/// Resolve the data directory: `--data-dir`, then `$GYMMEMO_DATA_DIR`,
/// then `$XDG_DATA_HOME/gymmemo`, then `$HOME/.local/share/gymmemo`.
pub fn data_dir(
    explicit: Option<&Path>,
    var: impl Fn(&str) -> Option<OsString>,
) -> Option<PathBuf> {
    let lookup = |name: &str| var(name).filter(|value| !value.is_empty());
    if let Some(dir) = explicit {
        return Some(dir.to_path_buf());
    }
    if let Some(dir) = lookup(DATA_DIR_VAR) {
        return Some(PathBuf::from(dir));
    }
    if let Some(dir) = lookup("XDG_DATA_HOME") {
        return Some(Path::new(&dir).join("gymmemo"));
    }
    lookup("HOME").map(|home| {
        Path::new(&home)
            .join(".local")
            .join("share")
            .join("gymmemo")
    })
}
