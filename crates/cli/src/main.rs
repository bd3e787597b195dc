#![warn(clippy::pedantic)]

use std::{
    env,
    path::Path,
    rc::Rc,
    sync::{Arc, Mutex},
};

use anyhow::Context;
use log::{LevelFilter, debug, error, warn};

use gymmemo_app::{
    self as app, SettingsRepository, SettingsService, View, WorkoutForm, log::Service as _, view,
};
use gymmemo_domain::{self as domain, WorkoutService};
use gymmemo_storage as storage;

use args::Command;

mod args;

fn main() -> anyhow::Result<()> {
    let config = args::parse_args();
    let dir = args::data_dir(config.data_dir.as_deref(), |name| env::var_os(name))
        .with_context(|| {
            format!(
                "unable to determine data directory, use --data-dir or set ${}",
                args::DATA_DIR_VAR
            )
        })?;
    init_logging(&dir, config.verbose);
    run(config.command, &dir)
}

/// Install the process-wide logger, persisting entries in `dir`.
fn init_logging(dir: &Path, verbose: bool) {
    let repository = storage::LocalStorage::new(dir);
    let level = if verbose {
        LevelFilter::Debug
    } else {
        repository
            .read_settings()
            .map_or(LevelFilter::Warn, |settings| settings.log_level)
    };
    if let Err(err) = app::log::init(Arc::new(Mutex::new(repository)), level) {
        eprintln!("failed to initialize logger: {err}");
    }
}

fn run(command: Command, dir: &Path) -> anyhow::Result<()> {
    let app_service = app::Service::new(storage::LocalStorage::new(dir));
    let settings = app_service.get_settings().unwrap_or_else(|err| {
        warn!("failed to read settings, using defaults: {err}");
        app::Settings::default()
    });
    debug!("using data directory {}", dir.display());

    match command {
        Command::Add {
            exercise,
            total_reps,
            weight,
            body_part,
            date,
        } => {
            let mut form = WorkoutForm::new(&settings);
            form.set_exercise(&exercise);
            if let Some(total_reps) = total_reps {
                form.set_total_reps(total_reps.into());
            }
            if let Some(weight) = weight {
                form.set_weight(weight.into());
            }
            if let Some(body_part) = body_part {
                form.set_body_part(body_part);
            }
            if let Some(date) = date {
                form.set_date(date);
            }
            let service = open(dir)?;
            view::refresh_on_change(&service, View::Home, print_view);
            form.submit(&*service)?;
        }
        Command::List(query) => {
            let records = open(dir)?.get_workout_records(&query)?;
            if records.is_empty() {
                println!("No records found.");
            }
            for record in &records {
                println!("{}", view::row(record));
            }
        }
        Command::Delete(id) => {
            let service = open(dir)?;
            view::refresh_on_change(&service, View::Home, print_view);
            service
                .delete_workout_record(id)
                .with_context(|| format!("failed to delete workout record {id}"))?;
        }
        Command::Today => print!("{}", View::Home.render(&*open(dir)?)?),
        Command::Stats => print!("{}", View::Statistics.render(&*open(dir)?)?),
        Command::Log => {
            for entry in app_service.get_log_entries()? {
                println!(
                    "{} {:<5} {}",
                    entry.time,
                    entry.level.as_str(),
                    entry.message
                );
            }
        }
        Command::Settings => {
            for key in app::Settings::KEYS {
                println!("{key} = {}", settings.get(key).unwrap_or_default());
            }
        }
        Command::SetSetting { key, value } => {
            let mut settings = settings;
            settings.set(&key, &value)?;
            app_service.set_settings(settings.clone())?;
            println!("{key} = {}", settings.get(&key).unwrap_or_default());
        }
    }

    Ok(())
}

fn open(dir: &Path) -> anyhow::Result<Rc<domain::Service<storage::JsonFile>>> {
    let repository = storage::JsonFile::open(dir)
        .with_context(|| format!("failed to load workout records from {}", dir.display()))?;
    Ok(Rc::new(domain::Service::new(repository)))
}

fn print_view(change: domain::Change, output: Result<String, domain::ReadError>) {
    match output {
        Ok(output) => print!("{output}"),
        Err(err) => error!("failed to render view after {change:?}: {err}"),
    }
}
