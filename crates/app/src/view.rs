use std::{collections::BTreeMap, fmt::Write, rc::Rc};

use chrono::{Local, NaiveDate};
use gymmemo_domain::{
    BodyPart, Change, Query, ReadError, Service, WorkoutRecord, WorkoutRepository,
    WorkoutService, body_part_counts, today_stats,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Today's totals followed by all records, most recent first.
    Home,
    Statistics,
}

impl View {
    /// Query the current records and render the view.
    pub fn render(self, service: &impl WorkoutService) -> Result<String, ReadError> {
        let records = service.get_workout_records(&Query::default())?;
        Ok(match self {
            View::Home => home(&records, Local::now().date_naive()),
            View::Statistics => statistics(&body_part_counts(&records)),
        })
    }
}

/// Re-render `view` after each change of the record set and pass the
/// output to `sink`.
pub fn refresh_on_change<R>(
    service: &Rc<Service<R>>,
    view: View,
    sink: impl Fn(Change, Result<String, ReadError>) + 'static,
) where
    R: WorkoutRepository + 'static,
{
    let service_ref = Rc::downgrade(service);
    service.subscribe(move |change| {
        if let Some(service) = service_ref.upgrade() {
            sink(change, view.render(&*service));
        }
    });
}

#[must_use]
pub fn header(todays_record_count: usize) -> String {
    format!("GymMemo\nToday's records: {todays_record_count}\n")
}

#[must_use]
pub fn home(records: &[WorkoutRecord], today: NaiveDate) -> String {
    let stats = today_stats(records, today);
    let mut output = header(stats.exercise_count);
    let _ = writeln!(
        output,
        "\n{:>6} exercises  {:>6} total reps  {:>8.1} kg volume\n",
        stats.exercise_count, stats.total_reps, stats.volume
    );
    if records.is_empty() {
        output.push_str("No records yet.\n");
    }
    for record in records {
        output.push_str(&row(record));
        output.push('\n');
    }
    output
}

#[must_use]
pub fn row(record: &WorkoutRecord) -> String {
    let mut details = format!("{} reps", record.total_reps);
    let weight = f32::from(record.weight);
    if weight > 0.0 {
        let _ = write!(details, " • {weight:.1} kg");
    }
    format!(
        "{}  {:<24} {:<20} [{}]  {}",
        record.date.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        record.exercise.as_str(),
        details,
        record.body_part,
        record.id
    )
}

#[must_use]
pub fn statistics(counts: &BTreeMap<BodyPart, usize>) -> String {
    counts.iter().fold(String::new(), |mut output, (body_part, count)| {
        let _ = writeln!(output, "{:<10} {count:>4}", body_part.to_string());
        output
    })
}
