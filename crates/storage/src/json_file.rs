use std::{
    cell::RefCell,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use gymmemo_domain as domain;
use log::{debug, error};
use uuid::Uuid;

use crate::{Store, read_json, write_json};

/// Workout records kept in memory and persisted to a JSON file.
///
/// The file is read once when the store is opened and rewritten after
/// every mutation. A failed write is logged and otherwise ignored: the
/// in-memory state keeps the mutation.
pub struct JsonFile {
    path: PathBuf,
    records: RefCell<Vec<domain::WorkoutRecord>>,
}

impl JsonFile {
    /// Open the record store in `dir`. A missing file is an empty store.
    ///
    /// Stored fields outside their valid range are repaired with a warning
    /// instead of failing the whole store. The repaired values are written
    /// back with the next mutation.
    pub fn open(dir: &Path) -> Result<Self, domain::StorageError> {
        let path = Store::Records.path(dir);
        let records = read_json::<Vec<WorkoutRecord>>(&path)?
            .unwrap_or_default()
            .into_iter()
            .map(domain::WorkoutRecord::from)
            .collect::<Vec<_>>();
        debug!("loaded {} workout records from {}", records.len(), path.display());
        Ok(Self {
            path,
            records: RefCell::new(records),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) {
        let records = self
            .records
            .borrow()
            .iter()
            .map(WorkoutRecord::from)
            .collect::<Vec<_>>();
        if let Err(err) = write_json(&self.path, &records) {
            error!(
                "failed to save workout records to {}: {err}",
                self.path.display()
            );
        }
    }
}

impl domain::WorkoutRepository for JsonFile {
    fn read_workout_records(&self) -> Result<Vec<domain::WorkoutRecord>, domain::ReadError> {
        Ok(self.records.borrow().clone())
    }

    fn create_workout_record(
        &self,
        record: domain::WorkoutRecord,
    ) -> Result<domain::WorkoutRecord, domain::CreateError> {
        if self.records.borrow().iter().any(|r| r.id == record.id) {
            return Err(domain::CreateError::Conflict);
        }
        self.records.borrow_mut().push(record.clone());
        self.save();
        Ok(record)
    }

    fn delete_workout_record(
        &self,
        id: domain::WorkoutRecordID,
    ) -> Result<domain::WorkoutRecordID, domain::DeleteError> {
        let len = self.records.borrow().len();
        self.records.borrow_mut().retain(|r| r.id != id);
        if self.records.borrow().len() == len {
            return Err(domain::DeleteError::Storage(domain::StorageError::NotFound));
        }
        self.save();
        Ok(id)
    }
}

/// Persisted shape of a workout record.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct WorkoutRecord {
    pub id: Uuid,
    pub exercise: String,
    pub total_reps: u32,
    pub weight: f32,
    pub body_part: String,
    pub date: DateTime<Utc>,
}

impl From<domain::WorkoutRecord> for WorkoutRecord {
    fn from(value: domain::WorkoutRecord) -> Self {
        Self::from(&value)
    }
}

impl From<&domain::WorkoutRecord> for WorkoutRecord {
    fn from(value: &domain::WorkoutRecord) -> Self {
        Self {
            id: *value.id,
            exercise: value.exercise.to_string(),
            total_reps: value.total_reps.into(),
            weight: value.weight.into(),
            body_part: value.body_part.to_string(),
            date: value.date,
        }
    }
}

impl From<WorkoutRecord> for domain::WorkoutRecord {
    fn from(value: WorkoutRecord) -> Self {
        Self {
            id: value.id.into(),
            exercise: domain::ExerciseName::decode(&value.exercise),
            total_reps: domain::Reps::decode(value.total_reps),
            weight: domain::Weight::decode(value.weight),
            body_part: domain::BodyPart::decode(&value.body_part),
            date: value.date,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use gymmemo_domain::{WorkoutRepository, WorkoutService};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use crate::tests::data::{BENCH_PRESS, SQUAT, WORKOUT_RECORDS};

    use super::*;

    fn bench_press_json() -> serde_json::Value {
        json!({
            "id": "00000000-0000-0000-0000-000000000001",
            "exercise": "Bench Press",
            "total_reps": 10,
            "weight": 60.0,
            "body_part": "chest",
            "date": "2025-10-14T08:00:00Z"
        })
    }

    #[test]
    fn test_workout_record_serde() {
        let obj = WorkoutRecord::from(&*BENCH_PRESS);
        let serialized = json!(obj);
        assert_eq!(serialized, bench_press_json());
        let deserialized: WorkoutRecord = serde_json::from_value(serialized).unwrap();
        assert_eq!(deserialized, obj);
    }

    #[test]
    fn test_workout_record_into_domain() {
        for record in WORKOUT_RECORDS.iter() {
            assert_eq!(
                domain::WorkoutRecord::from(WorkoutRecord::from(record)),
                record.clone()
            );
        }
    }

    #[rstest]
    #[case("neck")]
    #[case("")]
    #[case("胸")]
    fn test_workout_record_into_domain_unknown_body_part(#[case] body_part: &str) {
        let mut obj = WorkoutRecord::from(&*SQUAT);
        obj.body_part = body_part.to_string();
        assert_eq!(
            domain::WorkoutRecord::from(obj).body_part,
            domain::BodyPart::Chest
        );
    }

    #[rstest]
    #[case("", 8, 82.5, "Unnamed", 8, 82.5)]
    #[case("Squat", 0, 82.5, "Squat", 1, 82.5)]
    #[case("Squat", 150, 82.5, "Squat", 100, 82.5)]
    #[case("Squat", 8, 42.0, "Squat", 8, 42.5)]
    #[case("Squat", 8, 201.0, "Squat", 8, 200.0)]
    fn test_workout_record_into_domain_invalid(
        #[case] exercise: &str,
        #[case] total_reps: u32,
        #[case] weight: f32,
        #[case] expected_exercise: &str,
        #[case] expected_total_reps: u32,
        #[case] expected_weight: f32,
    ) {
        let obj = WorkoutRecord {
            exercise: exercise.to_string(),
            total_reps,
            weight,
            ..WorkoutRecord::from(&*SQUAT)
        };
        let record = domain::WorkoutRecord::from(obj);
        assert_eq!(record.id, SQUAT.id);
        assert_eq!(record.exercise.as_str(), expected_exercise);
        assert_eq!(record.total_reps, domain::Reps::new(expected_total_reps).unwrap());
        assert_eq!(record.weight, domain::Weight::new(expected_weight).unwrap());
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFile::open(dir.path()).unwrap();
        assert_eq!(store.read_workout_records().unwrap(), vec![]);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_open_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(Store::Records.path(dir.path()), "{").unwrap();
        assert!(matches!(
            JsonFile::open(dir.path()),
            Err(domain::StorageError::Corrupt(_))
        ));
    }

    #[test]
    fn test_open_invalid_records() {
        let dir = tempfile::tempdir().unwrap();
        let mut off_step_weight = bench_press_json();
        off_step_weight["weight"] = json!(42.0);
        let mut too_many_reps = bench_press_json();
        too_many_reps["id"] = json!("00000000-0000-0000-0000-000000000002");
        too_many_reps["total_reps"] = json!(150);
        fs::write(
            Store::Records.path(dir.path()),
            json!([off_step_weight, too_many_reps]).to_string(),
        )
        .unwrap();

        let store = JsonFile::open(dir.path()).unwrap();

        let records = store.read_workout_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].weight, domain::Weight::new(42.5).unwrap());
        assert_eq!(records[1].total_reps, domain::Reps::MAX);

        store.create_workout_record(SQUAT.clone()).unwrap();
        let reopened = JsonFile::open(dir.path()).unwrap();
        assert_eq!(reopened.read_workout_records().unwrap()[..2].to_vec(), records);
    }

    #[test]
    fn test_open_with_unknown_body_part() {
        let dir = tempfile::tempdir().unwrap();
        let mut record = bench_press_json();
        record["body_part"] = json!("neck");
        fs::write(Store::Records.path(dir.path()), json!([record]).to_string()).unwrap();

        let store = JsonFile::open(dir.path()).unwrap();

        assert_eq!(
            store.read_workout_records().unwrap()[0].body_part,
            domain::BodyPart::Chest
        );
    }

    #[test]
    fn test_create_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFile::open(dir.path()).unwrap();

        for record in WORKOUT_RECORDS.iter() {
            assert_eq!(store.create_workout_record(record.clone()).unwrap(), *record);
        }

        let reopened = JsonFile::open(dir.path()).unwrap();
        assert_eq!(reopened.read_workout_records().unwrap(), *WORKOUT_RECORDS);
    }

    #[test]
    fn test_create_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFile::open(dir.path()).unwrap();
        store.create_workout_record(BENCH_PRESS.clone()).unwrap();

        assert!(matches!(
            store.create_workout_record(BENCH_PRESS.clone()),
            Err(domain::CreateError::Conflict)
        ));
        assert_eq!(store.read_workout_records().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFile::open(dir.path()).unwrap();
        for record in WORKOUT_RECORDS.iter() {
            store.create_workout_record(record.clone()).unwrap();
        }

        assert_eq!(store.delete_workout_record(BENCH_PRESS.id).unwrap(), BENCH_PRESS.id);

        let reopened = JsonFile::open(dir.path()).unwrap();
        assert_eq!(reopened.read_workout_records().unwrap(), vec![SQUAT.clone()]);
    }

    #[test]
    fn test_delete_twice() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFile::open(dir.path()).unwrap();
        store.create_workout_record(BENCH_PRESS.clone()).unwrap();

        store.create_workout_record(SQUAT.clone()).unwrap();

        store.delete_workout_record(BENCH_PRESS.id).unwrap();

        assert!(matches!(
            store.delete_workout_record(BENCH_PRESS.id),
            Err(domain::DeleteError::Storage(domain::StorageError::NotFound))
        ));
        assert_eq!(store.read_workout_records().unwrap(), vec![SQUAT.clone()]);
    }

    #[test]
    fn test_failed_save_keeps_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFile::open(dir.path()).unwrap();
        fs::create_dir(store.path().with_extension("json.tmp")).unwrap();

        assert_eq!(
            store.create_workout_record(BENCH_PRESS.clone()).unwrap(),
            *BENCH_PRESS
        );

        assert_eq!(
            store.read_workout_records().unwrap(),
            vec![BENCH_PRESS.clone()]
        );
        assert!(!store.path().exists());
    }

    #[test]
    fn test_service_query_order() {
        let dir = tempfile::tempdir().unwrap();
        let service = domain::Service::new(JsonFile::open(dir.path()).unwrap());
        service.create_workout_record(SQUAT.clone()).unwrap();
        service.create_workout_record(BENCH_PRESS.clone()).unwrap();

        assert_eq!(
            service
                .get_workout_records(&domain::Query::default())
                .unwrap(),
            vec![BENCH_PRESS.clone(), SQUAT.clone()]
        );
    }
}
