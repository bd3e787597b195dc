use log::{debug, error};

use crate::{
    Change, CreateError, DeleteError, Listeners, Query, ReadError, WorkoutRecord, WorkoutRecordID,
    WorkoutRepository, WorkoutService,
};

pub struct Service<R> {
    repository: R,
    listeners: Listeners,
}

impl<R> Service<R>
where
    R: WorkoutRepository,
{
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            listeners: Listeners::default(),
        }
    }

    /// Register a listener that is called after every successful insert or
    /// delete.
    pub fn subscribe(&self, listener: impl Fn(Change) + 'static) {
        self.listeners.subscribe(listener);
    }
}

macro_rules! log_on_error {
    ($result: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $result;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NotFound) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: WorkoutRepository> WorkoutService for Service<R> {
    fn get_workout_records(&self, query: &Query) -> Result<Vec<WorkoutRecord>, ReadError> {
        log_on_error!(
            self.repository.read_workout_records(),
            ReadError,
            "get",
            "workout records"
        )
        .map(|records| query.apply(records))
    }

    fn create_workout_record(&self, record: WorkoutRecord) -> Result<WorkoutRecord, CreateError> {
        let record = log_on_error!(
            self.repository.create_workout_record(record),
            CreateError,
            "create",
            "workout record"
        )?;
        self.listeners.notify(Change::Created(record.id));
        Ok(record)
    }

    fn delete_workout_record(
        &self,
        id: WorkoutRecordID,
    ) -> Result<WorkoutRecordID, DeleteError> {
        let id = log_on_error!(
            self.repository.delete_workout_record(id),
            DeleteError,
            "delete",
            "workout record"
        )?;
        self.listeners.notify(Change::Deleted(id));
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use chrono::{Days, Local, Utc};
    use pretty_assertions::assert_eq;

    use crate::{BodyPart, ExerciseName, Reps, StorageError, Weight};

    use super::*;

    #[derive(Default)]
    struct FakeRepository {
        records: RefCell<Vec<WorkoutRecord>>,
        fail: bool,
    }

    impl WorkoutRepository for FakeRepository {
        fn read_workout_records(&self) -> Result<Vec<WorkoutRecord>, ReadError> {
            if self.fail {
                return Err(ReadError::Storage(StorageError::Corrupt("foo".to_string())));
            }
            Ok(self.records.borrow().clone())
        }

        fn create_workout_record(
            &self,
            record: WorkoutRecord,
        ) -> Result<WorkoutRecord, CreateError> {
            if self.records.borrow().iter().any(|r| r.id == record.id) {
                return Err(CreateError::Conflict);
            }
            self.records.borrow_mut().push(record.clone());
            Ok(record)
        }

        fn delete_workout_record(
            &self,
            id: WorkoutRecordID,
        ) -> Result<WorkoutRecordID, DeleteError> {
            if self.fail {
                return Err(DeleteError::Storage(StorageError::Io(
                    std::io::ErrorKind::PermissionDenied.into(),
                )));
            }
            let len = self.records.borrow().len();
            self.records.borrow_mut().retain(|r| r.id != id);
            if self.records.borrow().len() == len {
                return Err(DeleteError::Storage(StorageError::NotFound));
            }
            Ok(id)
        }
    }

    fn record(exercise: &str, reps: u32, weight: f32, body_part: BodyPart) -> WorkoutRecord {
        WorkoutRecord::new(
            ExerciseName::new(exercise).unwrap(),
            Reps::new(reps).unwrap(),
            Weight::new(weight).unwrap(),
            body_part,
        )
    }

    #[test]
    fn test_create_and_query_round_trip() {
        let service = Service::new(FakeRepository::default());
        let record = record("Bench Press", 10, 60.0, BodyPart::Chest);

        let created = service.create_workout_record(record.clone()).unwrap();

        assert_eq!(created, record);
        assert_eq!(
            service.get_workout_records(&Query::default()).unwrap(),
            vec![record]
        );
    }

    #[test]
    fn test_create_conflict() {
        let service = Service::new(FakeRepository::default());
        let record = record("Bench Press", 10, 60.0, BodyPart::Chest);
        service.create_workout_record(record.clone()).unwrap();

        assert!(matches!(
            service.create_workout_record(record),
            Err(CreateError::Conflict)
        ));
    }

    #[test]
    fn test_delete_keeps_other_records() {
        let service = Service::new(FakeRepository::default());
        let now = Utc::now();
        let a = record("Bench Press", 10, 60.0, BodyPart::Chest).with_date(now);
        let b = record("Squat", 8, 80.0, BodyPart::Legs).with_date(now - Days::new(1));
        let c = record("Curl", 12, 15.0, BodyPart::Arms).with_date(now - Days::new(2));
        for r in [&a, &b, &c] {
            service.create_workout_record(r.clone()).unwrap();
        }

        assert_eq!(service.delete_workout_record(b.id).unwrap(), b.id);

        assert_eq!(
            service.get_workout_records(&Query::default()).unwrap(),
            vec![a, c]
        );
    }

    #[test]
    fn test_listeners_notified_on_mutation() {
        let service = Service::new(FakeRepository::default());
        let changes = Rc::new(RefCell::new(vec![]));
        {
            let changes = Rc::clone(&changes);
            service.subscribe(move |change| changes.borrow_mut().push(change));
        }
        let record = record("Bench Press", 10, 60.0, BodyPart::Chest);

        service.create_workout_record(record.clone()).unwrap();
        let _ = service.create_workout_record(record.clone());
        service.delete_workout_record(record.id).unwrap();

        assert_eq!(
            *changes.borrow(),
            vec![Change::Created(record.id), Change::Deleted(record.id)]
        );
    }

    #[test]
    fn test_errors_propagate_without_notification() {
        let service = Service::new(FakeRepository {
            records: RefCell::new(vec![]),
            fail: true,
        });
        let notified = Rc::new(RefCell::new(false));
        {
            let notified = Rc::clone(&notified);
            service.subscribe(move |_| *notified.borrow_mut() = true);
        }

        assert!(matches!(
            service.get_workout_records(&Query::default()),
            Err(ReadError::Storage(StorageError::Corrupt(_)))
        ));
        assert!(matches!(
            service.delete_workout_record(1.into()),
            Err(DeleteError::Storage(StorageError::Io(_)))
        ));
        assert!(!*notified.borrow());
    }

    #[test]
    fn test_delete_unknown_id_without_notification() {
        let service = Service::new(FakeRepository::default());
        let record = record("Bench Press", 10, 60.0, BodyPart::Chest);
        service.create_workout_record(record.clone()).unwrap();
        let changes = Rc::new(RefCell::new(vec![]));
        {
            let changes = Rc::clone(&changes);
            service.subscribe(move |change| changes.borrow_mut().push(change));
        }

        assert!(matches!(
            service.delete_workout_record(2.into()),
            Err(DeleteError::Storage(StorageError::NotFound))
        ));

        assert_eq!(*changes.borrow(), vec![]);
        assert_eq!(
            service.get_workout_records(&Query::default()).unwrap(),
            vec![record]
        );
    }

    #[test]
    fn test_aggregation() {
        let service = Service::new(FakeRepository::default());
        let now = Utc::now();
        service
            .create_workout_record(record("Bench Press", 10, 60.0, BodyPart::Chest).with_date(now))
            .unwrap();
        service
            .create_workout_record(
                record("Squat", 8, 80.0, BodyPart::Legs).with_date(now - Days::new(1)),
            )
            .unwrap();

        let stats = service.get_today_stats().unwrap();
        assert_eq!(stats.exercise_count, 1);
        assert_eq!(stats.total_reps, 10);

        let counts = service.get_body_part_counts().unwrap();
        assert_eq!(counts[&BodyPart::Chest], 1);
        assert_eq!(counts[&BodyPart::Legs], 1);
        assert_eq!(counts.values().sum::<usize>(), 2);
        assert_eq!(
            Local::now().date_naive(),
            service.get_workout_records(&Query::default()).unwrap()[0].local_date()
        );
    }
}
