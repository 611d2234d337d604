use pesca_core::db::open_db_in_memory;
use pesca_core::{
    CatchUpdate, Competition, CompetitionDetails, CompetitionRepository, CompetitionService,
    RepoResult, ServiceError, SqliteCompetitionRepository, ValidationError,
};
use rusqlite::Connection;
use std::cell::Cell;
use std::rc::Rc;

struct CountingRepository<'conn> {
    inner: SqliteCompetitionRepository<'conn>,
    puts: Rc<Cell<usize>>,
}

impl CompetitionRepository for CountingRepository<'_> {
    fn put(&self, competition: &Competition) -> RepoResult<()> {
        self.puts.set(self.puts.get() + 1);
        self.inner.put(competition)
    }

    fn get_all(&self) -> RepoResult<Vec<Competition>> {
        self.inner.get_all()
    }

    fn get_by_id(&self, id: &str) -> RepoResult<Option<Competition>> {
        self.inner.get_by_id(id)
    }

    fn delete(&self, id: &str) -> RepoResult<bool> {
        self.inner.delete(id)
    }
}

fn details(name: &str) -> CompetitionDetails {
    CompetitionDetails {
        name: name.to_string(),
        date: "2024-05-10".to_string(),
        location: "Lake A".to_string(),
        description: String::new(),
    }
}

fn service(conn: &Connection) -> CompetitionService<SqliteCompetitionRepository<'_>> {
    CompetitionService::new(SqliteCompetitionRepository::try_new(conn).unwrap())
}

#[test]
fn create_persists_active_competition() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let created = service.create_competition(&details("Spring Open")).unwrap();
    let loaded = service.get_competition(created.id()).unwrap().unwrap();

    assert_eq!(loaded, created);
    assert!(!loaded.is_finalized());
    assert_eq!(service.list_competitions().unwrap().len(), 1);
}

#[test]
fn create_with_invalid_date_is_not_persisted() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let mut invalid = details("Spring Open");
    invalid.date = "10/05/2024".to_string();
    let err = service.create_competition(&invalid).unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::InvalidDate(_))
    ));
    assert!(service.list_competitions().unwrap().is_empty());
}

#[test]
fn enroll_log_and_rank_through_storage() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let competition = service.create_competition(&details("Spring Open")).unwrap();

    let ana = service
        .enroll_participant(competition.id(), "Ana", "Ruiz")
        .unwrap();
    let luis = service
        .enroll_participant(competition.id(), "Luis", "")
        .unwrap();
    service
        .log_catch(competition.id(), ana.id(), 450.0, "trout")
        .unwrap();
    service
        .log_catch(competition.id(), ana.id(), 1200.0, "")
        .unwrap();
    service
        .log_catch(competition.id(), luis.id(), 1500.0, "pike")
        .unwrap();

    let ranking = service.ranking(competition.id()).unwrap();
    assert_eq!(ranking.len(), 2);
    assert_eq!(ranking[0].participant_id, ana.id());
    assert_eq!(ranking[0].full_name, "Ana Ruiz");
    assert_eq!(ranking[0].total_weight, 1650.0);
    assert_eq!(ranking[0].total_catches, 2);
    assert_eq!(ranking[1].position, 2);

    let statistics = service.statistics(competition.id()).unwrap();
    assert_eq!(statistics.catch_count, 3);
    assert_eq!(statistics.heaviest_catch, 1500.0);
    assert_eq!(statistics.lightest_catch, 450.0);
}

#[test]
fn log_catch_rejects_invalid_weight_and_unknown_participant() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let competition = service.create_competition(&details("Spring Open")).unwrap();
    let ana = service
        .enroll_participant(competition.id(), "Ana", "")
        .unwrap();

    let weight_err = service
        .log_catch(competition.id(), ana.id(), 0.0, "")
        .unwrap_err();
    assert!(matches!(
        weight_err,
        ServiceError::Validation(ValidationError::NonPositiveWeight(_))
    ));

    let participant_err = service
        .log_catch(competition.id(), "p_missing", 100.0, "")
        .unwrap_err();
    assert!(matches!(participant_err, ServiceError::ParticipantNotFound(id) if id == "p_missing"));

    assert_eq!(service.statistics(competition.id()).unwrap().catch_count, 0);
}

#[test]
fn update_and_remove_catch_are_persisted() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let competition = service.create_competition(&details("Spring Open")).unwrap();
    let ana = service
        .enroll_participant(competition.id(), "Ana", "")
        .unwrap();
    let catch = service
        .log_catch(competition.id(), ana.id(), 450.0, "trout")
        .unwrap();

    let updated = service
        .update_catch(
            competition.id(),
            ana.id(),
            catch.id(),
            CatchUpdate {
                weight: Some(500.0),
                fish_type: Some("brown trout".to_string()),
            },
        )
        .unwrap();
    assert!(updated);

    let loaded = service.get_competition(competition.id()).unwrap().unwrap();
    let stored = loaded
        .find_participant_by_id(ana.id())
        .unwrap()
        .find_catch(catch.id())
        .unwrap();
    assert_eq!(stored.weight(), 500.0);
    assert_eq!(stored.fish_type(), "brown trout");

    assert!(service
        .remove_catch(competition.id(), ana.id(), catch.id())
        .unwrap());
    assert!(!service
        .remove_catch(competition.id(), ana.id(), catch.id())
        .unwrap());
    assert_eq!(service.statistics(competition.id()).unwrap().catch_count, 0);
}

#[test]
fn remove_participant_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let competition = service.create_competition(&details("Spring Open")).unwrap();
    let ana = service
        .enroll_participant(competition.id(), "Ana", "")
        .unwrap();

    assert!(service.remove_participant(competition.id(), ana.id()).unwrap());
    assert!(!service.remove_participant(competition.id(), ana.id()).unwrap());
    assert!(service
        .get_competition(competition.id())
        .unwrap()
        .unwrap()
        .participants()
        .is_empty());
}

#[test]
fn finalized_competition_rejects_mutations_but_keeps_views() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let competition = service.create_competition(&details("Spring Open")).unwrap();
    let ana = service
        .enroll_participant(competition.id(), "Ana", "")
        .unwrap();
    service
        .log_catch(competition.id(), ana.id(), 450.0, "")
        .unwrap();

    let finalized = service.finalize_competition(competition.id()).unwrap();
    assert!(finalized.is_finalized());
    assert!(service
        .finalize_competition(competition.id())
        .unwrap()
        .is_finalized());

    let enroll_err = service
        .enroll_participant(competition.id(), "Luis", "")
        .unwrap_err();
    assert!(matches!(enroll_err, ServiceError::Finalized(id) if id == competition.id()));
    assert!(matches!(
        service.log_catch(competition.id(), ana.id(), 100.0, ""),
        Err(ServiceError::Finalized(_))
    ));
    assert!(matches!(
        service.remove_participant(competition.id(), ana.id()),
        Err(ServiceError::Finalized(_))
    ));

    assert_eq!(service.ranking(competition.id()).unwrap()[0].total_weight, 450.0);
    assert_eq!(service.statistics(competition.id()).unwrap().catch_count, 1);
}

#[test]
fn update_details_keeps_participants() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let competition = service.create_competition(&details("Spring Open")).unwrap();
    service
        .enroll_participant(competition.id(), "Ana", "")
        .unwrap();

    let mut edited = details("Spring Open 2024");
    edited.location = "Lake B".to_string();
    let updated = service
        .update_competition_details(competition.id(), &edited)
        .unwrap();

    assert_eq!(updated.name(), "Spring Open 2024");
    assert_eq!(updated.location(), "Lake B");
    assert_eq!(updated.participants().len(), 1);

    let mut blank = details("Ignored");
    blank.location = String::new();
    assert!(matches!(
        service.update_competition_details(competition.id(), &blank),
        Err(ServiceError::Validation(ValidationError::EmptyField("location")))
    ));
    let stored = service.get_competition(competition.id()).unwrap().unwrap();
    assert_eq!(stored.name(), "Spring Open 2024");
}

#[test]
fn unknown_competition_is_reported() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    assert!(service.get_competition("comp_missing").unwrap().is_none());
    assert!(matches!(
        service.enroll_participant("comp_missing", "Ana", ""),
        Err(ServiceError::CompetitionNotFound(id)) if id == "comp_missing"
    ));
    assert!(!service.delete_competition("comp_missing").unwrap());
}

#[test]
fn delete_competition_removes_record() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let competition = service.create_competition(&details("Spring Open")).unwrap();

    assert!(service.delete_competition(competition.id()).unwrap());
    assert!(service.get_competition(competition.id()).unwrap().is_none());
    assert!(matches!(
        service.ranking(competition.id()),
        Err(ServiceError::CompetitionNotFound(_))
    ));
}

#[test]
fn mutations_that_change_nothing_are_not_saved() {
    let conn = open_db_in_memory().unwrap();
    let puts = Rc::new(Cell::new(0));
    let service = CompetitionService::new(CountingRepository {
        inner: SqliteCompetitionRepository::try_new(&conn).unwrap(),
        puts: Rc::clone(&puts),
    });
    let competition = service.create_competition(&details("Spring Open")).unwrap();
    let ana = service
        .enroll_participant(competition.id(), "Ana", "")
        .unwrap();
    let catch = service
        .log_catch(competition.id(), ana.id(), 450.0, "trout")
        .unwrap();
    assert_eq!(puts.get(), 3);

    assert!(!service
        .remove_catch(competition.id(), ana.id(), "c_missing")
        .unwrap());
    assert!(!service
        .remove_participant(competition.id(), "p_missing")
        .unwrap());
    assert!(!service
        .update_catch(competition.id(), ana.id(), "c_missing", CatchUpdate::default())
        .unwrap());
    let ignored_weight = CatchUpdate {
        weight: Some(-1.0),
        fish_type: None,
    };
    assert!(service
        .update_catch(competition.id(), ana.id(), catch.id(), ignored_weight)
        .unwrap());
    assert_eq!(puts.get(), 3);

    service.finalize_competition(competition.id()).unwrap();
    service.finalize_competition(competition.id()).unwrap();
    assert_eq!(puts.get(), 4);
}

#[test]
fn catch_edits_store_trimmed_fish_type() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let competition = service.create_competition(&details("Spring Open")).unwrap();
    let ana = service
        .enroll_participant(competition.id(), "Ana", "")
        .unwrap();
    let catch = service
        .log_catch(competition.id(), ana.id(), 450.0, "  trout ")
        .unwrap();
    assert_eq!(catch.fish_type(), "trout");

    service
        .update_catch(
            competition.id(),
            ana.id(),
            catch.id(),
            CatchUpdate {
                weight: None,
                fish_type: Some("  pike  ".to_string()),
            },
        )
        .unwrap();
    let stored = service.get_competition(competition.id()).unwrap().unwrap();
    let stored_catch = stored
        .find_participant_by_id(ana.id())
        .unwrap()
        .find_catch(catch.id())
        .unwrap();
    assert_eq!(stored_catch.fish_type(), "pike");
}
