//! Integration tests for traincore
//!
//! Each test works on a file-backed store in a temporary directory so that
//! reopening goes through the full startup path.

use std::path::PathBuf;

use chrono::NaiveDate;
use rusqlite::Connection;
use tempfile::TempDir;
use traincore::database::migrations::{column_names, migration_count};
use traincore::database::queries;
use traincore::{
    Console, ConsoleConfig, ConsoleError, CourseDraft, DurationType, ParticipantDraft, Store, Table,
    UploadNaming,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn config_in(temp_dir: &TempDir) -> ConsoleConfig {
    ConsoleConfig::default()
        .with_database_path(temp_dir.path().join("training.db"))
        .with_uploads_dir(temp_dir.path().join("uploads"))
}

fn db_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("training.db")
}

fn setup_console() -> (Console, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let console = Console::open(&config_in(&temp_dir)).expect("Failed to open console");
    (console, temp_dir)
}

fn intro_course() -> CourseDraft {
    CourseDraft {
        title: "Intro".to_string(),
        duration_type: DurationType::ShortTerm,
        start_date: date(2024, 1, 1),
        end_date: date(2024, 1, 31),
        ..Default::default()
    }
}

fn participant(name: &str, email: &str) -> ParticipantDraft {
    ParticipantDraft {
        name: name.to_string(),
        email: email.to_string(),
        ..Default::default()
    }
}

#[test]
fn test_reopen_keeps_schema_and_data() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_in(&temp_dir);

    let course_id = {
        let console = Console::open(&config).unwrap();
        console.add_course(&intro_course()).unwrap()
    };

    let expected: Vec<Vec<String>> = {
        let store = Store::open(&db_path(&temp_dir)).unwrap();
        let conn = store.connection().unwrap();
        Table::ALL.iter().map(|t| column_names(conn, *t).unwrap()).collect()
    };

    for _ in 0..3 {
        let store = Store::open(&db_path(&temp_dir)).unwrap();
        assert_eq!(store.ensure_schema().unwrap(), 0);
        let conn = store.connection().unwrap();
        let columns: Vec<Vec<String>> =
            Table::ALL.iter().map(|t| column_names(conn, *t).unwrap()).collect();
        assert_eq!(columns, expected);
        assert_eq!(store.applied_migrations().unwrap().len(), migration_count());
    }

    let console = Console::open(&config).unwrap();
    assert_eq!(console.get_course(course_id).unwrap().title, "Intro");
    assert_eq!(console.list_courses(DurationType::ShortTerm).unwrap().len(), 1);
}

#[test]
fn test_upgrade_from_first_revision_store() {
    let temp_dir = TempDir::new().unwrap();
    {
        let conn = Connection::open(db_path(&temp_dir)).unwrap();
        conn.execute_batch(
            "CREATE TABLE courses (id INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT NOT NULL,
                 description TEXT, date_created TEXT NOT NULL);
             CREATE TABLE participants (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL,
                 email TEXT UNIQUE NOT NULL, date_created TEXT NOT NULL);
             CREATE TABLE enrollments (id INTEGER PRIMARY KEY AUTOINCREMENT, course_id INTEGER,
                 participant_id INTEGER, date_enrolled TEXT NOT NULL);
             INSERT INTO courses (title, description, date_created)
                 VALUES ('Legacy', 'old row', '2023-05-01 08:00:00');
             INSERT INTO participants (name, email, date_created)
                 VALUES ('Old Timer', 'old@x.com', '2023-05-01 08:00:00');
             INSERT INTO enrollments (course_id, participant_id, date_enrolled)
                 VALUES (1, 1, '15/05/2023');",
        )
        .unwrap();
    }

    let console = Console::open(&config_in(&temp_dir)).unwrap();
    assert!(console.self_check().unwrap().passed());

    // Existing course picks up the column default
    let legacy = console.get_course(1).unwrap();
    assert_eq!(legacy.title, "Legacy");
    assert_eq!(legacy.duration_type, DurationType::LongTerm);
    assert_eq!(legacy.start_date, None);

    let enrollment = console.get_enrollment(1).unwrap();
    assert_eq!(enrollment.date_enrolled, "2023-05-15");

    let old = console.get_participant(1).unwrap();
    assert_eq!(old.phone, None);
    assert_eq!(old.dob, None);
}

#[test]
fn test_email_is_unique() {
    let (console, _temp_dir) = setup_console();

    console.add_participant(&participant("A", "a@x.com")).unwrap();
    let second = console.add_participant(&participant("B", "a@x.com"));
    assert!(matches!(second, Err(ConsoleError::DuplicateEmail(_))));

    let all = console.list_participants().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "A");
}

#[test]
fn test_deleting_course_leaves_enrollment() {
    let (console, _temp_dir) = setup_console();

    let course_id = console.add_course(&intro_course()).unwrap();
    let participant_id = console.add_participant(&participant("A", "a@x.com")).unwrap();
    let enrollment_id = console.enroll(course_id, participant_id, date(2024, 1, 2)).unwrap();

    console.delete_course(course_id).unwrap();

    let enrollment = console.get_enrollment(enrollment_id).unwrap();
    assert_eq!(enrollment.course_id, course_id);

    let orphans = console.orphaned_enrollments().unwrap();
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].id, enrollment_id);

    // The joined listing no longer shows it
    assert!(console.list_enrollments(DurationType::ShortTerm).unwrap().is_empty());
}

#[test]
fn test_enroll_and_list_by_type() {
    let (console, _temp_dir) = setup_console();

    let course_id = console.add_course(&intro_course()).unwrap();
    let participant_id = console.add_participant(&participant("A", "a@x.com")).unwrap();
    console.enroll(course_id, participant_id, date(2024, 1, 2)).unwrap();

    let rows = console.list_enrollments(DurationType::ShortTerm).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].participant_name, "A");
    assert_eq!(rows[0].course_title, "Intro");
    assert_eq!(rows[0].date_enrolled, "2024-01-02");

    assert!(console.list_enrollments(DurationType::LongTerm).unwrap().is_empty());

    let catalog = console.catalog(DurationType::ShortTerm).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].enrolled.len(), 1);
    assert_eq!(catalog[0].enrolled[0].email, "a@x.com");

    let dashboard = console.dashboard(date(2023, 12, 1)).unwrap();
    assert_eq!(dashboard.total_courses, 1);
    assert_eq!(dashboard.total_participants, 1);
    assert_eq!(dashboard.upcoming.len(), 1);
    assert_eq!(dashboard.upcoming[0].enrolled, vec!["A".to_string()]);
}

#[test]
fn test_course_date_boundaries() {
    let (console, _temp_dir) = setup_console();

    let same_day = CourseDraft {
        start_date: date(2024, 3, 1),
        end_date: date(2024, 3, 1),
        ..intro_course()
    };
    assert!(console.add_course(&same_day).is_ok());

    let backwards = CourseDraft {
        start_date: date(2024, 3, 2),
        end_date: date(2024, 3, 1),
        ..intro_course()
    };
    assert!(matches!(
        console.add_course(&backwards),
        Err(ConsoleError::Validation(_))
    ));
    assert_eq!(console.list_courses(DurationType::ShortTerm).unwrap().len(), 1);
}

#[test]
fn test_self_check_on_fresh_store() {
    let (console, _temp_dir) = setup_console();
    let report = console.self_check().unwrap();
    assert!(report.passed());
    assert_eq!(report.applied_migrations, migration_count());
    assert!(report.summary().starts_with("PASS"));
}

#[test]
fn test_tabular_query() {
    let (console, _temp_dir) = setup_console();
    console.add_participant(&participant("A", "a@x.com")).unwrap();
    console.add_participant(&participant("B", "b@x.com")).unwrap();

    let conn = console.store().connection().unwrap();
    let result = queries::query(
        conn,
        "SELECT name, email FROM participants WHERE email = ?1",
        ["b@x.com"],
    )
    .unwrap();
    assert_eq!(result.columns, vec!["name".to_string(), "email".to_string()]);
    assert_eq!(result.len(), 1);
    assert_eq!(result.get(0, "name").and_then(|c| c.as_text()), Some("B"));

    let empty = queries::query(conn, "SELECT id FROM courses", []).unwrap();
    assert!(empty.is_empty());
    assert_eq!(empty.columns, vec!["id".to_string()]);
}

#[test]
fn test_course_image_upload() {
    let (console, temp_dir) = setup_console();

    let stored = console
        .upload_course_image("banner.png", b"\x89PNG", UploadNaming::Original)
        .unwrap();
    assert!(temp_dir.path().join("uploads").join("banner.png").exists());

    let id = console
        .add_course(&CourseDraft {
            image_url: Some(stored.clone()),
            ..intro_course()
        })
        .unwrap();
    assert_eq!(console.get_course(id).unwrap().image_url, Some(stored));

    let rejected = console.upload_course_image("notes.txt", b"hi", UploadNaming::Original);
    assert!(matches!(rejected, Err(ConsoleError::Upload(_))));
}
