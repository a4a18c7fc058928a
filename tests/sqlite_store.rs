use chrono::{TimeZone, Utc};
use mapty::controller::WorkoutLog;
use mapty::database::SqliteStore;
use mapty::map::{FixedPosition, RecordingMap};
use mapty::render::RecordingList;
use mapty::types::{Coords, Kind};
use rstest::rstest;

type Log = WorkoutLog<SqliteStore, RecordingMap, RecordingList>;

fn open(path: &std::path::Path) -> Log {
    let store = SqliteStore::open(path).expect("open sqlite store");
    let mut log = Log::new(store, RecordingList::new());
    log.start(&FixedPosition(Some(Coords::new(0.0, 0.0))), RecordingMap::new())
        .expect("map should come up");
    log
}

#[rstest]
fn workouts_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mapty.sqlite3");
    let now = Utc.timestamp_millis_opt(1_713_088_800_789).unwrap();

    let id = {
        let mut log = open(&path);
        log.open_form(Coords::new(45.5, -73.6));
        log.select_kind(Kind::Cycling);
        let form = log.form_mut();
        form.distance = "42".into();
        form.duration = "120".into();
        form.elevation = "310".into();
        log.submit(now).unwrap()
    };
    assert_eq!(id, "1713088800789");

    let mut log = open(&path);
    assert_eq!(log.workouts().len(), 1);
    let w = &log.workouts()[0];
    assert_eq!(w.id(), id);
    assert_eq!(w.date(), now);
    assert_eq!(w.metric(), (21.0, "km/h"));
    assert_eq!(w.detail(), (310.0, "m"));

    assert!(log.delete(&id).unwrap());
    drop(log);

    let log = open(&path);
    assert!(log.workouts().is_empty());
}
