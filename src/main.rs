#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, Result, bail};
use clap::Parser;
use mapty::cli::{AddCmd, Cli, Cmd};
use mapty::controller::WorkoutLog;
use mapty::database::SqliteStore;
use mapty::map::{FixedPosition, RecordingMap};
use mapty::render::RecordingList;
use mapty::types::{Coords, Kind};
use mapty::utils;

#[macro_use]
extern crate mapty;

type Log = WorkoutLog<SqliteStore, RecordingMap, RecordingList>;

fn main() -> Result<()> {
    let cli = Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    let store = SqliteStore::open(&cli.db)?;
    let mut log = Log::new(store, RecordingList::new());
    dlog!("mode=start db={} home={:?}", cli.db.display(), cli.home);

    log.start(&FixedPosition(cli.home), RecordingMap::new())
        .context("Map unavailable; pass --home LAT,LNG or set MAPTY_HOME")?;

    match cli.cmd.unwrap_or(Cmd::List { html: false }) {
        Cmd::Add { workout } => add(&mut log, workout),
        Cmd::List { html } => {
            let rows = &log.list().rows;
            if rows.is_empty() {
                tracing::info!("no workouts logged yet");
            }
            for row in rows {
                if html {
                    println!("{}", row.to_html());
                } else {
                    println!("{row}");
                }
            }
            Ok(())
        }
        Cmd::Map => {
            print_map(&log);
            Ok(())
        }
        Cmd::Show { id } => {
            if log.focus(&id) {
                print_map(&log);
            } else {
                tracing::warn!(id = %id, "no workout with that id");
            }
            Ok(())
        }
        Cmd::Delete { id } => {
            if log.delete(&id)? {
                println!("deleted {id}");
            } else {
                tracing::warn!(id = %id, "no workout with that id");
            }
            Ok(())
        }
    }
}

fn add(log: &mut Log, cmd: AddCmd) -> Result<()> {
    let (at, kind, distance, duration, extra) = match cmd {
        AddCmd::Running {
            at,
            distance,
            duration,
            cadence,
        } => (at, Kind::Running, distance, duration, cadence),
        AddCmd::Cycling {
            at,
            distance,
            duration,
            elevation,
        } => (at, Kind::Cycling, distance, duration, elevation),
    };

    log.open_form(at);
    log.select_kind(kind);
    let form = log.form_mut();
    form.distance = distance;
    form.duration = duration;
    match kind {
        Kind::Running => form.cadence = extra,
        Kind::Cycling => form.elevation = extra,
    }

    let id = match log.submit_now() {
        Ok(id) => id,
        Err(e) => bail!("Workout not saved: {e}"),
    };
    if let Some(row) = log.list().rows.iter().find(|r| r.id == id) {
        println!("{row}");
    }
    Ok(())
}

fn print_map(log: &Log) {
    let Some(map) = log.map() else {
        return;
    };
    if let Some(view) = map.view {
        println!("view {} zoom {}", view.center, view.zoom);
    }
    for m in &map.markers {
        let class = m.popup.class_name.as_deref().unwrap_or("-");
        println!("{}\t{class}\t{}", fmt_coords(m.at), m.popup.content);
    }
}

fn fmt_coords(c: Coords) -> String {
    format!("{:.5},{:.5}", c.lat, c.lng)
}
