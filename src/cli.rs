use crate::types::Coords;
use crate::utils::parse_coords;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_DB: &str = "mapty.sqlite3";

#[derive(Parser, Debug)]
#[command(
    name = "mapty",
    about = "Log running and cycling workouts pinned to map locations"
)]
pub struct Cli {
    /// SQLite file the workout log is kept in.
    #[arg(long, env = "MAPTY_DB", default_value = DEFAULT_DB, global = true)]
    pub db: PathBuf,

    /// Your position, used to center the map. Without it the map is unavailable.
    #[arg(
        long,
        env = "MAPTY_HOME",
        value_name = "LAT,LNG",
        value_parser = parse_coords,
        allow_hyphen_values = true,
        global = true
    )]
    pub home: Option<Coords>,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Log a workout at a map location.
    Add {
        #[command(subcommand)]
        workout: AddCmd,
    },
    /// Print the workout list, newest first (the default command).
    List {
        /// Print the list markup instead of plain text.
        #[arg(long)]
        html: bool,
    },
    /// Print the map view and its markers.
    Map,
    /// Pan the map to a workout.
    Show { id: String },
    /// Delete a workout.
    Delete { id: String },
}

/// Numbers are taken as typed into the entry form and validated on submit.
#[derive(Subcommand, Debug)]
pub enum AddCmd {
    Running {
        /// Where on the map the workout happened.
        #[arg(
            long,
            value_name = "LAT,LNG",
            value_parser = parse_coords,
            allow_hyphen_values = true
        )]
        at: Coords,
        /// Distance in km.
        #[arg(long)]
        distance: String,
        /// Duration in minutes.
        #[arg(long)]
        duration: String,
        /// Steps per minute.
        #[arg(long)]
        cadence: String,
    },
    Cycling {
        /// Where on the map the workout happened.
        #[arg(
            long,
            value_name = "LAT,LNG",
            value_parser = parse_coords,
            allow_hyphen_values = true
        )]
        at: Coords,
        /// Distance in km.
        #[arg(long)]
        distance: String,
        /// Duration in minutes.
        #[arg(long)]
        duration: String,
        /// Elevation gain in metres; may be negative.
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        elevation: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[rstest]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[rstest]
    fn parses_cycling_with_negative_numbers() {
        let cli = Cli::try_parse_from([
            "mapty",
            "--home",
            "-33.9,151.2",
            "add",
            "cycling",
            "--at",
            "-33.8,151.1",
            "--distance",
            "20",
            "--duration",
            "60",
            "--elevation",
            "-15",
        ])
        .unwrap();
        assert_eq!(cli.home, Some(Coords::new(-33.9, 151.2)));
        match cli.cmd {
            Some(Cmd::Add {
                workout: AddCmd::Cycling { at, elevation, .. },
            }) => {
                assert_eq!(at, Coords::new(-33.8, 151.1));
                assert_eq!(elevation, "-15");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[rstest]
    fn no_subcommand_means_list() {
        let cli = Cli::try_parse_from(["mapty", "--db", "x.sqlite3"]).unwrap();
        assert!(cli.cmd.is_none());
        assert_eq!(cli.db, PathBuf::from("x.sqlite3"));
    }
}
