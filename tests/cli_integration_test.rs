//! CLI integration tests for config and data orchestration.
//!
//! Tests cover:
//! - Engine config building (build_engine_config) with defaults and overrides
//! - Data path resolution and roster parsing
//! - Argument parsing for every subcommand
//! - Opening a session over real INI and CSV files on disk

mod common;

use clap::Parser;
use rosteredge::adapters::file_config_adapter::FileConfigAdapter;
use rosteredge::cli::{self, Cli, Command};
use rosteredge::domain::batch;
use rosteredge::domain::error::EngineError;
use rosteredge::domain::player::Position;
use rosteredge::ports::history_port::HistoryPort;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const VALID_INI: &str = r#"
[data]
path = ./data

[projection]
season_average = 0.40
last_three = 0.20
last_five = 0.20

[price]
magic_number = 5000

[valuation]
ceiling_multiplier = 1.3

[trade]
price_factor = 1000
weeks = 6

[output]
json = false
"#;

fn write_history(dir: &Path) {
    fs::write(
        dir.join("players.csv"),
        "id,name,position,team,price,breakeven,average,games\n\
         1,Alpha Ace,MID,COL,500000,90,100,5\n\
         2,Bravo Back,DEF,COL,200000,20,50,2\n",
    )
    .unwrap();
    fs::write(
        dir.join("scores.csv"),
        "player_id,round,score,opponent,venue,date\n\
         1,1,100,ESS,MCG,\n\
         1,2,100,ESS,MCG,\n\
         1,3,100,ESS,MCG,\n\
         1,4,100,ESS,MCG,\n\
         1,5,100,ESS,MCG,\n",
    )
    .unwrap();
    fs::write(
        dir.join("fixtures.csv"),
        "team,round,opponent,venue\n\
         COL,6,ESS,MCG\n\
         COL,7,ESS,MCG\n",
    )
    .unwrap();
}

mod engine_config {
    use super::*;

    #[test]
    fn overrides_and_defaults_merge() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let config = cli::build_engine_config(&adapter).unwrap();

        assert!((config.weights.season_average - 0.40).abs() < f64::EPSILON);
        assert!((config.weights.last_vs_opponent - 0.15).abs() < f64::EPSILON);
        assert!((config.price.magic_number - 5000.0).abs() < f64::EPSILON);
        assert!((config.valuation.ceiling_multiplier - 1.3).abs() < f64::EPSILON);
        assert!((config.valuation.floor_multiplier - 0.8).abs() < f64::EPSILON);
        assert!((config.trade.price_factor - 1000.0).abs() < f64::EPSILON);
        assert_eq!(config.trade.weeks, 6);
        assert_eq!(config.trade.rookie_max_price, 300_000);
    }

    #[test]
    fn valuation_shares_magic_number_with_price() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let config = cli::build_engine_config(&adapter).unwrap();
        assert!((config.valuation.magic_number - config.price.magic_number).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_config_is_all_defaults() {
        let adapter = FileConfigAdapter::from_string("").unwrap();
        let config = cli::build_engine_config(&adapter).unwrap();
        assert_eq!(config, rosteredge::domain::engine_config::EngineConfig::default());
    }

    #[test]
    fn invalid_value_is_rejected() {
        let adapter = FileConfigAdapter::from_string("[price]\nmagic_number = -1\n").unwrap();
        let err = cli::build_engine_config(&adapter).unwrap_err();
        assert!(matches!(err, EngineError::ConfigInvalid { key, .. } if key == "magic_number"));
    }

    #[test]
    fn oversized_weeks_is_rejected_not_truncated() {
        let adapter = FileConfigAdapter::from_string("[trade]\nweeks = 4294967301\n").unwrap();
        let err = cli::build_engine_config(&adapter).unwrap_err();
        assert!(matches!(err, EngineError::ConfigInvalid { key, .. } if key == "weeks"));
    }
}

mod resolution {
    use super::*;

    #[test]
    fn data_path_from_config() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let path = cli::resolve_data_path(None, &adapter).unwrap();
        assert_eq!(path, PathBuf::from("./data"));
    }

    #[test]
    fn data_override_wins() {
        let adapter = FileConfigAdapter::from_string("").unwrap();
        let path = cli::resolve_data_path(Some(Path::new("/tmp/season")), &adapter).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/season"));
    }

    #[test]
    fn data_path_missing() {
        let adapter = FileConfigAdapter::from_string("[projection]\n").unwrap();
        let err = cli::resolve_data_path(None, &adapter).unwrap_err();
        assert!(matches!(err, EngineError::ConfigMissing { section, .. } if section == "data"));
    }

    #[test]
    fn team_parsing() {
        assert_eq!(cli::resolve_team("3, 1,2").unwrap(), vec![3, 1, 2]);
        let err = cli::resolve_team("1,1").unwrap_err();
        assert!(matches!(err, EngineError::ConfigInvalid { key, .. } if key == "team"));
    }
}

mod arguments {
    use super::*;

    #[test]
    fn project_arguments() {
        let cli = Cli::try_parse_from([
            "rosteredge", "project", "-c", "cfg.ini", "-p", "7", "-r", "12", "--json",
        ])
        .unwrap();
        match cli.command {
            Command::Project {
                player,
                round,
                json,
                data,
                ..
            } => {
                assert_eq!((player, round), (7, 12));
                assert!(json);
                assert!(data.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn simulate_defaults_to_five_rounds() {
        let cli =
            Cli::try_parse_from(["rosteredge", "simulate", "-c", "c.ini", "-p", "1", "-r", "3"])
                .unwrap();
        assert!(matches!(cli.command, Command::Simulate { rounds: 5, .. }));
    }

    #[test]
    fn trade_uses_in_and_out_flags() {
        let cli = Cli::try_parse_from([
            "rosteredge", "trade", "-c", "c.ini", "--in", "4", "--out", "9", "--team", "9,10",
        ])
        .unwrap();
        match cli.command {
            Command::Trade {
                player_in,
                player_out,
                team,
                weeks,
                ..
            } => {
                assert_eq!((player_in, player_out), (4, 9));
                assert_eq!(team.as_deref(), Some("9,10"));
                assert!(weeks.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn trade_options_parses_position() {
        let cli = Cli::try_parse_from([
            "rosteredge",
            "trade-options",
            "-c",
            "c.ini",
            "--position",
            "ruc",
            "--cash",
            "150000",
            "--team",
            "1,2",
        ])
        .unwrap();
        match cli.command {
            Command::TradeOptions {
                position,
                cash,
                limit,
                ..
            } => {
                assert_eq!(position, Position::Ruc);
                assert_eq!(cash, 150_000);
                assert_eq!(limit, 10);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn bad_position_is_rejected() {
        let result = Cli::try_parse_from([
            "rosteredge", "trade-options", "-c", "c.ini", "--position", "gk", "--cash", "1",
            "--team", "1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn missing_config_is_rejected() {
        assert!(Cli::try_parse_from(["rosteredge", "validate"]).is_err());
    }
}

mod session {
    use super::*;

    #[test]
    fn load_config_missing_file() {
        let err = cli::load_config(Path::new("/nonexistent/rosteredge.ini")).unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse { .. }));
    }

    #[test]
    fn open_session_over_files() {
        let data = tempfile::TempDir::new().unwrap();
        write_history(data.path());
        let ini = write_temp_ini(&format!("[data]\npath = {}\n", data.path().display()));

        let session = cli::open_session(ini.path(), None).unwrap();
        assert_eq!(session.history.list_players().unwrap().len(), 2);

        let player = batch::require_player(&session.history, 1).unwrap();
        let p = batch::project_player(&session.engine.projector(), &session.history, &player, 6)
            .unwrap();
        assert_eq!(p.projected_score, 115);
        assert_eq!(p.confidence, 100);
    }

    #[test]
    fn data_override_skips_config_path() {
        let data = tempfile::TempDir::new().unwrap();
        write_history(data.path());
        let ini = write_temp_ini("[price]\nmagic_number = 4200\n");

        let session = cli::open_session(ini.path(), Some(data.path())).unwrap();
        assert_eq!(session.history.base_path(), data.path());
    }

    #[test]
    fn missing_data_dir_is_a_data_error() {
        let ini = write_temp_ini("[data]\npath = /nonexistent/season\n");
        let err = cli::open_session(ini.path(), None).err().unwrap();
        assert!(matches!(err, EngineError::Data { .. }));
    }

    #[test]
    fn session_config_drives_simulation() {
        let data = tempfile::TempDir::new().unwrap();
        write_history(data.path());
        let ini = write_temp_ini(&format!(
            "[data]\npath = {}\n[price]\nmagic_number = 3000\n",
            data.path().display()
        ));

        let session = cli::open_session(ini.path(), None).unwrap();
        let player = batch::require_player(&session.history, 1).unwrap();
        let (_, trajectory) = batch::simulate_player(
            &session.engine.projector(),
            &session.engine.simulator(),
            &session.history,
            &player,
            6,
            1,
        )
        .unwrap();
        // (115 - 90) x 3000 / 3
        assert_eq!(trajectory.total_change(), 25_000);
    }
}
