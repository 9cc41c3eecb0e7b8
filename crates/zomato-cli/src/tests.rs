use super::*;

#[test]
fn parses_locate_command() {
    let cli = Cli::try_parse_from(["zomato-cli", "locate"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Locate));
}

#[test]
fn missing_command_is_an_error() {
    assert!(Cli::try_parse_from(["zomato-cli"]).is_err());
}

#[test]
fn restaurants_defaults_to_one_page_and_ip_location() {
    let cli = Cli::try_parse_from(["zomato-cli", "restaurants"]).unwrap();
    match cli.command {
        Commands::Restaurants {
            pages,
            location,
            output,
        } => {
            assert_eq!(pages, 1);
            assert!(location.lat.is_none() && location.lon.is_none());
            assert!(!output.write_json);
            assert!(output.out_dir.is_none());
        }
        other => panic!("expected Restaurants, got: {other:?}"),
    }
}

#[test]
fn restaurants_accepts_negative_coordinates() {
    let cli = Cli::try_parse_from([
        "zomato-cli",
        "restaurants",
        "--pages",
        "3",
        "--lat",
        "40.7128",
        "--lon",
        "-74.0060",
        "--write-json",
        "--out-dir",
        "/tmp/out",
    ])
    .unwrap();
    match cli.command {
        Commands::Restaurants {
            pages,
            location,
            output,
        } => {
            assert_eq!(pages, 3);
            assert_eq!(location.lat.as_deref(), Some("40.7128"));
            assert_eq!(location.lon.as_deref(), Some("-74.0060"));
            assert!(output.write_json);
            assert_eq!(output.out_dir, Some(PathBuf::from("/tmp/out")));
        }
        other => panic!("expected Restaurants, got: {other:?}"),
    }
}

#[test]
fn lat_without_lon_is_rejected() {
    let result = Cli::try_parse_from(["zomato-cli", "restaurants", "--lat", "12.9"]);
    assert!(result.is_err());
}

#[test]
fn menu_defaults() {
    let cli = Cli::try_parse_from(["zomato-cli", "menu"]).unwrap();
    match cli.command {
        Commands::Menu { index, pages, .. } => {
            assert_eq!(index, 0);
            assert_eq!(pages, 3);
        }
        other => panic!("expected Menu, got: {other:?}"),
    }
}

#[test]
fn menu_index_override() {
    let cli = Cli::try_parse_from(["zomato-cli", "menu", "--index", "7", "--pages", "2"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Menu {
            index: 7,
            pages: 2,
            ..
        }
    ));
}
