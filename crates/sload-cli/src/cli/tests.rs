use super::*;

fn parse(args: &[&str]) -> CliCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}

#[test]
fn cli_parse_load_urls() {
    match parse(&["sload", "load", "a.js", "b.json"]) {
        CliCommand::Load {
            args,
            mode,
            headers,
            no_validate,
        } => {
            assert_eq!(args, vec!["a.js", "b.json"]);
            assert!(mode.is_none());
            assert!(headers.is_empty());
            assert!(!no_validate);
        }
        _ => panic!("expected Load"),
    }
}

#[test]
fn cli_parse_load_flags() {
    match parse(&[
        "sload",
        "load",
        "--mode",
        "data",
        "--header",
        "Accept: application/json",
        "--header",
        "X-Trace: 1",
        "--no-validate",
        "dataPrefix=https://cdn/",
        "a.bin",
    ]) {
        CliCommand::Load {
            args,
            mode,
            headers,
            no_validate,
        } => {
            assert_eq!(mode.as_deref(), Some("data"));
            assert_eq!(headers, vec!["Accept: application/json", "X-Trace: 1"]);
            assert!(no_validate);
            assert_eq!(args, vec!["dataPrefix=https://cdn/", "a.bin"]);
        }
        _ => panic!("expected Load with flags"),
    }
}

#[test]
fn cli_load_requires_an_argument() {
    assert!(Cli::try_parse_from(["sload", "load"]).is_err());
}

#[test]
fn cli_parse_modes_and_config() {
    assert!(matches!(parse(&["sload", "modes"]), CliCommand::Modes));
    assert!(matches!(parse(&["sload", "config"]), CliCommand::Config));
}

#[test]
fn cli_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["sload", "fetch", "x"]).is_err());
}
