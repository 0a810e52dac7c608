use std::ffi::OsString;
use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::commands;
use crate::context::CliSession;
use crate::error::{CliError, ExitStatus};
use crate::formatter::{OutputFormat, emit_result};
use crate::util::Verbosity;

const NAME: &str = "docsmith";

pub fn run() -> ExitCode {
    init_tracing();
    match run_cli(std::env::args()) {
        Ok(code) => code,
        Err(err) => {
            err.print();
            err.exit_code()
        }
    }
}

/// Parses arguments, resolves the workspace, and dispatches to the command. Returns a
/// `sysexits`-compatible `ExitCode`.
pub fn run_cli<I, S>(args: I) -> Result<ExitCode, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let command = build_cli();
    let matches = command.try_get_matches_from(args)?;

    let verbosity = Verbosity {
        json: matches.get_flag("json"),
        verbose: matches.get_flag("verbose"),
    };
    let output = if verbosity.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let workspace_override = matches.get_one::<String>("workspace").cloned();

    // Neither command needs an existing workspace.
    match matches.subcommand() {
        Some(("init", sub)) => return emit_result(commands::init::run(workspace_override, sub)?, output),
        Some(("schema", _)) => return emit_result(commands::schema::run()?, output),
        _ => {}
    }

    let session = CliSession::bootstrap(workspace_override, verbosity)?;
    if session.verbosity.verbose {
        tracing::info!(
            workspace = %session.workspace_paths.root().display(),
            config = %session.workspace_paths.config_file().display(),
            snapshots = %session.workspace_paths.snapshots_dir().display(),
            storage_key = %session.config.storage_key,
            "resolved workspace context"
        );
    }

    let result = dispatch(&session, &matches)?;
    emit_result(result, output)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_cli() -> Command {
    Command::new(NAME)
        .about("Author hierarchical integration documentation")
        .arg(
            Arg::new("workspace")
                .long("workspace")
                .value_name("PATH")
                .global(true)
                .help("Specify the workspace root. Defaults to the nearest ancestor with a .docsmith folder."),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Emit one JSON object per command instead of human-readable text."),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Log workspace paths and configuration while running."),
        )
        .subcommand_required(true)
        .subcommand(commands::init::command())
        .subcommand(commands::status::command())
        .subcommand(commands::select::command())
        .subcommand(commands::module::command())
        .subcommand(commands::submodule::command())
        .subcommand(commands::step::command())
        .subcommand(commands::block::command())
        .subcommand(commands::export::command())
        .subcommand(commands::review::command())
        .subcommand(commands::schema::command())
}

fn dispatch(
    session: &CliSession,
    matches: &ArgMatches,
) -> Result<commands::CommandResult, CliError> {
    match matches.subcommand() {
        Some(("status", sub)) => commands::status::run(session, sub),
        Some(("select", sub)) => commands::select::run(session, sub),
        Some(("module", sub)) => commands::module::run(session, sub),
        Some(("submodule", sub)) => commands::submodule::run(session, sub),
        Some(("step", sub)) => commands::step::run(session, sub),
        Some(("block", sub)) => commands::block::run(session, sub),
        Some(("export", sub)) => commands::export::run(session, sub),
        Some(("review", sub)) => commands::review::run(session, sub),
        _ => Err(CliError::new("missing command", ExitStatus::Usage)),
    }
}
