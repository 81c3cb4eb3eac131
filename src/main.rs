use clap::Parser;
use color_eyre::eyre::Result;
use std::{io, process, rc::Rc};

use charm_bug_tool::{
    BugToolError,
    cli::{self, Args},
    config::Config,
    tracker::{
        config::RemoteConfig, launchpad::Launchpad, manager::TrackerManager,
    },
    workflow::WorkflowContext,
};

/// Exit status for errors the operator can fix by changing the invocation.
const OPERATOR_ERROR_EXIT_CODE: i32 = 2;

fn initialize_logger(debug: bool) -> charm_bug_tool::Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("charm_bug_tool")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

async fn run(args: Args) -> charm_bug_tool::Result<()> {
    let config = Config::load(args.config.as_deref()).await?;

    let remote_config =
        RemoteConfig::from_settings(&config.tracker, args.dry_run);
    let launchpad = Launchpad::new(remote_config)?;
    let tracker = Rc::new(TrackerManager::new(Box::new(launchpad)));

    let ctx = WorkflowContext::connect(tracker, &config).await?;

    cli::execute(args.command, &ctx, &config, &mut io::stdout()).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    initialize_logger(args.debug)?;

    match run(args).await {
        Ok(()) => Ok(()),
        Err(BugToolError::Operator(msg)) => {
            eprintln!("charm-bug-tool: {msg}");
            process::exit(OPERATOR_ERROR_EXIT_CODE);
        }
        Err(err) => Err(err.into()),
    }
}
