//! Command dispatch

use std::io::{self, BufRead, Write};

use clap::CommandFactory;
use clap_complete::generate;
use colored::Colorize;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::{AutoPlayer, Session};
use crate::cli::args::{Cli, Commands, ConfigCommands, TreeArgs};
use crate::cli::output;
use crate::cli::render::{self, FramePrinter, Palette};
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::Theme;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, try 'inorder --help'".to_string(),
        ));
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load(cli.config.as_deref())?;
    let container = ServiceContainer::new(settings);
    let theme = cli.theme.map(Theme::from);

    match command {
        Commands::Show { tree } => cmd_show(&container, tree, theme),
        Commands::Plan { tree } => cmd_plan(&container, tree, theme),
        Commands::Play { tree, delay_ms } => cmd_play(&container, tree, theme, *delay_ms),
        Commands::Step { tree, delay_ms } => cmd_step(&container, tree, theme, *delay_ms),
        Commands::Config { command } => cmd_config(&container, command),
        Commands::Completion { .. } => Ok(()),
    }
}

#[instrument(skip(container))]
fn cmd_show(container: &ServiceContainer, tree: &TreeArgs, theme: Option<Theme>) -> CliResult<()> {
    let session = container.session(tree.source(), theme)?;
    let palette = Palette::for_theme(session.theme());

    output::header("Tree");
    output::info(&render::hierarchy(session.tree(), session.playback(), &palette));
    output::info(&render::diagram(
        &session.node_views(),
        session.options().vertical_step,
        &palette,
    ));
    output::header("Plan");
    for (i, step) in session.plan().iter().enumerate() {
        output::detail(&format!("{:>2}. {}", i + 1, step));
    }
    output::info(&render::legend(&palette));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_plan(container: &ServiceContainer, tree: &TreeArgs, theme: Option<Theme>) -> CliResult<()> {
    let session = container.session(tree.source(), theme)?;
    output::info(&session.plan().iter().map(|s| s.value).join(" "));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_play(
    container: &ServiceContainer,
    tree: &TreeArgs,
    theme: Option<Theme>,
    delay_ms: Option<u64>,
) -> CliResult<()> {
    let mut session = container.session(tree.source(), theme)?;
    let player = container.auto_player(delay_ms);

    output::info(&render::frame(&session));
    session.subscribe(Box::new(FramePrinter::new(io::stdout())));
    let played = player.run(&mut session);
    debug!("played {} steps", played);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_step(
    container: &ServiceContainer,
    tree: &TreeArgs,
    theme: Option<Theme>,
    delay_ms: Option<u64>,
) -> CliResult<()> {
    let mut session = container.session(tree.source(), theme)?;
    let player = container.auto_player(delay_ms);

    output::info(&render::frame(&session));
    session.subscribe(Box::new(FramePrinter::new(io::stdout())));

    let stdin = io::stdin();
    run_interactive(&mut session, &player, stdin.lock(), io::stdout())
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&container.settings.to_toml()?),
        ConfigCommands::Init => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => {
                let state = if path.exists() { "exists" } else { "not found" };
                output::action("global", &format!("{} ({})", path.display(), state));
            }
            None => output::warning("no home directory, global config disabled"),
        },
    }
    Ok(())
}

/// Commands understood by the interactive loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepCommand {
    Next,
    Play,
    Reset,
    NewTree,
    Theme,
    Help,
    Quit,
}

impl StepCommand {
    /// Parses one input line. An empty line means "next".
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "" | "n" | "next" => Some(Self::Next),
            "p" | "play" => Some(Self::Play),
            "r" | "reset" => Some(Self::Reset),
            "g" | "new" => Some(Self::NewTree),
            "t" | "theme" => Some(Self::Theme),
            "h" | "?" | "help" => Some(Self::Help),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

const HELP: &str = "n/enter next | p play | r reset | g new tree | t theme | h help | q quit";

/// Reads commands line by line from `input` until quit or end of input.
///
/// Frames are printed by the session's observers; `out` only receives the
/// prompt and messages of the loop itself.
pub fn run_interactive<R: BufRead, W: Write>(
    session: &mut Session,
    player: &AutoPlayer,
    input: R,
    mut out: W,
) -> CliResult<()> {
    let write_err = |e| InfraError::io("write prompt", e);
    writeln!(out, "{}", HELP.dimmed()).map_err(write_err)?;

    for line in input.lines() {
        let line = line.map_err(|e| InfraError::io("read command", e))?;
        match StepCommand::parse(&line) {
            Some(StepCommand::Next) => {
                if session.advance().is_none() {
                    writeln!(out, "nothing left to visit, 'r' to reset").map_err(write_err)?;
                }
            }
            Some(StepCommand::Play) => {
                player.run(session);
            }
            Some(StepCommand::Reset) => session.reset(),
            Some(StepCommand::NewTree) => session.regenerate()?,
            Some(StepCommand::Theme) => {
                session.toggle_theme();
            }
            Some(StepCommand::Help) => writeln!(out, "{}", HELP).map_err(write_err)?,
            Some(StepCommand::Quit) => break,
            None => writeln!(out, "unknown command '{}', 'h' for help", line.trim())
                .map_err(write_err)?,
        }
    }
    Ok(())
}
