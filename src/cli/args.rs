//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::application::services::TreeSource;
use crate::domain::Theme;

/// Step through the inorder traversal of a small binary tree
#[derive(Parser, Debug)]
#[command(name = "inorder")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file, layered over the global config
    #[arg(
        short,
        long,
        global = true,
        env = "INORDER_CONFIG",
        value_hint = ValueHint::FilePath
    )]
    pub config: Option<PathBuf>,

    /// Color scheme (default from config)
    #[arg(long, value_enum, global = true)]
    pub theme: Option<ThemeArg>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Draw the tree and list its traversal plan
    Show {
        #[command(flatten)]
        tree: TreeArgs,
    },

    /// Print the inorder value sequence
    Plan {
        #[command(flatten)]
        tree: TreeArgs,
    },

    /// Auto-play the traversal to the end
    Play {
        #[command(flatten)]
        tree: TreeArgs,
        /// Delay between steps (default from config)
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Step through the traversal interactively
    Step {
        #[command(flatten)]
        tree: TreeArgs,
        /// Delay between steps when playing (default from config)
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Which tree to start from.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct TreeArgs {
    /// Use a random tree instead of the sample tree
    #[arg(short, long)]
    pub random: bool,

    /// Seed for the random tree (implies --random)
    #[arg(short, long)]
    pub seed: Option<u64>,
}

impl TreeArgs {
    pub fn source(&self) -> TreeSource {
        if self.random || self.seed.is_some() {
            TreeSource::Random { seed: self.seed }
        } else {
            TreeSource::Sample
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print a config template
    Init,

    /// Show config paths
    Path,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_config_path_reads_env_var() {
        let cmd = Cli::command();
        let config = cmd
            .get_arguments()
            .find(|arg| arg.get_id() == "config")
            .unwrap();
        assert_eq!(
            config.get_env(),
            Some(std::ffi::OsStr::new("INORDER_CONFIG"))
        );
    }

    #[test]
    fn test_seed_implies_random() {
        let cli = Cli::parse_from(["inorder", "play", "--seed", "7"]);
        match cli.command {
            Some(Commands::Play { tree, delay_ms }) => {
                assert_eq!(tree.source(), TreeSource::Random { seed: Some(7) });
                assert_eq!(delay_ms, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_default_source_is_sample() {
        let cli = Cli::parse_from(["inorder", "-dd", "--theme", "dark", "show"]);
        assert_eq!(cli.debug, 2);
        assert_eq!(cli.theme, Some(ThemeArg::Dark));
        match cli.command {
            Some(Commands::Show { tree }) => assert_eq!(tree.source(), TreeSource::Sample),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
