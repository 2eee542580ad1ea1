//! Command-line arguments

use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser};

use crate::config::HostKeyMode;

#[derive(Debug, Parser)]
#[command(name = "sshrun")]
#[command(about = "Run one command on a remote host over SSH", long_about = None)]
pub struct Cli {
    /// Remote command line; words are joined with single spaces
    #[arg(trailing_var_arg = true)]
    pub command: Vec<String>,

    /// Configuration file (defaults to $SSHRUN_CONFIG, else the user config dir and ./sshrun.toml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Remote host
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Remote SSH port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Login user
    #[arg(short, long)]
    pub user: Option<String>,

    /// Connect timeout in seconds
    #[arg(short, long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Host key verification policy
    #[arg(long, value_enum)]
    pub host_key_policy: Option<HostKeyMode>,

    /// known_hosts file used by trust-on-first-use and strict policies
    #[arg(long, value_name = "PATH")]
    pub known_hosts: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// One-line usage string
    pub fn usage() -> String {
        Cli::command().render_usage().to_string()
    }

    /// Command line to send, `None` when no words were given
    pub fn command_line(&self) -> Option<String> {
        if self.command.is_empty() {
            None
        } else {
            Some(self.command.join(" "))
        }
    }
}
