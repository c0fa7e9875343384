use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::flow::FlowDefinition;
use crate::flows::{capture, request};

/// nolly - capture institutional knowledge through guided interviews
#[derive(Parser)]
#[command(name = "nolly")]
#[command(about = "Guided knowledge capture and knowledge requests in the terminal")]
#[command(version)]
pub struct Cli {
    /// Write logs to this file (the terminal is busy while a wizard runs)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the knowledge capture interview
    Capture {
        /// Flow definition to use instead of the built-in interview
        #[arg(short, long)]
        flow: Option<PathBuf>,

        /// Write the submission to this JSON file (printed to stdout otherwise)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Create a knowledge request for a colleague
    Request {
        /// Write the submission to this JSON file (printed to stdout otherwise)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a flow definition file
    Validate {
        /// Path to the flow JSON file
        flow: PathBuf,
    },
    /// Write a built-in flow definition to a JSON file
    ExportFlow {
        /// Which flow to export
        #[arg(value_enum)]
        flow: BuiltinFlow,

        /// Destination file
        path: PathBuf,
    },
}

/// Flows compiled into the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BuiltinFlow {
    Capture,
    Request,
}

impl BuiltinFlow {
    pub fn definition(self) -> FlowDefinition {
        match self {
            Self::Capture => capture::capture_flow(),
            Self::Request => request::request_flow(),
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }

    /// True when the chosen command takes over the terminal
    pub fn is_interactive(&self) -> bool {
        matches!(
            self.command,
            None | Some(Commands::Capture { .. }) | Some(Commands::Request { .. })
        )
    }
}
