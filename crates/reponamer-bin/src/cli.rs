use clap::{Parser, Subcommand};
use reponamer_core::NamingStyle;
use std::path::PathBuf;

use crate::report::ReportFormat;

#[derive(Parser)]
#[command(name = "reponamer")]
#[command(version)]
#[command(about = "Clean and normalize file and folder names")]
#[command(long_about = "A CLI tool that recursively renames files and directories into a single naming style (kebab-case, snake_case, lowerCamelCase or UpperCamelCase), driven by an editable table of substitution rules.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[arg(
        long,
        global = true,
        env = "REPONAMER_RULES",
        default_value = "rules.json",
        help = "Substitution rules file (JSON object of pattern -> replacement)"
    )]
    pub rules: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Rename files and folders under a directory")]
    Rename {
        #[arg(help = "Path to the folder you want to clean")]
        folder: PathBuf,

        #[arg(long, help = "Apply changes (default is a dry run)")]
        apply: bool,

        #[arg(
            long,
            value_delimiter = ',',
            help = "Comma-separated list of directories to ignore (default: .git,node_modules,.venv)"
        )]
        ignore: Option<Vec<String>>,

        #[arg(long, help = "Write a report of the planned renames to this file")]
        report: Option<PathBuf>,

        #[arg(long, value_enum, help = "Report format (default: inferred from the report file extension)")]
        report_format: Option<ReportFormat>,

        #[arg(long, help = "Use git mv instead of a plain rename (for git repositories)")]
        git: bool,

        #[arg(
            long,
            default_value_t = NamingStyle::Kebab,
            help = "Naming style (kebab, snake, lower-camel, upper-camel)"
        )]
        style: NamingStyle,

        #[arg(short, long, help = "Interactive mode - prompt for each rename")]
        interactive: bool,
    },

    #[command(about = "Show how names would be cleaned, without touching the filesystem")]
    Clean {
        #[arg(required = true, help = "Names to clean")]
        names: Vec<String>,

        #[arg(
            long,
            default_value_t = NamingStyle::Kebab,
            help = "Naming style (kebab, snake, lower-camel, upper-camel)"
        )]
        style: NamingStyle,
    },

    #[command(about = "Inspect or edit the substitution rules")]
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },
}

#[derive(Subcommand)]
pub enum RulesAction {
    #[command(about = "Print the active rules as JSON")]
    Show,

    #[command(about = "Replace the rules file with the given JSON object")]
    Set {
        #[arg(help = "JSON object of pattern -> replacement, applied in order")]
        json: String,
    },

    #[command(about = "Overwrite the rules file with the built-in defaults")]
    Reset,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
