mod cli;
mod diff;
mod report;

use anyhow::Result;
use chrono::Local;
use cli::{Cli, Commands, RulesAction};
use report::{ReportContext, ReportFormat};
use reponamer_core::{NamingStyle, RenameOptions, RuleTable};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    setup_logging(&cli)?;

    info!("Starting reponamer");

    let rules = RuleTable::load_or_default(&cli.rules);

    match cli.command {
        Commands::Rename {
            folder,
            apply,
            ignore,
            report,
            report_format,
            git,
            style,
            interactive,
        } => {
            let options = RenameOptions {
                apply,
                ignore_dirs: ignore_set(ignore),
                use_git: git,
                style,
            };
            let report = report.map(|path| {
                let format = report_format.unwrap_or_else(|| ReportFormat::from_path(&path));
                (path, format)
            });
            handle_rename_command(&folder, &options, &rules, report, interactive)?;
        }
        Commands::Clean { names, style } => {
            handle_clean_command(&names, style, &rules);
        }
        Commands::Rules { action } => {
            handle_rules_command(action, &cli.rules, rules)?;
        }
    }

    info!("Reponamer completed successfully");
    Ok(())
}

fn ignore_set(ignore: Option<Vec<String>>) -> HashSet<String> {
    match ignore {
        Some(dirs) => dirs
            .into_iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect(),
        None => reponamer_core::default_ignore_dirs(),
    }
}

fn handle_rename_command(
    folder: &Path,
    options: &RenameOptions,
    rules: &RuleTable,
    report: Option<(PathBuf, ReportFormat)>,
    interactive: bool,
) -> Result<()> {
    info!("Target directory: {:?}", folder);
    info!("Naming style: {}", options.style);
    info!("Interactive mode: {}", interactive);

    if !folder.exists() {
        anyhow::bail!("Folder does not exist: {:?}", folder);
    }

    let mut ignored: Vec<String> = options.ignore_dirs.iter().cloned().collect();
    ignored.sort();
    println!("📁 Ignored directories: {}", ignored.join(", "));

    if !options.apply {
        warn!("Dry run mode - no changes will be made");
    }

    let changes = if interactive {
        reponamer_core::rename_recursive_interactive(folder, options, rules, |old, new| {
            diff::show_rename_and_confirm(old, new)
        })?
    } else {
        reponamer_core::rename_recursive(folder, options, rules)?
    };

    if changes.is_empty() {
        println!("✅ No files or folders need to be renamed.");
        return Ok(());
    }

    println!("📝 The following items will be renamed (old → new):");
    for entry in &changes {
        println!("  {} → {}", entry.old.display(), entry.new.display());
    }

    if let Some((path, format)) = report {
        let context = ReportContext {
            folder,
            style: options.style,
            ignore_dirs: ignored,
            generated: Local::now(),
        };
        report::write_report(&path, format, &context, &changes)?;
        println!("\n📝 Report written to {}", path.display());
    }

    if options.apply {
        println!("\n✅ All changes have been applied!");
    } else {
        println!("\n⚠️ No changes applied (use --apply to execute renaming)");
    }

    Ok(())
}

fn handle_clean_command(names: &[String], style: NamingStyle, rules: &RuleTable) {
    for name in names {
        println!("{} → {}", name, reponamer_core::clean_name(name, style, rules));
    }
}

fn handle_rules_command(action: RulesAction, path: &Path, mut rules: RuleTable) -> Result<()> {
    match action {
        RulesAction::Show => {
            println!("{}", rules.to_json_pretty()?);
        }
        RulesAction::Set { json } => {
            rules.replace_from_json(&json)?;
            rules.save(path)?;
            info!("Saved {} rules to {:?}", rules.len(), path);
            println!("✅ Rules updated in {}", path.display());
        }
        RulesAction::Reset => {
            rules = RuleTable::default();
            rules.save(path)?;
            println!("✅ Default rules written to {}", path.display());
        }
    }

    Ok(())
}

fn setup_logging(cli: &Cli) -> Result<()> {
    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_writer(std::io::stderr)
                .compact()
        )
        .with(filter)
        .init();

    Ok(())
}
