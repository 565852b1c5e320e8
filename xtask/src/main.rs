use std::process;

use anyhow::Result;
use clap::{ArgMatches, Command};

/// (name, description, cargo arguments) for each test suite `xtask test all` runs.
const TEST_SUITES: &[(&str, &str, &[&str])] = &[
    ("core", "reponamer-core unit tests", &["test", "--package", "reponamer-core"]),
    ("bin", "reponamer-bin unit and CLI tests", &["test", "--package", "reponamer-bin"]),
    ("docs", "documentation tests", &["test", "--doc", "--package", "reponamer-core"]),
];

fn main() -> Result<()> {
    let args = clap::command!()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("install").about("Install reponamer binary locally"))
        .subcommand(
            Command::new("run")
                .about("Build and run reponamer with arguments")
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .arg(clap::Arg::new("args")
                    .help("Arguments to pass to reponamer")
                    .action(clap::ArgAction::Append)
                    .num_args(0..))
        )
        .subcommand(
            Command::new("test")
                .about("Test Operations")
                .subcommand(Command::new("all").about("Run every test suite plus the binary smoke test"))
                .subcommand(Command::new("core").about("Run tests for reponamer-core"))
                .subcommand(Command::new("bin").about("Run tests for reponamer-bin"))
                .subcommand(Command::new("smoke").about("Build the binary and exercise each subcommand"))
        )
        .get_matches();

    match args.subcommand() {
        Some(("install", _args)) => cargo(&["install", "--path", "crates/reponamer-bin"], "Failed to install reponamer"),
        Some(("run", args)) => handle_run_command(args),
        Some(("test", args)) => handle_test_commands(args),
        Some((command, _)) => anyhow::bail!("Unexpected command: {command}"),
        None => anyhow::bail!("Expected subcommand"),
    }
}

fn cargo(args: &[&str], failure: &str) -> Result<()> {
    let status = process::Command::new("cargo").args(args).status()?;

    if !status.success() {
        anyhow::bail!("{failure}");
    }
    Ok(())
}

fn handle_run_command(args: &ArgMatches) -> Result<()> {
    let run_args: Vec<String> = args.get_many::<String>("args")
        .map_or(Vec::new(), |vals| vals.cloned().collect());

    let mut command = process::Command::new("cargo");
    command.args(["run", "--bin", "reponamer", "--"]).args(&run_args);

    if !command.status()?.success() {
        anyhow::bail!("Failed to run reponamer");
    }

    Ok(())
}

fn handle_test_commands(args: &ArgMatches) -> Result<()> {
    match args.subcommand() {
        Some(("all", _args)) => test_all(),
        Some((name @ ("core" | "bin"), _args)) => run_suite(name),
        Some(("smoke", _args)) => smoke_test(),
        _ => {
            println!("Available test commands:");
            println!("  all    - Run every test suite plus the binary smoke test");
            println!("  core   - Run tests for reponamer-core");
            println!("  bin    - Run tests for reponamer-bin");
            println!("  smoke  - Build the binary and exercise each subcommand");
            Ok(())
        }
    }
}

fn run_suite(name: &str) -> Result<()> {
    let Some((_, description, cargo_args)) = TEST_SUITES.iter().find(|(n, _, _)| *n == name) else {
        anyhow::bail!("Unknown test suite: {name}");
    };
    println!("🧪 Running {description}...");
    cargo(cargo_args, &format!("{description} failed"))
}

fn test_all() -> Result<()> {
    let mut failures = Vec::new();

    for (name, _, _) in TEST_SUITES {
        if let Err(e) = run_suite(name) {
            println!("❌ {e}");
            failures.push(*name);
        }
    }

    if let Err(e) = smoke_test() {
        println!("❌ Smoke test failed: {e}");
        failures.push("smoke");
    }

    if failures.is_empty() {
        println!("🎉 All tests passed successfully!");
        Ok(())
    } else {
        anyhow::bail!("Test suite failed: {}", failures.join(", "))
    }
}

fn smoke_test() -> Result<()> {
    println!("🔗 Running binary smoke test...");
    cargo(&["build", "--bin", "reponamer"], "Failed to build reponamer binary")?;

    let invocations: &[&[&str]] = &[
        &["--version"],
        &["rename", "--help"],
        &["rules", "show"],
        &["clean", "My C++ File#1.txt", "--style", "snake"],
    ];

    for invocation in invocations {
        let status = process::Command::new("cargo")
            .args(["run", "--quiet", "--bin", "reponamer", "--"])
            .args(*invocation)
            .env("REPONAMER_RULES", "xtask-missing-rules.json")
            .status()?;

        if !status.success() {
            anyhow::bail!("reponamer {} failed", invocation.join(" "));
        }
    }

    Ok(())
}
