// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Build automation tasks for the Metron workspace.
// Run with: cargo xtask <command>

use std::process::Command;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";

#[derive(Parser)]
#[command(name = "xtask", about = "Metron build automation tool")]
struct Cli {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand, Clone, Copy)]
enum Task {
    /// Build all workspace crates
    Build,
    /// Run all unit, integration and doc tests
    Test,
    /// Run cargo check on the whole workspace
    Check,
    /// Format all code with rustfmt
    Format,
    /// Run clippy with warnings as errors
    Clippy,
    /// Run build, test, check, format and clippy in sequence
    All,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.task {
        Task::Build => run_cargo(&["build", "--workspace"], "Build"),
        Task::Test => run_cargo(&["test", "--workspace"], "Tests"),
        Task::Check => run_cargo(&["check", "--workspace"], "Check"),
        Task::Format => run_cargo(&["fmt", "--all"], "Format"),
        Task::Clippy => run_cargo(&["clippy", "--workspace", "--", "-D", "warnings"], "Clippy"),
        Task::All => {
            let start = Instant::now();
            run_cargo(&["build", "--workspace"], "Build")?;
            run_cargo(&["test", "--workspace"], "Tests")?;
            run_cargo(&["check", "--workspace"], "Check")?;
            run_cargo(&["fmt", "--all"], "Format")?;
            run_cargo(&["clippy", "--workspace", "--", "-D", "warnings"], "Clippy")?;
            println!(
                "{BOLD}{GREEN}✓ full pipeline completed in {:.2}s{RESET}",
                start.elapsed().as_secs_f64()
            );
            Ok(())
        }
    }
}

fn run_cargo(args: &[&str], task_name: &str) -> Result<()> {
    println!("{BOLD}━━━ {task_name}: cargo {} ━━━{RESET}", args.join(" "));
    let start = Instant::now();
    let status = Command::new("cargo").args(args).status()?;
    let secs = start.elapsed().as_secs_f64();

    if status.success() {
        println!("{BOLD}{GREEN}✓ {task_name} completed in {secs:.2}s{RESET}");
        Ok(())
    } else {
        println!("{BOLD}{RED}✗ {task_name} failed after {secs:.2}s{RESET}");
        anyhow::bail!("{task_name} failed with status: {status}");
    }
}
