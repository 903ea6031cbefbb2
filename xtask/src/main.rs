//! Development tasks: `cargo xtask <task>`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "xtask", about = "readable-iq development tasks")]
struct Xtask {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Generate man pages for the CLI and its subcommands
    Man {
        /// Output directory
        #[arg(long, default_value = "target/man")]
        out: PathBuf,
    },
    /// Generate shell completion scripts
    Completions {
        /// Output directory
        #[arg(long, default_value = "target/completions")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    match Xtask::parse().task {
        Task::Man { out } => man(&out),
        Task::Completions { out } => completions(&out),
    }
}

fn man(out: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(out).with_context(|| format!("failed to create {}", out.display()))?;
    let cmd = readable_iq::command();
    clap_mangen::generate_to(cmd, out)
        .with_context(|| format!("failed to write man pages to {}", out.display()))?;
    println!("man pages written to {}", out.display());
    Ok(())
}

fn completions(out: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(out).with_context(|| format!("failed to create {}", out.display()))?;
    let mut cmd = readable_iq::command();
    for shell in [
        Shell::Bash,
        Shell::Zsh,
        Shell::Fish,
        Shell::PowerShell,
        Shell::Elvish,
    ] {
        let path = clap_complete::generate_to(shell, &mut cmd, "readable-iq", out)
            .with_context(|| format!("failed to write {shell} completions"))?;
        println!("{shell}: {}", path.display());
    }
    Ok(())
}
