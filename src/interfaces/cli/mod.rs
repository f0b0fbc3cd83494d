//! Command-line interface of efp-gamess.

use std::path::PathBuf;

use clap::Parser;

use crate::io::format::efpg_output;

const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

/// Logs a nicely formatted efp-gamess heading to the `efp-gamess-output` logger.
pub fn log_heading() {
    let version = if let Some(ver) = VERSION {
        format!("v{ver}")
    } else {
        "v unknown".to_string()
    };
    efpg_output!("╭─────────────────────────────────────────────────────────────────────────────────────────────────────╮");
    efpg_output!("│                                                                                                     │");
    efpg_output!("│   EEEEEEE  FFFFFFF  PPPPPP            GGGGG     AAA    MM     MM  EEEEEEE   SSSSS    SSSSS          │");
    efpg_output!("│   E        F        P     P          G         A   A   M M   M M  E        S        S               │");
    efpg_output!("│   EEEEE    FFFFF    PPPPPP   ====   G   GGG   AAAAAAA  M  M M  M  EEEEE     SSSS     SSSS           │");
    efpg_output!("│   E        F        P               G     G   A     A  M   M   M  E             S        S          │");
    efpg_output!("│   EEEEEEE  F        P                GGGGG    A     A  M       M  EEEEEEE  SSSSS    SSSSS           │");
    efpg_output!("│                                                                                                     │");
    efpg_output!("│   GAMESS EFP matrices reordered into a host basis                                   {version:>15} │");
    efpg_output!("╰─────────────────────────────────────────────────────────────────────────────────────────────────────╯");
    efpg_output!("");
}

/// Command-line arguments of the `efp-gamess` program.
#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to a YAML input file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path stem of the output file. `.out` is appended.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Writes a template YAML input file with the given name and exits.
    #[arg(short, long)]
    pub template: Option<PathBuf>,
}
