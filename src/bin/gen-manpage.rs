//! Man page generator for vtnvme
//!
//! Usage: cargo run --bin gen-manpage -- [output-dir]

use clap::CommandFactory;
use std::fs;
use std::path::PathBuf;

#[path = "../cli.rs"]
mod cli;

fn main() -> std::io::Result<()> {
    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("man"));
    fs::create_dir_all(&output_dir)?;

    let cmd = cli::Cli::command();
    let mut pages = vec![(String::from("vtnvme.1"), clap_mangen::Man::new(cmd.clone()))];
    for sub in cmd.get_subcommands() {
        let name = format!("vtnvme-{}", sub.get_name());
        let man = clap_mangen::Man::new(sub.clone()).title(name.clone());
        pages.push((format!("{}.1", name), man));
    }

    for (file, man) in pages {
        let mut buffer = Vec::new();
        man.render(&mut buffer)?;
        let path = output_dir.join(&file);
        fs::write(&path, buffer)?;
        println!("Man page generated at: {}", path.display());
    }

    println!("\nTo view the man page:");
    println!("  man -l {}", output_dir.join("vtnvme.1").display());
    Ok(())
}
