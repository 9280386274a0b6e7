use clap::Parser;
use ebd_frequency::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    let Some(command) = args.command else {
        show_help_and_commands();
        process::exit(0);
    };

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = commands::run(command) => result,
            signal = tokio::signal::ctrl_c() => match signal {
                Ok(()) => {
                    eprintln!("\nReceived CTRL+C, shutting down...");
                    Err(anyhow::anyhow!("interrupted by user"))
                }
                Err(e) => Err(anyhow::anyhow!("failed to listen for CTRL+C: {}", e)),
            },
        }
    });

    if let Err(error) = result {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("ebd-frequency - eBird Basic Dataset frequency index builder");
    println!("==========================================================");
    println!();
    println!("Compile a tab-delimited observation export into per-region files holding");
    println!("the weekly share of complete checklists that report each species.");
    println!();
    println!("USAGE:");
    println!("    ebd-frequency <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    build       Build a frequency index from a dataset export");
    println!("    show        Print one region of a built index");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Build an index into the default data directory:");
    println!("    ebd-frequency build ebd_relMay-2024.txt");
    println!();
    println!("    # Fold the US into one table and extract California lines:");
    println!("    ebd-frequency build ebd.txt --consolidate US \\");
    println!("                  --region-filter US-CA --subset-out ca.txt");
    println!();
    println!("    # Species seen in week 17 in Alameda County:");
    println!("    ebd-frequency show US-CA-001 --week 17");
    println!();
    println!("For detailed help on any command, use:");
    println!("    ebd-frequency <COMMAND> --help");
}
