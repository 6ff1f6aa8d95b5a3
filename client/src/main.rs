use clap::Parser;
use log::{error, info};

use cli::*;
use utils::{init_logger, BANNER};
use veilx::{ControlPoint, ControlTable, RegistryHandle};

mod cli;
mod utils;

/// Name our own entry and its control point are registered under.
const CONTROL_NAME: &str = "veil";

fn main() {
    let args = Cli::parse();
    init_logger(args.verbose);
    println!("{BANNER}");

    match &args.command {
        // Build a fixture registry and apply the scripted control writes
        Commands::Run { writes, entries } => run(entries, writes),

        // Build a fixture registry and print its enumeration
        Commands::List { entries } => {
            if let Some((_, point)) = setup(entries) {
                print_listing(&point);
            }
        }
    }
}

/// Builds the fixture registry, registers our own entry last, and installs
/// its control point in a table.
fn setup(entries: &[String]) -> Option<(ControlTable, std::sync::Arc<ControlPoint>)> {
    let registry = RegistryHandle::new();

    for name in entries {
        if let Err(err) = registry.register(name) {
            error!("{err}");
            return None;
        }
    }

    let self_entry = match registry.register(CONTROL_NAME) {
        Ok(id) => id,
        Err(err) => {
            error!("{err}");
            return None;
        }
    };

    let point = match ControlPoint::install(registry, self_entry) {
        Ok(point) => point,
        Err(err) => {
            error!("{err}");
            return None;
        }
    };

    let mut table = ControlTable::new();
    match table.register(CONTROL_NAME, point) {
        Ok(point) => Some((table, point)),
        Err(err) => {
            error!("{err}");
            None
        }
    }
}

/// Applies each control write in order, printing the enumeration after
/// every accepted write.
fn run(entries: &[String], writes: &[String]) {
    let Some((mut table, point)) = setup(entries) else {
        return;
    };

    print_listing(&point);

    for raw in writes {
        info!("Writing \"{raw}\" to control point \"{CONTROL_NAME}\"");
        match point.write_str(raw) {
            Ok(()) => print_listing(&point),
            Err(err) => error!("{err}"),
        }
    }

    table.unregister(CONTROL_NAME);
}

fn print_listing(point: &ControlPoint) {
    match point.list() {
        Ok(records) => {
            println!("state = {}", point.read());
            for record in &records {
                println!("  slot {:>3}  {}", record.address, record.name);
            }
            if records.is_empty() {
                println!("  (no entries)");
            }
        }
        Err(err) => error!("{err}"),
    }
}
