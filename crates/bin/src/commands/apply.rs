//! Apply command - reconciles JSON files into a fresh store and prints its nodes.

use crate::cli::ApplyArgs;
use crate::output::{OutputFormat, entities_json, entity_rows, print_table};

/// Run the apply command
pub fn run(args: &ApplyArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::load_store(&args.source, args.mode, &args.default_key)?;
    let entities = store.entities();

    match format {
        OutputFormat::Human => {
            print_table(&["ID", "GEN", "VALUES"], &entity_rows(&entities));
            println!();
            println!(
                "{} states, generation {}",
                store.state_count(),
                store.generation()
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&entities_json(&entities))?);
        }
    }

    Ok(())
}
