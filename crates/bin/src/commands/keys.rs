//! Keys command - shows child keys, index keys and arities of one node.

use crate::cli::{KeysArgs, Mode};
use crate::output::{OutputFormat, id_label};

/// Run the keys command
pub fn run(args: &KeysArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::load_store(&args.source, Mode::Apply, electrum_store::DEFAULT_KEY)?;
    let id = args.source.at.as_str();
    let node = store
        .find(id)
        .ok_or_else(|| format!("No state at '{}'", id_label(id)))?;

    let keys = node.keys()?;
    let index_keys = node.index_keys()?;
    let arities = store.get_arities(id);

    match format {
        OutputFormat::Human => {
            println!("State:       {}", id_label(id));
            println!("Generation:  {}", node.generation());
            println!("Keys:        {}", keys.join(", "));
            println!("Index keys:  {}", index_keys.join(", "));
            println!("Arities:     {}", arities.join(", "));
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "id": id,
                "generation": node.generation(),
                "keys": keys,
                "index_keys": index_keys,
                "arities": arities,
            });
            println!("{}", serde_json::to_string(&value)?);
        }
    }

    Ok(())
}
