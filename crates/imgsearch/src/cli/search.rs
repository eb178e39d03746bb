//! The `imgsearch search` command: load the persisted index and print every
//! image filed under the given topic.

use clap::Args;
use imgsearch_core::{Config, IndexStore, StoreError};

/// Arguments for the `search` command.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// The topic to search for
    #[arg(required = true)]
    pub topic: String,
}

/// Execute the search command.
pub async fn execute(args: SearchArgs, config: &Config) -> anyhow::Result<()> {
    // Queries have always been lowercased before lookup while labels keep
    // classifier casing; preserved as-is so existing indices behave the same.
    let topic = args.topic.to_lowercase();
    println!("Search for {topic}");

    let store = IndexStore::new(config.index_path());
    let index = match store.load() {
        Ok(index) => index,
        Err(StoreError::NotFound(_)) => {
            anyhow::bail!("No local index found. Run 'imgsearch build' first.");
        }
        Err(e) => return Err(e.into()),
    };

    match index.lookup(&topic) {
        Some(entries) => {
            println!("Found {} matches for {topic}", entries.len());
            for entry in entries {
                println!("{}", entry.image);
            }
        }
        None => {
            println!("No images found matching that topic.");
        }
    }

    Ok(())
}
