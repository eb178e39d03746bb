//! The `imgsearch build` command: fetch the candidate list, classify every
//! image, and persist the finalized index.

use clap::Args;
use imgsearch_core::{
    BuildOptions, ClarifaiClassifier, Config, ErrorPolicy, IndexBuilder, IndexStore, ListFetcher,
};
use std::sync::Arc;

/// Arguments for the `build` command.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// The Clarifai API key to use when making requests
    #[arg(short = 'k', long, env = "CLARIFAI_API_KEY")]
    pub apikey: String,

    /// The URL of a list of images to index (defaults to the configured list)
    #[arg(short = 'u', long)]
    pub url: Option<String>,

    /// Skip images whose classify call fails instead of aborting the build
    #[arg(long)]
    pub skip_failures: bool,

    /// Concurrent classifier calls (overrides the configured worker count)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,
}

/// Execute the build command.
pub async fn execute(args: BuildArgs, config: &Config) -> anyhow::Result<()> {
    let fetcher = ListFetcher::new(&config.build, args.url.as_deref())?;
    println!("Building index from {}", fetcher.url());

    let images = fetcher.fetch().await?;
    println!("{} urls found.", images.len());

    let classifier = Arc::new(ClarifaiClassifier::new(&config.classifier, &args.apikey)?);

    let mut options = BuildOptions::from(&config.build);
    if args.skip_failures {
        options.error_policy = ErrorPolicy::Skip;
    }
    if let Some(workers) = args.workers {
        anyhow::ensure!(workers > 0, "--workers must be > 0");
        options.workers = workers;
    }

    let index = IndexBuilder::new(classifier, options).build(&images).await?;

    let store = IndexStore::new(config.index_path());
    store.save(&index)?;

    println!(
        "...done. Indexed {} labels across {} entries into {}",
        index.len(),
        index.entry_count(),
        store.path().display()
    );
    Ok(())
}
