//! # Generate, save, browse
//!
//! Runs one generation through Replicate for every built-in profile, saves
//! each result for a single owner in a local directory and prints the
//! reconstructed gallery.
//!
//! ```bash
//! export REPLICATE_API_TOKEN=r8_…
//! cargo run -p galleria --example replicate_gallery -- "A lighthouse at dawn"
//! ```
use std::{sync::Arc, time::Duration};

use galleria::{
    GenerationClient, GenerationRequest,
    artifact::OwnerId,
    profile::ProfileRegistry,
    replicate::ReplicateAdapterBuilder,
    storage::{ArtifactStore, FsObjectStore, HttpFetcher, Studio},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "A futuristic cityscape at sunset".to_owned());

    let backend = ReplicateAdapterBuilder::new_from_env().build()?;
    let artifacts = ArtifactStore::new(
        Arc::new(FsObjectStore::new("./galleria-data")),
        Arc::new(HttpFetcher::new(Duration::from_secs(60))?),
    );
    let studio = Studio::new(GenerationClient::new(backend), ProfileRegistry::builtin(), artifacts);
    let owner = OwnerId::parse("example")?;

    let profiles: Vec<_> = studio.registry().iter().cloned().collect();
    for profile in &profiles {
        match studio
            .generate(Some(&owner), GenerationRequest::new(prompt.as_str(), profile))
            .await
        {
            Ok(outcome) => println!(
                "{:<16} {} (saved: {})",
                profile.display_name,
                outcome.reference.locator.as_str(),
                outcome.saved.is_some()
            ),
            Err(e) => eprintln!("{:<16} failed: {e}", profile.display_name),
        }
    }

    println!("\nGallery of `{owner}`:");
    for entry in studio.gallery(&owner).await? {
        let when = entry
            .generated_at()
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| entry.timestamp.to_string());
        println!("{when}  {:<36} {}", entry.metadata.model, entry.url);
    }
    Ok(())
}
