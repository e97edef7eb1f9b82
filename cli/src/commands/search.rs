use anyhow::{Context, Result};
use roofmap::{Config, GeoAdminClient};

use crate::cli::SearchArgs;

pub async fn run(config: &Config, args: &SearchArgs) -> Result<()> {
    if args.text.chars().count() < config.min_search_chars {
        anyhow::bail!("Enter at least {} characters to search", config.min_search_chars);
    }
    let client = GeoAdminClient::new(config)?;
    let hits = client.search_locations(&args.text).await
        .with_context(|| format!("Location search for {:?} failed", args.text))?;

    for hit in &hits {
        let loc = &hit.location;
        println!("{}\tx={}\ty={}", loc.label, loc.x, loc.y);
    }
    if hits.is_empty() { eprintln!("No locations found") }
    Ok(())
}
