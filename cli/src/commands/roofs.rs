use anyhow::{Context, Result};
use roofmap::{Config, GeoAdminClient, Location, PageUrl, Session, write_geojson_bytes};
use tracing::{debug, info};

use crate::cli::RoofsArgs;

fn page_url(args: &RoofsArgs) -> Result<PageUrl> {
    match (&args.url, args.x, args.y) {
        (Some(url), _, _) => PageUrl::parse(url),
        (None, Some(x), Some(y)) => {
            let mut url = PageUrl::from_query("")?;
            url.set_location(&Location { label: format!("{x}, {y}"), x, y });
            Ok(url)
        }
        _ => anyhow::bail!("Either a page URL or both --x and --y are required"),
    }
}

pub async fn run(config: &Config, args: &RoofsArgs) -> Result<()> {
    let url = page_url(args)?;
    let location = url.location()
        .with_context(|| format!("URL {url} does not name a location (needs x, y and q)"))?;
    info!(label = %location.label, "fetching roofs");

    let client = GeoAdminClient::new(config)?;
    let mut session = Session::mount(client, config, url);
    session.settle().await;
    for update in session.drain_updates() { debug!(?update, "surface update") }

    let bytes = write_geojson_bytes(session.store(), session.selection())?;
    match &args.output {
        Some(path) => std::fs::write(path, &bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", String::from_utf8_lossy(&bytes)),
    }
    eprintln!("{}", session.status_line());
    Ok(())
}
