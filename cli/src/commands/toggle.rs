use anyhow::Result;
use roofmap::PageUrl;

use crate::cli::ToggleArgs;

pub fn run(args: &ToggleArgs) -> Result<()> {
    let mut url = PageUrl::parse(&args.url)?;
    let mut selection = url.selected_roofs();
    for id in &args.ids { selection.toggle(id); }
    url.set_selected_roofs(&selection);
    println!("{url}");
    Ok(())
}
