//! Catalog client example for craftcatalog
//!
//! Demonstrates searching the modpack catalog and drilling into a result.
//! Without CURSEFORGE_API_KEY set, the search answers from the offline
//! suggestions and the detail steps are skipped.
//!
//! Usage:
//!   cargo run -p api-client [search term]

use craftcatalog::{Catalog, Config, ResultSource, SearchQuery};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let term = std::env::args().nth(1).unwrap_or_else(|| "skyblock".to_string());

    println!("Craftcatalog Client Demo");
    println!("========================\n");

    let config = Config::load(None, None)?;
    let catalog = Catalog::new(&config)?;
    println!("Catalog: {} (mode: {:?})\n", config.base_url, catalog.mode());

    // 1. Search
    println!("1. Searching for '{}'...\n", term);
    let search = catalog.search_with_source(&SearchQuery::new(term.as_str())).await?;
    println!("   Found {} modpack(s) from {:?}:\n", search.results.len(), search.source);

    for pack in &search.results {
        println!("   - [{}] {}", pack.id, pack.name);
        println!("     {}", pack.summary);
        println!("     Downloads: {}, Authors: {}", pack.download_count, pack.authors.join(", "));
        println!();
    }

    if search.source != ResultSource::Catalog {
        println!("Offline suggestions have no catalog details; see `craftcatalog sites`.");
        catalog.close();
        return Ok(());
    }

    // Pick the first result for further demo
    let Some(first) = search.results.first() else {
        println!("No modpacks matched.");
        catalog.close();
        return Ok(());
    };

    // 2. Get details
    println!("2. Getting details for {}...\n", first.id);
    let details = catalog.details(first.id).await?;
    println!("   Name: {}", details.name);
    println!("   Summary: {}", details.summary);
    if let Some(version) = &details.game_version_latest {
        println!("   Latest game version: {}", version);
    }
    if let Some(loader) = &details.mod_loader {
        println!("   Mod loader: {}", loader);
    }
    if !details.categories.is_empty() {
        println!("   Categories: {}", details.categories.join(", "));
    }
    println!();

    // 3. List versions
    println!("3. Listing files for {}...\n", first.id);
    let versions = catalog.versions(first.id, None).await?;
    for v in versions.iter().take(5) {
        println!("   - {}", v.display_name);
        println!("     File: {} ({} bytes)", v.file_name, v.file_size);
        println!("     Published: {}", v.file_date);
        println!();
    }

    // 4. Probe the newest download
    if let Some(latest) = versions.iter().find(|v| !v.download_url.is_empty()) {
        println!("4. Probing {}...\n", latest.download_url);
        let info = catalog.validate_url(&latest.download_url).await?;
        println!("   Resolved: {}", info.resolved_url);
        println!("   File name: {}", info.file_name);
        println!("   Size: {} bytes", info.size);
        println!("   Recognized archive: {}", info.recognized_archive);
    }

    println!("\nStats: {:?}", catalog.cache_stats());
    catalog.close();
    println!("\nDemo complete!");

    Ok(())
}
