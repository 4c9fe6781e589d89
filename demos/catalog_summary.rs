use anyhow::{Context, Result};
use ckanapi::{CkanClient, Query};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Example program that calls the library API.
    // Configure the catalog via env vars (CKAN_URL, CKAN_TOKEN) or a `.ckanrc` file.
    // Set RUST_LOG=ckanapi=debug to see each request.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let client = CkanClient::from_env()?;

    let version = client.api_version().context("catalog does not expose /api/3")?;
    println!("{} (API v{})", client.url(), version);

    let names = client.dataset_list_page(5, 0)?;
    println!("first datasets: {}", names.join(", "));

    let orgs = client.organization_names()?;
    println!("{} organizations", orgs.len());

    let licenses = client.license_list()?;
    let open = licenses.iter().filter(|l| l.is_open()).count();
    println!("{} licenses, {} open", licenses.len(), open);

    let query = std::env::args().nth(1).unwrap_or_default();
    let page = client.search_datasets(&Query::new().with_text(query), 10, 0)?;
    println!("{} matching datasets", page.count);
    for dataset in &page.results {
        println!(
            "- {} ({} resources)",
            dataset.title.as_deref().or(dataset.name.as_deref()).unwrap_or("?"),
            dataset.resources().len()
        );
    }

    Ok(())
}
