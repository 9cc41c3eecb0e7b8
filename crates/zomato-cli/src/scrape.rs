//! Command handlers: open a session, page through listings, extract menus.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use zomato_core::{AppConfig, Coordinates};
use zomato_scraper::{Locator, RestaurantRecord, SessionConfig, SessionContext};

use crate::retry::{next_page_with_retry, retry_with_backoff, RetryPolicy};
use crate::sink;
use crate::{LocationArgs, OutputArgs};

pub(crate) async fn run_locate(config: &AppConfig) -> anyhow::Result<()> {
    let session_config = SessionConfig::from_app_config(config);
    let locator = Locator::new(session_config.build_client()?, &session_config.geolocation_url);
    let coordinates = retry_with_backoff(RetryPolicy::from_config(config), || locator.resolve())
        .await
        .context("detecting location from IP")?;
    println!(
        "latitude={} longitude={}",
        coordinates.latitude(),
        coordinates.longitude()
    );
    Ok(())
}

pub(crate) async fn run_restaurants(
    config: &AppConfig,
    pages: usize,
    location: &LocationArgs,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    let policy = RetryPolicy::from_config(config);
    let out_dir = output_dir(config, output);
    let mut session = open_session(config, location).await?;
    let mut total = 0usize;

    for page_index in 0..pages {
        if page_index > 0 {
            pause(config).await;
        }
        let records = next_page_with_retry(&mut session, policy)
            .await
            .with_context(|| format!("fetching listing page {}", page_index + 1))?;
        if records.is_empty() {
            tracing::info!(pages_fetched = page_index, "no more restaurants available");
            break;
        }

        let page = session.page_number();
        println!("Page {page}: {} restaurants", records.len());
        for (offset, record) in records.iter().enumerate() {
            println!("  {:>3}. {}", total + offset, describe(record));
        }
        total += records.len();

        if output.write_json {
            sink::write_json(&sink::restaurants_page_path(&out_dir, page), &records).await?;
        }
    }

    println!("Total restaurants: {total}");
    Ok(())
}

pub(crate) async fn run_menu(
    config: &AppConfig,
    index: usize,
    pages: usize,
    location: &LocationArgs,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    let policy = RetryPolicy::from_config(config);
    let mut session = open_session(config, location).await?;

    let mut listed: Vec<RestaurantRecord> = Vec::new();
    for page_index in 0..pages {
        if listed.len() > index {
            break;
        }
        if page_index > 0 {
            pause(config).await;
        }
        let records = next_page_with_retry(&mut session, policy)
            .await
            .with_context(|| format!("fetching listing page {}", page_index + 1))?;
        if records.is_empty() {
            break;
        }
        listed.extend(records);
    }

    let record = listed.get(index).with_context(|| {
        format!(
            "only {} restaurants listed within {pages} page(s); index {index} is out of range",
            listed.len()
        )
    })?;
    let name = record.name().unwrap_or("Unknown Restaurant").to_owned();

    pause(config).await;
    let session = &session;
    let menu = retry_with_backoff(policy, move || session.extract_menu(record))
        .await
        .with_context(|| format!("extracting menu for {name}"))?;

    println!("Menu for {name}:");
    for section in menu.sections().keys() {
        println!("  - {section}");
    }

    if output.write_json {
        let path = sink::menu_path(&output_dir(config, output), &name);
        sink::write_json(&path, &menu).await?;
    }
    Ok(())
}

async fn open_session(
    config: &AppConfig,
    location: &LocationArgs,
) -> anyhow::Result<SessionContext> {
    let coordinates = match (&location.lat, &location.lon) {
        (Some(lat), Some(lon)) => {
            Some(Coordinates::new(lat, lon).context("invalid --lat/--lon")?)
        }
        _ => None,
    };

    let session_config = SessionConfig::from_app_config(config);
    let session_config = &session_config;
    let session = retry_with_backoff(RetryPolicy::from_config(config), move || {
        SessionContext::open(session_config, coordinates.clone())
    })
    .await
    .context("opening scraping session")?;
    Ok(session)
}

fn output_dir(config: &AppConfig, output: &OutputArgs) -> PathBuf {
    output
        .out_dir
        .clone()
        .unwrap_or_else(|| config.output_dir.clone())
}

async fn pause(config: &AppConfig) {
    if config.inter_request_delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(config.inter_request_delay_ms)).await;
    }
}

/// One-line summary: name, rating, cuisines and delivery estimate.
fn describe(record: &RestaurantRecord) -> String {
    let rating = record
        .rating()
        .map_or_else(|| "N/A".to_owned(), |r| format!("{r:.1}"));
    let cuisines = record.cuisines();
    let cuisines = if cuisines.is_empty() {
        "N/A".to_owned()
    } else {
        cuisines.join(", ")
    };
    format!(
        "{} | rating {rating} | {cuisines} | {}",
        record.name().unwrap_or("N/A"),
        record.delivery_time().unwrap_or("N/A")
    )
}
