//! Growing list example.
//!
//! Run with: cargo run --example infinite_list
//!
//! Simulates a viewport scrolling down a list served by an in-memory source
//! with network-like latency. Set PAGEWINDOW_SEARCH_URL (and optionally
//! PAGEWINDOW_ACCESS_KEY) in `.env` to load from a real search endpoint.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use log::LevelFilter;
use pagewindow_lib::PageClient;
use pagewindow_lib::api::MemorySource;
use pagewindow_lib::api::SearchSource;
use pagewindow_lib::config::WindowConfig;
use pagewindow_lib::controller::AppendController;
use pagewindow_lib::model::Record;
use pagewindow_lib::sentinel::ViewportSentinel;
use simplelog::Config;
use simplelog::SimpleLogger;

const VIEWPORT_ROWS: usize = 8;

fn source() -> Arc<dyn SearchSource> {
    if let Ok(search_url) = env::var("PAGEWINDOW_SEARCH_URL") {
        let mut builder = PageClient::builder()
            .url(search_url.clone())
            .search_url(search_url);
        if let Ok(key) = env::var("PAGEWINDOW_ACCESS_KEY") {
            builder = builder.access_key(key);
        }
        return Arc::new(builder.build());
    }

    let records = (1..=45).map(|i| Record::new(i).set("alt_description", format!("Photo {}", i)));
    Arc::new(MemorySource::new(records).with_latency(Duration::from_millis(200)))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    SimpleLogger::init(LevelFilter::Debug, Config::default())?;

    let source = source();
    let config = if env::var("PAGEWINDOW_SEARCH_URL").is_ok() {
        WindowConfig::default()
    } else {
        WindowConfig::without_categories()
    };

    let mut list = AppendController::new(config, ViewportSentinel::new(VIEWPORT_ROWS));
    list.start(source.as_ref()).await;

    let mut offset = 0;
    while list.has_more() {
        // Render: place the bound row, then scroll one row at a time.
        if let Some(target) = list.sentinel_target().cloned() {
            let row = list.items().len() - 1;
            list.sentinel_mut().place(&target, row);
        }
        offset += 1;
        list.sentinel_mut().scroll_to(offset);

        let Some((target, visible)) = list.sentinel().crossing() else {
            break;
        };
        if let Some(request) = list.on_crossing(&target, visible) {
            list.run(request, source.as_ref()).await;
            println!("{} rows loaded, viewport at row {}", list.items().len(), offset);
        }
    }

    if list.show_end_banner() {
        println!("You've reached the end of the list ({} rows).", list.items().len());
    }
    Ok(())
}
