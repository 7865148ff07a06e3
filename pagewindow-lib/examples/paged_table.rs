//! Paged table example.
//!
//! Run with: cargo run --example paged_table
//!
//! Reads from `.env` (all optional):
//! - PAGEWINDOW_OFFSET_URL (default https://dummyjson.com/todos)
//! - PAGEWINDOW_COLLECTION_KEY (default todos)

use std::env;
use std::time::Duration;

use log::LevelFilter;
use pagewindow_lib::PageClient;
use pagewindow_lib::config::WindowConfig;
use pagewindow_lib::controller::ReplaceController;
use pagewindow_lib::sort::Column;
use pagewindow_lib::sort::ColumnKind;
use simplelog::Config;
use simplelog::SimpleLogger;

fn print_page(table: &ReplaceController, columns: &[Column]) {
    println!(
        "\npage {} of {:?} {}",
        table.cursor(),
        table.page_count(),
        table.last_error().unwrap_or("")
    );
    for record in table.items() {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| match record.get(&c.key) {
                Some(value) => value.as_text().map(|t| t.into_owned()).unwrap_or_default(),
                None => record.id().to_string(),
            })
            .collect();
        println!("  {}", cells.join(" | "));
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    SimpleLogger::init(LevelFilter::Debug, Config::default())?;

    let url = env::var("PAGEWINDOW_OFFSET_URL").unwrap_or_else(|_| "https://dummyjson.com/todos".into());
    let key = env::var("PAGEWINDOW_COLLECTION_KEY").unwrap_or_else(|_| "todos".into());

    let client = PageClient::builder()
        .url(url)
        .collection_key(key)
        .timeout(Duration::from_secs(10))
        .build();

    let columns = vec![
        Column::new("id", "ID", ColumnKind::Number),
        Column::new("userId", "User Id", ColumnKind::Number),
        Column::new("todo", "Todo", ColumnKind::Text),
        Column::new("completed", "Completed", ColumnKind::Flag),
    ];

    let mut table = ReplaceController::new(WindowConfig::default());
    table.start(&client).await;
    print_page(&table, &columns);

    if let Some(request) = table.next() {
        table.run(request, &client).await;
    }
    table.on_column_header_click(&columns[2]);
    print_page(&table, &columns);

    table.on_column_header_click(&columns[2]);
    print_page(&table, &columns);

    if let Some(request) = table.jump_to("40") {
        table.run(request, &client).await;
    }
    print_page(&table, &columns);

    Ok(())
}
