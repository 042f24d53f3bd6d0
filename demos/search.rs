//! Example demonstrating a paginated search using webhose
//!
//! This example shows:
//! - Creating a client with the token from `WEBHOSE_TOKEN`
//! - Building a structured query
//! - Walking every result page and printing the posts

use webhose::query::{DirectField, ListField, Query};
use webhose::Client;

/// Type alias for simplifying error handling
type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> Result<()> {
    // This is just for seeing the logs
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()?;

    let client = Client::from_env();

    let query = Query::new()
        .all_terms("ipod")
        .exclude("nano")
        .language("english")
        .direct(DirectField::PerformanceScore, ">5")
        .list(ListField::SiteType, ["news", "blogs"]);
    println!("query: {query}");

    let page = client.search(&query, None, None).await?;
    println!(
        "{} results, {} requests left",
        page.total_results(),
        page.requests_left()
    );

    // stop after 50 posts to save quota
    let mut posts = page.into_posts(&client);
    let mut count = 0;
    while let Some(post) = posts.next().await? {
        println!(
            "[{}] {} ({})",
            post.published(),
            post.thread().title_full(),
            post.thread().site().unwrap_or("unknown site")
        );
        count += 1;
        if count == 50 {
            break;
        }
    }

    if let Some(ts) = posts.next_ts() {
        println!("resume later with since = {ts}");
    }

    Ok(())
}
