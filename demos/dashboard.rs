use std::sync::Arc;

use matchfeed::dashboard::{apply_tab, live_count, FeedTab};
use matchfeed::grouping::group_by_league;
use matchfeed::status::display_status;
use matchfeed::timeline::{chronological, running_score, visible, EventKind};
use matchfeed::{FavoritesStore, FeedConfig, FeedQuery, MatchDetailLoader, MatchFeed, MockSource};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> matchfeed::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let today = chrono::Local::now().date_naive();
    let source = Arc::new(MockSource::demo(today));

    let mut feed = MatchFeed::new(
        source.clone(),
        FeedQuery::default().with_date(today),
        FeedConfig::default(),
    );
    let mut state = feed.settled().await;
    while state.has_more && state.matches.len() < 15 {
        feed.load_more();
        state = feed.settled().await;
    }

    let favorites_path = std::env::temp_dir().join("matchfeed-demo").join("favorites.json");
    let mut favorites = FavoritesStore::load(&favorites_path)?;
    if favorites.is_empty() {
        favorites.toggle("m-0")?;
        favorites.toggle("m-4")?;
    }

    let tab = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<FeedTab>().ok())
        .unwrap_or_default();
    println!(
        "{} fixtures loaded, {} live, tab: {tab}",
        state.matches.len(),
        live_count(&state.matches)
    );

    let shown = apply_tab(tab, &state.matches, &favorites.ids());
    for group in group_by_league(&shown) {
        println!("\n{}", group.league_name);
        for fixture in &group.matches {
            let star = if favorites.contains(&fixture.id) { "*" } else { " " };
            println!(
                "{star} {:>6}  {:<20} {:^5} {}",
                display_status(fixture),
                fixture.home.name,
                fixture.result(),
                fixture.away.name
            );
        }
    }

    let mut loader = MatchDetailLoader::new(source, feed.cache().clone());
    loader.load("m-0");
    let detail = loader.settled().await;
    if let Some(details) = &detail.details {
        println!("\n{} ({})", details.fixture.title(), details.result);
        let events = chronological(&visible(&detail.events));
        let goals = running_score(&events);
        for event in &events {
            let kind = EventKind::of(event);
            let score = goals
                .iter()
                .find(|(goal, _)| goal.id == event.id)
                .map(|(_, score)| format!(" [{score}]"))
                .unwrap_or_default();
            println!("{:>5}  {:<14} {}{score}", event.minute, kind.to_string(), event.primary_player);
        }
    } else if let Some(error) = &detail.error {
        println!("\n{error}");
    }

    Ok(())
}
