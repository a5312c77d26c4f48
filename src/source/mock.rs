use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, instrument};

use super::{MatchDetailSource, MatchSource, Page};
use crate::error::{FeedError, Result};
use crate::model::{CardCounts, FeedQuery, Match, MatchDetails, MatchEvent, MatchTeam, Score};

/// Simulated network latency of the mock dataset.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(400);

const PREMIER_LEAGUE: (&str, &str) = ("4328", "Premier League");
const CHAMPIONS_LEAGUE: (&str, &str) = ("4480", "Champions League");

const TEAMS: [(&str, &str); 14] = [
    ("Arsenal", "https://upload.wikimedia.org/wikipedia/en/5/53/Arsenal_FC.svg"),
    ("Chelsea", "https://upload.wikimedia.org/wikipedia/en/c/cc/Chelsea_FC.svg"),
    ("Liverpool", "https://upload.wikimedia.org/wikipedia/en/0/0c/Liverpool_FC.svg"),
    ("Manchester City", "https://upload.wikimedia.org/wikipedia/en/e/eb/Manchester_City_FC_badge.svg"),
    ("Manchester United", "https://upload.wikimedia.org/wikipedia/en/7/7a/Manchester_United_FC_crest.svg"),
    ("Tottenham", "https://upload.wikimedia.org/wikipedia/en/b/b4/Tottenham_Hotspur.svg"),
    ("Newcastle", "https://upload.wikimedia.org/wikipedia/en/5/56/Newcastle_United_Logo.svg"),
    ("Aston Villa", "https://upload.wikimedia.org/wikipedia/en/f/f9/Aston_Villa_FC_crest.svg"),
    ("Real Madrid", "https://upload.wikimedia.org/wikipedia/en/5/56/Real_Madrid_CF.svg"),
    ("Barcelona", "https://upload.wikimedia.org/wikipedia/en/4/47/FC_Barcelona_%28crest%29.svg"),
    ("Juventus", "https://upload.wikimedia.org/wikipedia/en/d/d2/Juventus_Logo.svg"),
    ("Napoli", "https://upload.wikimedia.org/wikipedia/commons/2/2d/SSC_Napoli.svg"),
    ("Benfica", "https://upload.wikimedia.org/wikipedia/en/a/a2/SL_Benfica_logo.svg"),
    ("Porto", "https://upload.wikimedia.org/wikipedia/en/f/f1/FC_Porto.svg"),
];

/// (kind, detail, home side, player, secondary, minute)
type ScriptedEvent = (&'static str, &'static str, bool, &'static str, Option<&'static str>, &'static str);

const HEADLINE_TIMELINE: [ScriptedEvent; 16] = [
    ("Corner", "1st Corner", false, "1st Corner", None, "3"),
    ("Goal", "Goal", true, "Gyokores", Some("Odegard"), "12"),
    ("Assist", "Assist", true, "Odegard", None, "12"),
    ("Goal", "Penalty", true, "Gyokores", None, "25"),
    ("Card", "Yellow Card", false, "Konate", None, "34"),
    ("Injury", "Injured", false, "Jones", None, "44"),
    ("Card", "Yellow Card", true, "Gabriel", None, "44"),
    ("Substitution", "In: Jones, Out: Mcalister", false, "Jones", Some("Mcalister"), "45"),
    ("Corner", "2nd Corner", true, "2nd corner", None, "45+2"),
    ("Period", "Halftime", true, "2 - 0", None, "HT"),
    ("Goal", "Goal", true, "Saka", None, "55"),
    ("Card", "Red Card (Sent Off)", false, "Van Dijk", Some("Sent Off"), "60"),
    ("Substitution", "In: Rice, Out: Zubemendi", true, "Rice", Some("Zubemendi"), "67"),
    ("Card", "Yellow Card", true, "Saliba", None, "78"),
    ("Goal", "Goal", false, "Ekitike", Some("Salah"), "85"),
    ("Period", "Fulltime", true, "3 - 1", None, "FT"),
];

const GENERIC_TIMELINE: [ScriptedEvent; 5] = [
    ("Goal", "Goal", true, "Saka", None, "15"),
    ("Card", "Yellow Card", false, "Rodri", None, "34"),
    ("Goal", "Penalty", false, "Haaland", None, "62"),
    ("Substitution", "In: Martinelli, Out: Trossard", true, "Martinelli", Some("Trossard"), "65"),
    ("Corner", "Corner", true, "White", None, "88"),
];

#[derive(Debug, Default)]
struct FailureBudget {
    pages: AtomicUsize,
    details: AtomicUsize,
    events: AtomicUsize,
}

fn take(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

/// In-memory dataset implementing both source traits, with simulated
/// latency.
#[derive(Debug)]
pub struct MockSource {
    matches: Vec<Match>,
    details: HashMap<String, MatchDetails>,
    events: HashMap<String, Vec<MatchEvent>>,
    latency: Duration,
    failures: FailureBudget,
    page_requests: AtomicUsize,
}

impl MockSource {
    pub fn new(matches: Vec<Match>) -> Self {
        Self {
            matches,
            details: HashMap::new(),
            events: HashMap::new(),
            latency: DEFAULT_LATENCY,
            failures: FailureBudget::default(),
            page_requests: AtomicUsize::new(0),
        }
    }

    /// Thirty fixtures on `date`, alternating between two leagues: three
    /// live, nine finished and the rest not started. Every fixture has
    /// details; finished and live ones have a timeline.
    pub fn demo(date: NaiveDate) -> Self {
        let matches = (0..30).map(|i| demo_fixture(i, date)).collect::<Vec<_>>();
        let mut source = Self::new(matches.clone());

        for (i, fixture) in matches.into_iter().enumerate() {
            let script: &[ScriptedEvent] = match (i, fixture.score) {
                (0, _) => &HEADLINE_TIMELINE,
                (_, Some(_)) => &GENERIC_TIMELINE,
                (_, None) => &[],
            };
            if !script.is_empty() {
                source.events.insert(fixture.id.clone(), scripted(&fixture.id, script));
            }
            source.details.insert(fixture.id.clone(), demo_details(fixture));
        }
        source
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_details(mut self, details: MatchDetails) -> Self {
        self.details.insert(details.id().to_string(), details);
        self
    }

    pub fn with_events(mut self, match_id: impl Into<String>, events: Vec<MatchEvent>) -> Self {
        self.events.insert(match_id.into(), events);
        self
    }

    /// Drop enriched details for `match_id`, leaving only the listed fixture.
    pub fn without_details(mut self, match_id: &str) -> Self {
        self.details.remove(match_id);
        self.events.remove(match_id);
        self
    }

    /// Make the next `n` page requests fail with a transport error.
    pub fn fail_pages(&self, n: usize) {
        self.failures.pages.store(n, Ordering::SeqCst);
    }

    /// Make the next `n` details requests fail with a transport error.
    pub fn fail_details(&self, n: usize) {
        self.failures.details.store(n, Ordering::SeqCst);
    }

    /// Make the next `n` timeline requests fail with a transport error.
    pub fn fail_events(&self, n: usize) {
        self.failures.events.store(n, Ordering::SeqCst);
    }

    /// Number of page requests received so far, including cancelled ones.
    pub fn page_requests(&self) -> usize {
        self.page_requests.load(Ordering::SeqCst)
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }
}

#[async_trait]
impl MatchSource for MockSource {
    #[instrument(skip(self))]
    async fn fetch_page(&self, query: &FeedQuery, offset: usize, limit: usize) -> Result<Page> {
        self.page_requests.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        if take(&self.failures.pages) {
            return Err(FeedError::transport("mock page request failed"));
        }

        let filtered = self.matches.iter().filter(|m| query.matches(m)).cloned();
        let page = Page::from_filtered(filtered, offset, limit);
        debug!(
            count = page.matches.len(),
            total = page.total_matching,
            "served mock page"
        );
        Ok(page)
    }
}

#[async_trait]
impl MatchDetailSource for MockSource {
    #[instrument(skip(self))]
    async fn fetch_details(&self, match_id: &str) -> Result<Option<MatchDetails>> {
        tokio::time::sleep(self.latency).await;
        if take(&self.failures.details) {
            return Err(FeedError::transport("mock details request failed"));
        }
        Ok(self.details.get(match_id).cloned())
    }

    #[instrument(skip(self))]
    async fn fetch_events(&self, match_id: &str) -> Result<Option<Vec<MatchEvent>>> {
        tokio::time::sleep(self.latency).await;
        if take(&self.failures.events) {
            return Err(FeedError::transport("mock timeline request failed"));
        }
        Ok(self.events.get(match_id).cloned())
    }
}

fn demo_fixture(i: usize, date: NaiveDate) -> Match {
    let (home_name, home_badge) = TEAMS[i % TEAMS.len()];
    let (away_name, away_badge) = TEAMS[(i + 7) % TEAMS.len()];
    let (league_id, league_name) = if i % 2 == 0 {
        PREMIER_LEAGUE
    } else {
        CHAMPIONS_LEAGUE
    };
    let is_live = i < 3;
    let is_finished = (3..12).contains(&i);

    Match {
        id: format!("m-{i}"),
        league_id: league_id.to_string(),
        league_name: league_name.to_string(),
        home: MatchTeam::new(format!("h-{i}"), home_name, home_badge),
        away: MatchTeam::new(format!("a-{i}"), away_name, away_badge),
        score: (is_live || is_finished).then(|| Score::new((i % 3) as u16, (i % 2) as u16)),
        status: match (is_live, is_finished) {
            (true, _) => "72'",
            (_, true) => "FT",
            _ => "NS",
        }
        .to_string(),
        date: Some(date),
        kickoff_time: NaiveTime::from_hms_opt(13, 0, 0),
        venue: "National Stadium".to_string(),
        round: Some(15),
        aggregate: None,
    }
}

fn demo_details(fixture: Match) -> MatchDetails {
    let (home_cards, away_cards) = match fixture.id.as_str() {
        "m-0" => (
            CardCounts { yellow: 2, red: 0 },
            CardCounts { yellow: 1, red: 1 },
        ),
        "m-3" => (
            CardCounts { yellow: 1, red: 0 },
            CardCounts { yellow: 2, red: 0 },
        ),
        _ => (CardCounts::default(), CardCounts::default()),
    };
    MatchDetails {
        description: format!(
            "Welcome to the big match between {} and {}.",
            fixture.home.name, fixture.away.name
        ),
        result: fixture.result(),
        video: String::new(),
        home_cards,
        away_cards,
        fixture,
    }
}

fn scripted(match_id: &str, script: &[ScriptedEvent]) -> Vec<MatchEvent> {
    script
        .iter()
        .enumerate()
        .map(
            |(i, &(kind, detail, is_home_side, player, secondary, minute))| MatchEvent {
                id: (i + 1).to_string(),
                match_id: match_id.to_string(),
                kind_raw: kind.to_string(),
                detail_raw: detail.to_string(),
                is_home_side,
                primary_player: player.to_string(),
                secondary_player: secondary.map(str::to_string),
                minute: minute.to_string(),
            },
        )
        .collect()
}
