use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use streakboard::{
    competitor::{
        repository::{CompetitorRepository, InMemoryCompetitorRepository},
        Competitor, CompetitorKind,
    },
    game::{repository::InMemoryGameRepository, CreateGameRequest, RecordResultRequest},
    league::repository::{InMemoryLeagueRepository, LeagueRepository},
    Actor, Game, GameResultService, League, LeagueLocks, StatRecord,
};

use super::mocks::{CountingCompetitorRepository, CountingGameRepository};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 1, 20, 0, 0).unwrap() + Duration::days(n)
}

pub struct TestSetup {
    pub service: Arc<GameResultService>,
    pub league_repository: Arc<InMemoryLeagueRepository>,
    pub competitors: Arc<CountingCompetitorRepository>,
    pub games: Arc<CountingGameRepository>,
    pub league: League,
    pub moderator: Actor,
    pub teams: Vec<Competitor>,
}

pub struct TestSetupBuilder {
    teams: Vec<String>,
    public: bool,
    lock_timeout: StdDuration,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            teams: vec![],
            public: false,
            lock_timeout: StdDuration::from_millis(2000),
        }
    }

    pub fn with_teams(mut self, teams: Vec<&str>) -> Self {
        self.teams = teams.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_four_teams(self) -> Self {
        self.with_teams(vec!["Aces", "Blazers", "Comets", "Dynamos"])
    }

    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }

    pub fn with_lock_timeout(mut self, timeout: StdDuration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub async fn build(self) -> TestSetup {
        let mut league = League::new("Sunday League".to_string(), self.public, false);
        league.moderators.insert("moderator".to_string());
        league.members.insert("member".to_string());

        let league_repository = Arc::new(InMemoryLeagueRepository::new());
        league_repository.create_league(&league).await.unwrap();

        let competitors = Arc::new(CountingCompetitorRepository::new(Arc::new(
            InMemoryCompetitorRepository::new(),
        )));
        let games = Arc::new(CountingGameRepository::new(Arc::new(
            InMemoryGameRepository::new(),
        )));

        let mut teams = Vec::new();
        for name in &self.teams {
            let team = Competitor::new(league.id.clone(), name.clone(), CompetitorKind::Team, None);
            competitors.create_competitor(&team).await.unwrap();
            teams.push(team);
        }

        let service = Arc::new(GameResultService::new(
            league_repository.clone(),
            competitors.clone(),
            games.clone(),
            LeagueLocks::new(self.lock_timeout),
        ));

        TestSetup {
            service,
            league_repository,
            competitors,
            games,
            league,
            moderator: Actor::user("moderator"),
            teams,
        }
    }
}

impl TestSetup {
    pub async fn schedule(&self, a: usize, b: usize, n: i64) -> Game {
        self.service
            .create_game(
                &self.league.id,
                CreateGameRequest {
                    competitor_ids: vec![self.teams[a].id.clone(), self.teams[b].id.clone()],
                    date: Some(day(n)),
                },
                Some(&self.moderator),
            )
            .await
            .expect("scheduling should succeed")
    }

    pub fn result(&self, winner: usize, loser: usize, redemption: bool) -> RecordResultRequest {
        RecordResultRequest {
            winner_id: Some(self.teams[winner].id.clone()),
            loser_id: Some(self.teams[loser].id.clone()),
            redemption: Some(redemption),
            date: None,
        }
    }

    pub async fn record(&self, game: &Game, winner: usize, loser: usize) {
        self.service
            .record_result(&game.id, self.result(winner, loser, false), Some(&self.moderator))
            .await
            .expect("recording should succeed");
    }

    pub async fn stats(&self, team: usize) -> StatRecord {
        self.competitors
            .load_stat_record(&self.teams[team].id)
            .await
            .unwrap()
    }
}
