use std::sync::Arc;

use streakboard::{
    auth::TokenConfig,
    build_router,
    competitor::repository::{
        CompetitorRepository, InMemoryCompetitorRepository, PostgresCompetitorRepository,
    },
    game::repository::{GameRepository, InMemoryGameRepository, PostgresGameRepository},
    league::repository::{InMemoryLeagueRepository, LeagueRepository, PostgresLeagueRepository},
    AppState, GameResultService, LeagueLocks, ServerConfig,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Repositories = (
    Arc<dyn LeagueRepository>,
    Arc<dyn CompetitorRepository>,
    Arc<dyn GameRepository>,
);

async fn repositories(config: &ServerConfig) -> Result<Repositories, sqlx::Error> {
    match &config.database_url {
        Some(database_url) => {
            info!("Using PostgreSQL repositories");
            let pool = sqlx::PgPool::connect(database_url).await?;
            let leagues: Arc<dyn LeagueRepository> =
                Arc::new(PostgresLeagueRepository::new(pool.clone()));
            let competitors: Arc<dyn CompetitorRepository> =
                Arc::new(PostgresCompetitorRepository::new(pool.clone()));
            let games: Arc<dyn GameRepository> = Arc::new(PostgresGameRepository::new(pool));
            Ok((leagues, competitors, games))
        }
        None => {
            info!("DATABASE_URL not set, using in-memory repositories");
            let leagues: Arc<dyn LeagueRepository> = Arc::new(InMemoryLeagueRepository::new());
            let competitors: Arc<dyn CompetitorRepository> =
                Arc::new(InMemoryCompetitorRepository::new());
            let games: Arc<dyn GameRepository> = Arc::new(InMemoryGameRepository::new());
            Ok((leagues, competitors, games))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "streakboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting streakboard server");

    let config = ServerConfig::from_env();
    let (league_repository, competitor_repository, game_repository) =
        repositories(&config).await?;

    let game_result_service = Arc::new(GameResultService::new(
        league_repository.clone(),
        competitor_repository.clone(),
        game_repository.clone(),
        LeagueLocks::new(config.recompute_lock_timeout),
    ));

    let app_state = AppState::new(
        league_repository,
        competitor_repository,
        game_repository,
        game_result_service,
        TokenConfig::from_config(&config),
    );

    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr.as_str()).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
