use anyhow::Result;
use clap::Parser;
use hangouts::{
    db::{get_db_pool, migrations, DatabaseConfig, PgStore},
    models::{NewHangout, NewUser, ProfileUpdate, User},
    utils::{init_logging, Config},
    HangoutEngine,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Populate the database with a small demo friend graph
#[derive(Debug, Parser)]
#[command(name = "seed", about = "Seed the hangouts database with demo users")]
struct Args {
    /// Wipe users, hangouts and connection requests first
    #[arg(long)]
    reset: bool,

    /// Also create a demo hangout hosted by the first user
    #[arg(long)]
    with_hangout: bool,
}

const DEMO_USERS: [(&str, &str); 5] = [
    ("Alex", "Always up for a hike"),
    ("Blair", "Coffee enthusiast"),
    ("Casey", "Board game collector"),
    ("Devon", "Knows every taco truck"),
    ("Emery", "New in town"),
];

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let config = Config::from_env()?;
    let db_config = DatabaseConfig::from_env()?;
    let pool = get_db_pool(&db_config).await?;
    migrations::run_migrations(&pool).await?;

    let store = Arc::new(PgStore::new(pool));
    if args.reset {
        warn!("Wiping all users, hangouts and connection requests");
        store.wipe().await?;
    }

    let engine = HangoutEngine::new(store, config.engine_settings());

    let mut users: Vec<User> = Vec::with_capacity(DEMO_USERS.len());
    for (name, bio) in DEMO_USERS {
        let user = engine
            .register_user(NewUser {
                name: name.to_string(),
                bio: bio.to_string(),
                profile_image_url: format!("https://i.pravatar.cc/150?u={}", name.to_lowercase()),
            })
            .await?;
        users.push(user);
    }

    // Alex -> {Blair, Casey}; Devon -> {Casey}; Blair -> {Alex}; Emery knows nobody.
    let friend_lists = [(0, vec![1, 2]), (1, vec![0]), (3, vec![2])];
    for (owner, friends) in friend_lists {
        let update = ProfileUpdate {
            friend_ids: Some(friends.iter().map(|&i| users[i].id).collect()),
            ..ProfileUpdate::default()
        };
        let id = users[owner].id;
        users[owner] = engine.update_profile(id, id, update).await?;
    }

    for user in &users {
        info!("Seeded {} ({}) with {} friends", user.name, user.id, user.first_degree_friend_ids.len());
    }

    if args.with_hangout {
        let hangout = engine
            .create_hangout(
                users[0].id,
                NewHangout {
                    participant_ids: vec![users[1].id, users[3].id, users[4].id],
                    activity_description: "Tacos and a sunset walk".to_string(),
                    details: Some("Meet by the pier".to_string()),
                    scheduled_at: None,
                },
            )
            .await?;
        info!(
            "Seeded hangout {} with status {} ({} unreachable participants)",
            hangout.id,
            hangout.status,
            hangout.unreachable_participants.len()
        );
    }

    info!("Seeding complete");

    Ok(())
}
