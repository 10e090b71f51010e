use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;
use rand::seq::SliceRandom;
use rand::Rng;
use tokio::time::interval;
use tracing::{info, warn};

use huntwatch_rs::client::HuntwatchClient;
use huntwatch_rs::config::Config;
use huntwatch_rs::models::{GunStatus, ShotCreate};

/// Posts randomized shot events against the backend so the dashboard has
/// live data to chew on during development.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seconds between simulated shots
    #[arg(long, default_value_t = 10)]
    interval_secs: u64,

    /// Stop after this many shots (runs forever when omitted)
    #[arg(long)]
    count: Option<u64>,
}

const BASE_LATITUDE: f64 = 40.7128;
const BASE_LONGITUDE: f64 = -74.0060;

fn random_shot(gun_id: i64) -> ShotCreate {
    let mut rng = rand::thread_rng();
    ShotCreate {
        gun: gun_id,
        sound_level: rng.gen_range(85.0..120.0),
        vibration_level: rng.gen_range(40.0..80.0),
        latitude: Some(BASE_LATITUDE + rng.gen_range(-0.05..0.05)),
        longitude: Some(BASE_LONGITUDE + rng.gen_range(-0.05..0.05)),
        notes: String::new(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    let client = HuntwatchClient::new(&config)?;

    let guns = client.get_guns(None).await?;
    let active: Vec<i64> = guns
        .iter()
        .filter(|g| g.status == GunStatus::Active)
        .filter_map(|g| g.id)
        .collect();
    if active.is_empty() {
        return Err(anyhow!("no active guns registered, nothing to simulate"));
    }
    info!(guns = active.len(), "simulating shots from active guns");

    let mut ticker = interval(Duration::from_secs(args.interval_secs));
    let mut fired: u64 = 0;

    loop {
        ticker.tick().await;

        let gun_id = {
            let mut rng = rand::thread_rng();
            *active.choose(&mut rng).expect("active gun list is non-empty")
        };
        let shot = random_shot(gun_id);

        match client.record_shot(&shot).await {
            Ok(created) => {
                fired += 1;
                info!(
                    id = ?created.id,
                    gun = gun_id,
                    sound = shot.sound_level,
                    "shot recorded"
                );
            }
            Err(e) => warn!(error = %e, gun = gun_id, "failed to record shot"),
        }

        if let Some(count) = args.count {
            if fired >= count {
                break;
            }
        }
    }

    info!(fired, "simulation complete");
    Ok(())
}
