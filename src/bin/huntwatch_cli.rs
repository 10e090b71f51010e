use anyhow::{anyhow, Result};
use clap::Parser;
use huntwatch_rs::client::HuntwatchClient;
use huntwatch_rs::config::Config;
use huntwatch_rs::models::{Ammunition, Gun, Hunter, ShotCreate};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, rename_all = "snake_case")]
struct Args {
    /// Command to execute: stats, hunters, hunter_detail, guns, shots, record_shot, ammunition, add_ammunition, activities, violations, zones, licenses, purchases, create_hunter, register_gun
    #[arg(short, long)]
    command: String,

    /// Backend API URL (or set HUNTWATCH_API_URL env var)
    #[arg(long, name = "api_url")]
    api_url: Option<String>,

    /// Hunter ID (for hunter_detail; filters shots, violations, licenses, purchases)
    #[arg(long, name = "hunter_id")]
    hunter_id: Option<i64>,

    /// Gun owner ID (filters the guns command)
    #[arg(long, name = "owner_id")]
    owner_id: Option<i64>,

    /// Maximum number of records to fetch (shots command)
    #[arg(long)]
    limit: Option<u32>,

    /// Record payload as JSON (for create/record commands)
    #[arg(long)]
    json: Option<String>,
}

// example usage:
// HUNTWATCH_API_URL=http://localhost:8000 ./target/release/huntwatch_cli --command stats
// HUNTWATCH_API_URL=http://localhost:8000 ./target/release/huntwatch_cli --command hunters
// HUNTWATCH_API_URL=http://localhost:8000 ./target/release/huntwatch_cli --command hunter_detail --hunter_id 3
// HUNTWATCH_API_URL=http://localhost:8000 ./target/release/huntwatch_cli --command shots --hunter_id 3 --limit 10
// HUNTWATCH_API_URL=http://localhost:8000 ./target/release/huntwatch_cli --command record_shot --json '{"gun": 1, "sound_level": 95.2, "vibration_level": 61.0, "latitude": 40.71, "longitude": -74.0, "notes": ""}'
// HUNTWATCH_API_URL=http://localhost:8000 ./target/release/huntwatch_cli --command create_hunter --json '{"name": "Jane Doe", "license_number": "HL-2041", "current_location": "North Ridge", "is_active": true}'

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = match args.api_url {
        Some(url) => Config {
            api_base_url: url,
            ..Config::default()
        },
        None => Config::from_env()?,
    };
    let client = HuntwatchClient::new(&config)?;

    match args.command.as_str() {
        "stats" => {
            let stats = client.get_dashboard_stats().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        "hunters" => {
            let hunters = client.get_hunters().await?;
            println!("{}", serde_json::to_string_pretty(&hunters)?);
        }
        "hunter_detail" => {
            let hunter_id = args
                .hunter_id
                .ok_or_else(|| anyhow!("hunter_id required for hunter_detail"))?;
            let detail = client.get_hunter_detail(hunter_id).await?;
            println!("{}", serde_json::to_string_pretty(&detail)?);
        }
        "guns" => {
            let guns = client.get_guns(args.owner_id).await?;
            println!("{}", serde_json::to_string_pretty(&guns)?);
        }
        "shots" => {
            let shots = client.get_shots(args.hunter_id, args.limit).await?;
            println!("{}", serde_json::to_string_pretty(&shots)?);
        }
        "record_shot" => {
            let json = args.json.ok_or_else(|| anyhow!("json required for record_shot"))?;
            let payload: ShotCreate = serde_json::from_str(&json)?;
            let shot = client.record_shot(&payload).await?;
            println!("{}", serde_json::to_string_pretty(&shot)?);
        }
        "ammunition" => {
            let inventory = client.get_ammunition().await?;
            println!("{}", serde_json::to_string_pretty(&inventory)?);
        }
        "add_ammunition" => {
            let json = args.json.ok_or_else(|| anyhow!("json required for add_ammunition"))?;
            let payload: Ammunition = serde_json::from_str(&json)?;
            let item = client.add_ammunition(&payload).await?;
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
        "activities" => {
            let activities = client.get_activities().await?;
            println!("{}", serde_json::to_string_pretty(&activities)?);
        }
        "violations" => {
            let violations = client.get_violations(args.hunter_id).await?;
            println!("{}", serde_json::to_string_pretty(&violations)?);
        }
        "zones" => {
            let zones = client.get_hunting_zones().await?;
            println!("{}", serde_json::to_string_pretty(&zones)?);
        }
        "licenses" => {
            let licenses = client.get_licenses(args.hunter_id).await?;
            println!("{}", serde_json::to_string_pretty(&licenses)?);
        }
        "purchases" => {
            let purchases = client.get_ammunition_purchases(args.hunter_id).await?;
            println!("{}", serde_json::to_string_pretty(&purchases)?);
        }
        "create_hunter" => {
            let json = args.json.ok_or_else(|| anyhow!("json required for create_hunter"))?;
            let payload: Hunter = serde_json::from_str(&json)?;
            let hunter = client.create_hunter(&payload).await?;
            println!("{}", serde_json::to_string_pretty(&hunter)?);
        }
        "register_gun" => {
            let json = args.json.ok_or_else(|| anyhow!("json required for register_gun"))?;
            let payload: Gun = serde_json::from_str(&json)?;
            let gun = client.register_gun(&payload).await?;
            println!("{}", serde_json::to_string_pretty(&gun)?);
        }
        other => {
            eprintln!("Unknown command: {}", other);
            std::process::exit(1);
        }
    }

    Ok(())
}
