use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::info;

use huntwatch_rs::client::HuntwatchClient;
use huntwatch_rs::config::Config;
use huntwatch_rs::connection::Supervisor;
use huntwatch_rs::reconciler::PollReconciler;
use huntwatch_rs::store::Store;
use huntwatch_rs::ui;

#[tokio::main]
async fn main() -> Result<()> {
    // Log to stderr so tracing output does not fight the terminal UI.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    info!(url = %config.get_api_base_url(), "starting dashboard");

    let client = HuntwatchClient::new(&config)?;
    let store = Store::new(config.shot_window_cap);
    let cancel = CancellationToken::new();

    let supervisor = Supervisor::new(client.clone(), store.clone(), &config, cancel.clone());

    // Initial load runs in the background so the UI comes up immediately and
    // shows the connecting badge while it works.
    let init = supervisor.clone();
    tokio::spawn(async move {
        let _ = init.initialize().await;
    });

    let reconciler = PollReconciler::new(
        client.clone(),
        store.clone(),
        supervisor.status(),
        &config,
        cancel.clone(),
    );
    let poller = tokio::spawn(reconciler.run());
    let prober = tokio::spawn(supervisor.clone().run_health_probe());

    let result = ui::run_dashboard(store, supervisor, cancel.clone()).await;

    cancel.cancel();
    let _ = poller.await;
    let _ = prober.await;
    info!("dashboard stopped");

    result
}
