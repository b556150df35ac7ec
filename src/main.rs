use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use toastbox::config::{self, Config};
use toastbox::notifications::{Manager, Outcome, PromiseMessages, State};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = pico_args::Arguments::from_env();
    let fail = args.contains("--fail");
    let config_path: Option<PathBuf> = args.opt_value_from_str("--config")?;
    let unused = args.finish();
    if !unused.is_empty() {
        tracing::warn!(?unused, "ignoring unknown arguments");
    }

    let config = match config_path {
        Some(path) => config::load_from_path(&path)?,
        None => Config::default(),
    };
    let manager = Manager::new(config.policy())?;

    let _subscription = manager.subscribe(|state: &Arc<State>| {
        let shown: Vec<String> = state
            .visible()
            .map(|n| format!("[{:?}] {}", n.kind(), n.text()))
            .collect();
        tracing::info!(total = state.len(), paused = state.is_paused(), ?shown, "snapshot");
    });

    manager.success("Settings saved");

    let upload = manager.promise(
        async move {
            tokio::time::sleep(Duration::from_millis(800)).await;
            if fail {
                Err("connection reset".to_string())
            } else {
                Ok(3_u32)
            }
        },
        PromiseMessages::new(
            "Uploading files",
            Outcome::computed(|count: &u32| format!("Uploaded {count} files")),
            Outcome::computed(|err: &String| format!("Upload failed: {err}")),
        ),
    );
    if let Err(err) = upload.await {
        tracing::warn!(error = %err, "upload failed");
    }

    manager.pause();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    manager.resume();

    while !manager.snapshot().is_empty() {
        tokio::time::sleep(Duration::from_millis(250)).await;
    }
    tracing::info!("all notifications removed");
    Ok(())
}
