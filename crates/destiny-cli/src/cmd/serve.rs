use anyhow::{Context, Result};
use destiny_core::config::{Config, WarnLevel};
use std::path::Path;

pub fn run(root: &Path, port: u16, no_open: bool) -> Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    if config.validate().iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors; refusing to serve");
    }

    let rt = tokio::runtime::Runtime::new()?;
    let root_buf = root.to_path_buf();

    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        let actual_port = listener.local_addr()?.port();
        println!("destiny → http://localhost:{actual_port}  (root {})", root_buf.display());

        tokio::select! {
            res = destiny_server::serve_on(root_buf, listener, !no_open) => res,
            _ = tokio::signal::ctrl_c() => Ok(()),
        }
    })
}
