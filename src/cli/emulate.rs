use clap::Parser;
use tokio::net::TcpListener;

use crate::{emulator::Emulator, prelude::*, signal::shutdown_signal};

#[derive(Parser)]
pub struct EmulateArgs {
    #[clap(long, env = "BIND_ADDRESS", default_value = "0.0.0.0:8888")]
    bind_address: String,

    #[clap(long, env = "EMULATOR_PATH", default_value = "/solutronic/")]
    path: String,
}

impl EmulateArgs {
    pub async fn run(self) -> Result {
        ensure!(self.path.starts_with('/'), "the path must start with a slash");
        let listener = TcpListener::bind(&self.bind_address)
            .await
            .with_context(|| format!("failed to bind to `{}`", self.bind_address))?;
        info!(bind_address = self.bind_address, path = self.path, "serving…");
        axum::serve(listener, Emulator::router(&self.path))
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}
