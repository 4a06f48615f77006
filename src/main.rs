use clap::{Parser, crate_version};
use solarcurve::{
    cli::{Args, Command, estimate},
    prelude::*,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Estimate(args) => estimate(&args).await?,
    }

    info!("done!");
    Ok(())
}
