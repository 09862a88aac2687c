use web_server::{run_server, AppState};

// This main function is the entry point when running `cargo run -p web-server`.
// It loads settings, wires the collaborators, and hands off to `run_server`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let settings = configuration::load_settings()?;
    configuration::init_tracing(&settings.log)?;

    let addr = settings.server.socket_addr()?;
    let state = AppState::from_settings(&settings).await?;
    run_server(addr, state).await
}
