use srcinit::presentation::cli::CliApp;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Run the CLI application; logging is initialized once flags are parsed
    let app = CliApp::new();
    app.run().await
}
