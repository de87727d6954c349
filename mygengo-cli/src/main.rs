mod command;
mod config;

use crate::command::{Args, Command, Output};
use crate::config::Config;
use clap::Parser;
use mygengo::Client;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "mygengo", version, about = "Call the myGengo translation API")]
#[command(after_help = "Examples:
  mygengo get_account_balance
  mygengo get_job 8754 pre_mt=1
  mygengo submit_job 'This is a test' es tier=standard auto_approve=1
  mygengo update_job 8754 approve rating=5
  mygengo get_jobs status=reviewable count=10

Set RUST_LOG=mygengo=debug to see each request.")]
struct Cli {
    /// Config file with `api_key`, `private_key` and `sandbox`
    #[arg(short, long, env = "MYGENGO_CONFIG", default_value = "mygengo.toml")]
    config: PathBuf,

    #[arg(value_enum)]
    command: Command,

    /// Positional args and `key=value` params, in the order the client method takes them
    args: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mygengo=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();

    let conf = Config::load(&cli.config)?;
    let client = Client::builder()
        .api_key(conf.api_key)
        .private_key(conf.private_key)
        .sandbox(conf.sandbox)
        .build();
    tracing::debug!("using {}", client.base_url());

    let args = Args::parse(cli.args);
    match command::run(&client, cli.command, &args).await? {
        Output::Json(v) => println!("{}", serde_json::to_string_pretty(&v)?),
        Output::Text(s) => println!("{s}"),
        Output::Done => println!("ok"),
    }
    Ok(())
}
