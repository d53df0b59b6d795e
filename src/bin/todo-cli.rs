use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use todo_api::logging::{create_logger, Logger, LoggerOptions};
use todo_api::utils::jd;

#[derive(Parser)]
#[command(name = "todo-cli")]
#[command(about = "Command-line client for the todo API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:9000")]
    url: String,

    /// Logger level for this client (error, warn, info, debug).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the service answers
    Hello,
    /// Create a todo
    Create {
        message: String,
        #[arg(short, long)]
        label: Option<String>,
    },
    /// Fetch one todo
    Get { id: String },
    /// List every todo
    All,
    /// Change a todo's message
    Update { id: String, message: String },
    /// Delete a todo
    Delete { id: String },
    /// List the labels loaded by the service
    Labels,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let logger = create_logger(&LoggerOptions {
        file_name: file!().to_string(),
        log_level: cli.log_level.clone(),
        ..LoggerOptions::default()
    })?;
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::Hello => client.get(format!("{base}/hello")),
        Commands::Create { message, label } => {
            let mut body = json!({ "message": message });
            if let Some(label) = label {
                body["label"] = json!(label);
            }
            client.post(format!("{base}/todo/create")).json(&body)
        }
        Commands::Get { id } => client.get(format!("{base}/todo/{id}")),
        Commands::All => client.get(format!("{base}/todo/all")),
        Commands::Update { id, message } => client
            .put(format!("{base}/todo/{id}/update"))
            .json(&json!({ "message": message })),
        Commands::Delete { id } => client.delete(format!("{base}/todo/{id}/delete")),
        Commands::Labels => client.get(format!("{base}/labels")),
    };

    logger.deb(format!("Sending request to {base}"));
    match request.send().await {
        Ok(response) => print_response(&logger, response).await?,
        Err(e) => logger.error(format!("Request failed: {e}")),
    }
    Ok(())
}

async fn print_response(logger: &Logger, res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let json: Value = res.json().await?;

    if !status.is_success() {
        let message = json
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| json.to_string());
        logger.error(format!("API returned status {status}: {message}"));
        return Ok(());
    }

    logger.print(jd(&json["result"]));
    Ok(())
}
