use clap::{Parser, Subcommand};
use reqwest::StatusCode;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "log-cli")]
#[command(about = "Command-line client for the blood sugar log service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a reading
    Add {
        /// Measured blood sugar value
        #[arg(allow_negative_numbers = true)]
        value: f64,
        /// Meal label, e.g. Breakfast
        #[arg(short, long)]
        meal_type: Option<String>,
    },
    /// List all readings, newest first
    List,
    /// Delete a reading by id
    Delete { id: i64 },
    /// Check service health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Add { value, meal_type } => {
            client
                .post(format!("{base}/log"))
                .json(&json!({ "blood_sugar": value, "meal_type": meal_type }))
                .send()
                .await?
        }
        Commands::List => client.get(format!("{base}/logs")).send().await?,
        Commands::Delete { id } => client.delete(format!("{base}/log/{id}")).send().await?,
        Commands::Health => client.get(format!("{base}/health")).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let body = res.text().await?;
    let json = parse_body(status, &body)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

/// Non-success statuses become an error so the process exits non-zero.
fn parse_body(status: StatusCode, body: &str) -> Result<Value, Box<dyn std::error::Error>> {
    if !status.is_success() {
        let detail = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v["error"].as_str().map(str::to_owned))
            .unwrap_or_else(|| body.trim().to_string());
        return Err(format!("service returned status {status}: {detail}").into());
    }
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_fails() {
        let err = parse_body(StatusCode::NOT_FOUND, r#"{"error": "Log not found"}"#).unwrap_err();
        assert_eq!(err.to_string(), "service returned status 404 Not Found: Log not found");

        let err = parse_body(StatusCode::BAD_GATEWAY, "upstream down\n").unwrap_err();
        assert_eq!(err.to_string(), "service returned status 502 Bad Gateway: upstream down");
    }

    #[test]
    fn test_success_body_is_parsed() {
        let json = parse_body(StatusCode::OK, r#"{"message": "Log deleted successfully"}"#).unwrap();
        assert_eq!(json["message"], "Log deleted successfully");
    }
}
