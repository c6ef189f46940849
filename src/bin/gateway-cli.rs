use clap::{Parser, Subcommand};
use serde_json::{Map, Value};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Client CLI for a running command gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check gateway status
    Status,
    /// Call the hello endpoint
    Hello {
        #[arg(long)]
        name: Option<String>,
    },
    /// Call any endpoint; parameters go in the query for GET/DELETE, the JSON body otherwise
    Call {
        method: String,
        path: String,
        /// Parameters as key=value
        params: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Status => client.get(format!("{base}/api/status")).send().await?,
        Commands::Hello { name } => {
            let mut req = client.get(format!("{base}/api/hello"));
            if let Some(name) = name {
                req = req.query(&[("name", name)]);
            }
            req.send().await?
        }
        Commands::Call {
            method,
            path,
            params,
        } => {
            let method = reqwest::Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;
            let pairs = parse_params(&params)?;
            let url = format!("{base}/{}", path.trim_start_matches('/'));
            let req = client.request(method.clone(), url);
            let req = if method == reqwest::Method::GET || method == reqwest::Method::DELETE {
                req.query(&pairs)
            } else {
                let body: Map<String, Value> = pairs
                    .into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect();
                req.json(&body)
            };
            req.send().await?
        }
    };

    print_response(res).await
}

fn parse_params(raw: &[String]) -> Result<Vec<(String, String)>, String> {
    raw.iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| format!("expected key=value, got '{pair}'"))
        })
        .collect()
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
    }

    let text = res.text().await?;
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) if !text.is_empty() => println!("{}", text),
        Err(_) => {}
    }
    Ok(())
}
