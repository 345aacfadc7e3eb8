mod application;
mod domain;
mod infrastructure;
mod presentation;

use clap::Parser;
use colored::Colorize;
use crate::application::services::HttpRequestService;
use crate::infrastructure::http_client::HyperHttpClient;
use crate::infrastructure::logging::init_tracing;
use crate::presentation::cli::Cli;

/// hep: HTTP requests from terse command-line items
///
/// `hep POST :8080/users Accept:application/json name=brett age:=30 dry==1`
/// sends a JSON body `{"age":30,"name":"brett"}` to
/// `http://localhost:8080/users?dry=1` and prints the response.
#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = match cli.config() {
        Ok(config) => config,
        Err(err) => fail(err),
    };
    init_tracing(&config);

    let http_client = HyperHttpClient::new(&config);
    let request_service = HttpRequestService::new(Box::new(http_client));

    if let Err(err) = cli.run(&request_service, &config).await {
        fail(err);
    }
}

fn fail(err: anyhow::Error) -> ! {
    eprintln!("{} {}", "error:".red().bold(), err);
    std::process::exit(1);
}
