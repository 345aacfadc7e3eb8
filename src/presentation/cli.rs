use crate::application::services::HttpRequestService;
use crate::infrastructure::config::Config;
use crate::infrastructure::output;
use anyhow::Result;
use clap::Parser;
use std::time::Duration;

/// CLI configuration for hep
#[derive(Parser, Debug)]
#[command(name = "hep", version)]
#[command(
    about = "Build and send HTTP requests from terse command-line items",
    long_about = "Build and send HTTP requests from terse command-line items.\n\n\
        Usage: hep [OPTIONS] [METHOD] HOST [ITEM...]\n\n\
        Items:\n  \
        Name:value     request header\n  \
        name==value    query parameter\n  \
        path=value     string field in the JSON body (dots nest: person.name=brett)\n  \
        path:=json     JSON-typed field (person.age:=100, tags:='[1,2]')\n\n\
        HOST shortcuts: ':' and 'localhost' mean http://localhost/, ':8080/path' and\n\
        '/path' target localhost, a missing scheme defaults to http://."
)]
pub struct Cli {
    /// Optional METHOD, then HOST, then request items
    #[arg(required = true, value_name = "ARGS", trailing_var_arg = true)]
    pub args: Vec<String>,

    /// Enable debug logging and print the response status
    #[arg(short, long)]
    pub verbose: bool,

    /// Give up on the request after this many seconds
    #[arg(short, long, value_name = "SECONDS")]
    pub timeout: Option<f64>,

    /// Print the request that would be sent instead of sending it
    #[arg(long)]
    pub offline: bool,

    /// Save the response body to a file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,
}

impl Cli {
    /// The run-wide configuration these flags describe
    pub fn config(&self) -> Result<Config> {
        let timeout = match self.timeout {
            Some(seconds) => Some(
                Duration::try_from_secs_f64(seconds)
                    .map_err(|e| anyhow::anyhow!("Invalid timeout '{}': {}", seconds, e))?,
            ),
            None => None,
        };

        Ok(Config {
            verbose: self.verbose,
            timeout,
            offline: self.offline,
            output: self.output.as_ref().map(Into::into),
        })
    }

    pub async fn run(&self, request_service: &HttpRequestService, config: &Config) -> Result<()> {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();

        if config.offline {
            let request = request_service.prepare(self.args.as_slice())?;
            return output::write_request(&request, &mut stdout.lock());
        }

        let response = request_service.execute(self.args.as_slice()).await?;

        match &config.output {
            Some(path) => {
                output::save_response_body(&response, path, &mut stderr.lock())?;
                if config.verbose {
                    eprintln!("Saved response to {}", path.display());
                }
                Ok(())
            }
            None => output::write_response(
                &response,
                config.verbose,
                &mut stderr.lock(),
                &mut stdout.lock(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_follow_flags() {
        let cli = Cli::try_parse_from(["hep", "-v", "POST", ":8080", "name=brett", "q==1"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.args, ["POST", ":8080", "name=brett", "q==1"]);
    }

    #[test]
    fn host_is_required() {
        assert!(Cli::try_parse_from(["hep", "--offline"]).is_err());
    }

    #[test]
    fn flags_become_config() {
        let cli = Cli::try_parse_from([
            "hep", "--timeout", "1.5", "--offline", "-o", "out.json", "example.com",
        ])
        .unwrap();
        let config = cli.config().unwrap();

        assert_eq!(config.timeout, Some(Duration::from_millis(1500)));
        assert!(config.offline);
        assert!(!config.verbose);
        assert_eq!(config.output, Some("out.json".into()));
        assert_eq!(config.log_filter(), "warn");
    }

    #[test]
    fn negative_timeout_is_rejected() {
        let cli = Cli::try_parse_from(["hep", "--timeout=-1", "example.com"]).unwrap();
        assert!(cli.config().is_err());
    }
}
