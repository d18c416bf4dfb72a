//! CLI argument definitions.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use revclient::ClientConfig;

use crate::commands::{extend, get, login, logoff, search, verify, whoami};

/// Command line client for the Vbrick Rev API.
#[derive(Parser, Debug)]
#[command(name = "rev")]
#[command(author, version = env!("REV_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session
    Login(login::LoginArgs),

    /// Display the stored session
    Whoami(whoami::WhoamiArgs),

    /// Extend the stored session
    Extend(extend::ExtendArgs),

    /// Check the stored session with the server
    Verify(verify::VerifyArgs),

    /// Revoke and forget the stored session
    Logoff(logoff::LogoffArgs),

    /// Send a GET request and print the response
    Get(get::GetArgs),

    /// Page through a search endpoint
    Search(search::SearchArgs),
}

/// Tenant and credential options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Rev tenant URL
    #[arg(long, env = "REV_URL", global = true)]
    pub url: Option<String>,

    /// Username for password login
    #[arg(long, env = "REV_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password for password login
    #[arg(long, env = "REV_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// API key for key login
    #[arg(long, env = "REV_API_KEY", global = true)]
    pub api_key: Option<String>,

    /// Secret for key login
    #[arg(long, env = "REV_SECRET", hide_env_values = true, global = true)]
    pub secret: Option<String>,

    /// JSON configuration file; flags override its values
    #[arg(long, env = "REV_CONFIG", global = true)]
    pub config: Option<PathBuf>,
}

impl ConnectionArgs {
    /// Merge the configuration file (if any) with explicit options.
    ///
    /// `fallback_url` is used when neither source names a tenant.
    pub fn client_config(&self, fallback_url: Option<&str>) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                ClientConfig::from_json(&json).context("Invalid config file")?
            }
            None => ClientConfig::default(),
        };

        if let Some(url) = &self.url {
            config.base_url = url.clone();
        }
        if config.base_url.is_empty() {
            config.base_url = fallback_url
                .context("No tenant URL. Pass --url or set REV_URL.")?
                .to_string();
        }

        overlay(&mut config.username, &self.username);
        overlay(&mut config.password, &self.password);
        overlay(&mut config.api_key, &self.api_key);
        overlay(&mut config.secret, &self.secret);

        Ok(config)
    }
}

fn overlay(target: &mut Option<String>, value: &Option<String>) {
    if value.is_some() {
        *target = value.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"baseUrl": "https://a.rev.vbrick.com", "apiKey": "file-key", "secret": "file-secret"}}"#
        )
        .unwrap();

        let args = ConnectionArgs {
            api_key: Some("flag-key".into()),
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };

        let config = args.client_config(None).unwrap();
        assert_eq!(config.base_url, "https://a.rev.vbrick.com");
        assert_eq!(config.api_key.as_deref(), Some("flag-key"));
        assert_eq!(config.secret.as_deref(), Some("file-secret"));
    }

    #[test]
    fn fallback_url_is_used_last() {
        let args = ConnectionArgs::default();
        let config = args.client_config(Some("https://stored.rev.vbrick.com")).unwrap();
        assert_eq!(config.base_url, "https://stored.rev.vbrick.com");

        let args = ConnectionArgs {
            url: Some("https://flag.rev.vbrick.com".into()),
            ..Default::default()
        };
        let config = args.client_config(Some("https://stored.rev.vbrick.com")).unwrap();
        assert_eq!(config.base_url, "https://flag.rev.vbrick.com");
    }

    #[test]
    fn missing_url_is_an_error() {
        assert!(ConnectionArgs::default().client_config(None).is_err());
    }

    #[test]
    fn cli_parses_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "rev",
            "get",
            "/api/v2/users",
            "--url",
            "https://t.rev.vbrick.com",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.connection.url.as_deref(), Some("https://t.rev.vbrick.com"));
        assert!(matches!(cli.command, Commands::Get(_)));
    }
}
