use crate::commands::{Command, LoginArgs};
use anyhow::{bail, Context, Result};
use fophelp_api::auth::{API_PASSWORD, API_USERNAME};
use fophelp_api::types::AddIncomeRequest;
use fophelp_api::LoginService;
use fophelp_http_client::ReqwestClient;
use fophelp_sdk::common::TokenStore;
use fophelp_sdk::config::{Config, EnvFileStore, EnvLoader};
use fophelp_sdk::FophelpApiClient;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

const LINE_WIDTH: usize = 60;

pub struct Runner {
    config: Config,
    env_file: PathBuf,
    debug: bool,
}

impl Runner {
    pub async fn new(base_url: Option<String>, env_file: PathBuf, debug: bool) -> Result<Self> {
        let loader =
            if env_file.exists() { EnvLoader::with_path(&env_file) } else { EnvLoader::new() };
        let mut config = Config::load(&loader).await?;
        if let Some(base_url) = base_url {
            config.base_url = base_url;
        }
        Ok(Self { config, env_file, debug })
    }
    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Login(args) => {
                let (username, password) = self.login_credentials(args)?;
                self.login(&username, &password).await
            }
            Command::Incomes => {
                let client = self.client()?;
                let incomes = client.incomes().get_incomes().await?;
                self.save_tokens(&client)?;
                self.print(&incomes.data)
            }
            Command::AddIncome(args) => {
                let client = self.client()?;
                let response = client
                    .incomes()
                    .add_income(&AddIncomeRequest {
                        income: args.income,
                        date: args.date,
                        comment: args.comment,
                        currency: args.currency,
                        cash: args.cash,
                    })
                    .await?;
                self.save_tokens(&client)?;
                self.print(&response)
            }
            Command::Taxes => {
                let client = self.client()?;
                let taxes = client.taxes().get_taxes().await?;
                self.save_tokens(&client)?;
                self.print(&taxes.data)
            }
        }
    }
    fn client(&self) -> Result<FophelpApiClient<ReqwestClient>> {
        FophelpApiClient::new(self.config.clone(), ReqwestClient::new()).with_context(|| {
            format!("Not logged in, run `login` first or fill in {:?}", self.env_file)
        })
    }
    /// Writes the credentials back to the env file if a refresh changed them.
    ///
    /// Only the five credential keys are written; a `--base-url` override stays
    /// local to this run.
    fn save_tokens(&self, client: &FophelpApiClient<ReqwestClient>) -> Result<()> {
        let credentials = client.token_store().credentials();
        if self.config.credentials.as_ref() != Some(&credentials) {
            EnvFileStore::new(&self.env_file).save_credentials(&credentials)?;
            tracing::info!(path = ?self.env_file, "saved refreshed tokens");
        }
        Ok(())
    }
    /// Username and password from the arguments (or the process environment),
    /// falling back to `API_USERNAME` and `API_PASSWORD` in the env file.
    fn login_credentials(&self, args: LoginArgs) -> Result<(String, String)> {
        let file_vars = if self.env_file.exists() {
            dotenv::from_path_iter(&self.env_file)?
                .collect::<std::result::Result<HashMap<_, _>, _>>()?
        } else {
            HashMap::new()
        };
        let resolve = |value: Option<String>, key: &str| {
            value.or_else(|| file_vars.get(key).cloned()).filter(|s| !s.is_empty())
        };
        match (resolve(args.username, API_USERNAME), resolve(args.password, API_PASSWORD)) {
            (Some(username), Some(password)) => Ok((username, password)),
            _ => bail!(
                "Missing credentials: pass --username and --password, or set {API_USERNAME} \
                 and {API_PASSWORD} in {:?}",
                self.env_file
            ),
        }
    }
    async fn login(&self, username: &str, password: &str) -> Result<()> {
        println!("Username: {username}");
        let tokens = LoginService::new(&self.config.base_url, Arc::new(ReqwestClient::new()))
            .login_and_update_env(username, password, Some(&self.env_file))
            .await
            .context("Login failed")?;
        println!("Login successful! Tokens saved to {:?}", self.env_file);
        println!("{}", "-".repeat(LINE_WIDTH));
        println!("Access Token:    {}...", truncate(&tokens.access_token, 50));
        println!("Refresh Token:   {}", tokens.refresh_token);
        println!("Username:        {}", tokens.username);
        println!("Session User:    {}", tokens.session_user);
        println!("Refresh Expires: {}", tokens.refresh_expires);
        println!("{}", "-".repeat(LINE_WIDTH));
        Ok(())
    }
    fn print<T: std::fmt::Debug + Serialize>(&self, result: &T) -> Result<()> {
        if self.debug {
            println!("{:#?}", result);
        } else {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        Ok(())
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}
