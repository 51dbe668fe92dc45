use clap::Parser;
use reqwest::Url;

use crate::{
    api::{Entsoe, entsoe::DEFAULT_BASE_URL},
    prelude::*,
};

#[derive(Parser)]
pub struct EntsoeArgs {
    /// ENTSO-E Transparency Platform API base URL.
    #[clap(
        long = "entsoe-base-url",
        default_value = DEFAULT_BASE_URL,
        env = "ENTSOE_BASE_URL"
    )]
    pub entsoe_base_url: Url,

    /// ENTSO-E Transparency Platform security token.
    #[clap(long = "entsoe-api-token", env = "ENTSOE_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,
}

impl EntsoeArgs {
    /// Build the client, or [`None`] if the security token is not configured.
    pub fn try_api(&self) -> Result<Option<Entsoe>> {
        self.api_token
            .clone()
            .map(|api_token| Entsoe::try_new(self.entsoe_base_url.clone(), api_token))
            .transpose()
    }
}
