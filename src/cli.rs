//! Command line and environment configuration.

use crate::infrastructure::StorefrontConfig;
use clap::Parser;
use directories::ProjectDirs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "skinshop", version, about = "Skin-type quiz and storefront in the terminal")]
pub struct Cli {
    /// Shop domain, e.g. glow-shop.myshopify.com
    #[arg(long, env = "SHOPIFY_STORE_DOMAIN")]
    pub store_domain: String,

    /// Storefront API access token
    #[arg(long, env = "SHOPIFY_STOREFRONT_TOKEN", hide_env_values = true)]
    pub storefront_token: String,

    #[arg(long, env = "SHOPIFY_API_VERSION", default_value = "2025-07")]
    pub api_version: String,

    /// How many products to request per listing
    #[arg(long, default_value_t = 20)]
    pub product_limit: usize,

    /// Where the cart is saved between sessions
    #[arg(long)]
    pub cart_file: Option<PathBuf>,

    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Request timeout for the storefront, in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,
}

impl Cli {
    pub fn storefront_config(&self) -> StorefrontConfig {
        StorefrontConfig {
            store_domain: self.store_domain.clone(),
            access_token: self.storefront_token.clone(),
            api_version: self.api_version.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    pub fn cart_path(&self) -> PathBuf {
        self.cart_file
            .clone()
            .unwrap_or_else(|| data_dir().join("cart.json"))
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| data_dir().join("skinshop.log"))
    }
}

fn data_dir() -> PathBuf {
    match ProjectDirs::from("", "", "skinshop") {
        Some(dirs) => dirs.data_local_dir().to_path_buf(),
        None => PathBuf::from(".").join(".skinshop"),
    }
}
