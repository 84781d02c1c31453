// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Subcommands:
// - warm: load one or more pages into the cache and report what got cached
// - extract: print the image URLs found in a local markup file
//
// Every tuning flag can also come from an environment variable, which is
// handy when the warmer runs from a service unit or a cron job.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use page_warmer::config::{
    default_user_agent, WarmerConfig, DEFAULT_CACHE_MAX_BYTES, DEFAULT_LEAD_IMAGE_WIDTH,
    DEFAULT_TIMEOUT_SECS,
};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "page-warmer",
    version,
    about = "Prefetch every image a wiki page references so the HTTP cache is warm",
    long_about = "page-warmer fetches the lead and remaining parts of wiki pages, finds every \
                  image they reference (including high-density srcset variants) and fetches \
                  those images in the background so the response cache already holds them."
)]
pub struct Cli {
    /// Log debug output from the warmer (RUST_LOG overrides this)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Warm the cache for one or more pages
    ///
    /// Example: page-warmer warm --site en.wikipedia.org "Rust (programming language)"
    Warm {
        /// Wiki site: a host (en.wikipedia.org) or an origin (http://localhost:8080)
        #[arg(long, env = "PAGE_WARMER_SITE", default_value = "en.wikipedia.org")]
        site: String,

        /// Page titles to warm
        #[arg(required = true)]
        titles: Vec<String>,

        #[command(flatten)]
        tuning: TuningArgs,

        /// Output cache statistics as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the image URLs referenced by a local markup file
    ///
    /// Example: page-warmer extract saved_page.html
    Extract {
        /// Markup file to read
        file: PathBuf,

        /// Output the URLs as a JSON array
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct TuningArgs {
    /// Per-request timeout in seconds
    #[arg(long, env = "PAGE_WARMER_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// User-Agent header sent with every request
    #[arg(long, env = "PAGE_WARMER_USER_AGENT", default_value_t = default_user_agent())]
    pub user_agent: String,

    /// Screen width the lead image is requested for (rounded up to a thumbnail size)
    #[arg(long, env = "PAGE_WARMER_LEAD_WIDTH", default_value_t = DEFAULT_LEAD_IMAGE_WIDTH)]
    pub lead_width: u32,

    /// Most bytes the response cache may hold; least recently used entries go first
    #[arg(long, env = "PAGE_WARMER_CACHE_MAX_BYTES", default_value_t = DEFAULT_CACHE_MAX_BYTES)]
    pub cache_max_bytes: u64,
}

impl TuningArgs {
    pub fn to_config(&self) -> WarmerConfig {
        WarmerConfig {
            request_timeout: Duration::from_secs(self.timeout),
            user_agent: self.user_agent.clone(),
            lead_image_width: self.lead_width,
            cache_max_bytes: self.cache_max_bytes,
        }
    }
}
