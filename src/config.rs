use std::path::PathBuf;

use anyhow::Context as _;
use url::Url;

use crate::cli::ConnectionArgs;

/// The dev proxy forwards `/api/critica` here.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/public/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branding {
    pub name: &'static str,
    pub tagline: &'static str,
    pub home_url: &'static str,
    pub dashboard_url: &'static str,
    pub instructions_url: &'static str,
}

pub const BRANDING: Branding = Branding {
    name: "Critica",
    tagline: "Compare GPT3 paragraphs against human ones.",
    home_url: "/",
    dashboard_url: "/dashboard",
    instructions_url: "/#instructions",
};

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    pub session_dir: PathBuf,
}

impl Config {
    pub fn from_args(args: &ConnectionArgs) -> anyhow::Result<Self> {
        let api_url = parse_api_url(&args.api_url)?;
        let session_dir = match &args.session_dir {
            Some(dir) => dir.clone(),
            None => default_session_dir().context("resolve session dir")?,
        };
        Ok(Self {
            api_url,
            session_dir,
        })
    }
}

pub fn parse_api_url(raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("parse api url: {raw:?}"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("api url must be http/https: {url}");
    }
    Ok(url)
}

fn default_session_dir() -> anyhow::Result<PathBuf> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir).join("critica"));
    }
    let home = std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow::anyhow!("neither XDG_CONFIG_HOME nor HOME is set"))?;
    Ok(PathBuf::from(home).join(".config").join("critica"))
}
