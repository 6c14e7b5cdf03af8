use crate::error::Result;
use crate::{KnowledgeError, SearchLauncher};
use std::process::Command;
use tracing::{debug, info};

const SEARCH_BASE: &str = "https://www.google.com/search?q=";

/// Build the search URL for a spoken query.
pub fn search_url(query: &str) -> String {
    format!("{}{}", SEARCH_BASE, urlencoding::encode(query.trim()))
}

/// Launches the platform's default browser on a search results page.
#[derive(Debug, Default, Clone)]
pub struct BrowserSearch;

impl BrowserSearch {
    pub fn new() -> Self {
        Self
    }

    fn open(url: &str) -> std::io::Result<()> {
        #[cfg(target_os = "macos")]
        {
            Command::new("open").arg(url).spawn()?;
        }

        #[cfg(target_os = "windows")]
        {
            // The empty string is the window title expected by `start`
            Command::new("cmd").args(["/C", "start", "", url]).spawn()?;
        }

        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            Command::new("xdg-open").arg(url).spawn()?;
        }

        Ok(())
    }
}

impl SearchLauncher for BrowserSearch {
    fn search(&self, query: &str) -> Result<()> {
        let url = search_url(query);
        debug!("Opening browser at {}", url);
        Self::open(&url)
            .map_err(|e| KnowledgeError::Unavailable(format!("failed to open browser: {e}")))?;
        info!("Opened web search for '{}'", query);
        Ok(())
    }
}
