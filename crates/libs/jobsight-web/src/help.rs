//! Heuristic help pages, read once at startup.

use std::collections::BTreeMap;

use jobsight_config::HeuristicConfig;
use tracing::info;

use crate::prelude::*;

#[derive(Debug, Clone, Default)]
pub struct HelpPages {
    pages: BTreeMap<String, String>,
}

impl HelpPages {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Reads the help fragment of every heuristic.
    ///
    /// Fails on the first fragment that is missing, unreadable or empty.
    pub fn load(heuristics: &[HeuristicConfig]) -> Result<Self> {
        let mut pages = BTreeMap::new();
        for heuristic in heuristics {
            let html = std::fs::read_to_string(&heuristic.help_page).map_err(|source| {
                Error::HelpPage {
                    name: heuristic.name.clone(),
                    path: heuristic.help_page.clone(),
                    source,
                }
            })?;
            if html.trim().is_empty() {
                return Err(Error::HelpPage {
                    name: heuristic.name.clone(),
                    path: heuristic.help_page.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::InvalidData, "empty help page"),
                });
            }
            pages.insert(heuristic.name.clone(), html);
        }
        info!("Loaded {} help pages", pages.len());
        Ok(Self { pages })
    }

    pub fn get(&self, topic: &str) -> Option<&str> {
        self.pages.get(topic).map(String::as_str)
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }
}
