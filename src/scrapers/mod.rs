//! Per-site configurations for the supported retailers

pub mod iki;
pub mod lidl;
pub mod maxima;

use std::fmt;

use clap::ValueEnum;

use crate::errors::ScrapeError;
use crate::traits::SiteConfig;

/// A supported retailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Site {
    Iki,
    Lidl,
    Maxima,
}

impl Site {
    pub const ALL: [Site; 3] = [Site::Iki, Site::Lidl, Site::Maxima];

    /// Build the site's configuration, parsing its selectors.
    pub fn config(self) -> Result<SiteConfig, ScrapeError> {
        match self {
            Site::Iki => iki::config(),
            Site::Lidl => lidl::config(),
            Site::Maxima => maxima::config(),
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Site::Iki => "Iki",
            Site::Lidl => "Lidl",
            Site::Maxima => "Maxima",
        };
        f.write_str(name)
    }
}
