//! # Compression Presets
//!
//! Livelli di qualità inoltrati a Ghostscript tramite `-dPDFSETTINGS`.
//!
//! | Preset     | Descrizione    | Token        |
//! |------------|----------------|--------------|
//! | `screen`   | Very light     | `/screen`    |
//! | `ebook`    | Light          | `/ebook`     |
//! | `printer`  | Balanced       | `/printer`   |
//! | `prepress` | High quality   | `/prepress`  |
//! | `default`  | Default        | `/default`   |

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality/size tradeoff chosen once per run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Smallest output, screen-only quality
    #[value(alias = "very-light")]
    Screen,
    /// Good size/quality balance for reading on devices
    #[default]
    #[value(alias = "light")]
    Ebook,
    /// Print quality
    #[value(alias = "balanced")]
    Printer,
    /// Color-preserving, high quality
    #[value(alias = "high-quality")]
    Prepress,
    /// Ghostscript's own defaults
    Default,
}

impl Preset {
    /// Value passed to `-dPDFSETTINGS=`
    pub fn token(&self) -> &'static str {
        match self {
            Self::Screen => "/screen",
            Self::Ebook => "/ebook",
            Self::Printer => "/printer",
            Self::Prepress => "/prepress",
            Self::Default => "/default",
        }
    }

    /// Human-readable label for logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Screen => "Very light",
            Self::Ebook => "Light",
            Self::Printer => "Balanced",
            Self::Prepress => "High quality",
            Self::Default => "Default",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.token())
    }
}
