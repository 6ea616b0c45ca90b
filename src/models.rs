//! Domain models that mirror the SQLite schema and get passed throughout the
//! TUI. `Coin` is the persisted record; `ImportEntry` is the smaller shape the
//! bundled reference files carry before a coin has an id or a collected flag.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone)]
/// One collectible coin and whether the user owns it yet.
pub struct Coin {
    /// Primary key. Generated once when the coin is created and never
    /// rewritten afterwards.
    pub id: Uuid,
    /// Display name, e.g. the park or person featured on the reverse.
    pub name: String,
    /// Reference set the coin belongs to.
    pub series: String,
    /// Issue year.
    pub year: i64,
    /// Mint mark. `None` means the mark does not apply.
    pub mint_mark: Option<String>,
    /// The only field that changes after import.
    pub is_collected: bool,
}

impl Coin {
    /// Build a fresh, uncollected coin with a new id. Blank mint marks are
    /// folded into `None`.
    pub fn new(
        name: impl Into<String>,
        series: impl Into<String>,
        year: i64,
        mint_mark: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            series: series.into(),
            year,
            mint_mark: normalize_mint_mark(mint_mark),
            is_collected: false,
        }
    }

    /// Turn a decoded reference entry into a coin ready for insertion.
    pub fn from_entry(entry: ImportEntry) -> Self {
        Self::new(entry.name, entry.series, entry.year, entry.mint_mark)
    }

    pub fn mint_mark_label(&self) -> Option<&str> {
        self.mint_mark.as_deref()
    }

    /// `Name (2012-D)` or `Name (2012)` when no mint mark applies. Used by the
    /// list rows and status messages.
    pub fn display_title(&self) -> String {
        match self.mint_mark_label() {
            Some(mark) => format!("{} ({}-{})", self.name, self.year, mark),
            None => format!("{} ({})", self.name, self.year),
        }
    }
}

impl PartialEq for Coin {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Coin {}

impl Hash for Coin {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_title())
    }
}

/// One element of a reference file. Keys other than these four are ignored,
/// so a stray `isCollected` in the source data never reaches the store.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ImportEntry {
    pub name: String,
    pub series: String,
    pub year: i64,
    #[serde(rename = "mintMark", default)]
    pub mint_mark: Option<String>,
}

fn normalize_mint_mark(mint_mark: Option<String>) -> Option<String> {
    mint_mark
        .map(|mark| mark.trim().to_string())
        .filter(|mark| !mark.is_empty())
}
