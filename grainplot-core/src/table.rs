//! Named color tables
//!
//! A [`ColorTable`] is the read-only lookup the palette printer and the
//! renderer resolve color names through. Tables keep an explicit order:
//! built-in tables follow their `const` listing, loaded tables follow the
//! order of the source file.

use crate::color::Rgba;
use crate::error::{GrainError, Result};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Tableau palette, in the order matplotlib lists `TABLEAU_COLORS`.
pub const TABLEAU_COLORS: &[(&str, &str)] = &[
    ("tab:blue", "#1f77b4"),
    ("tab:orange", "#ff7f0e"),
    ("tab:green", "#2ca02c"),
    ("tab:red", "#d62728"),
    ("tab:purple", "#9467bd"),
    ("tab:brown", "#8c564b"),
    ("tab:pink", "#e377c2"),
    ("tab:gray", "#7f7f7f"),
    ("tab:olive", "#bcbd22"),
    ("tab:cyan", "#17becf"),
];

/// Single-letter base colors, in the order matplotlib lists `BASE_COLORS`.
pub const BASE_COLORS: &[(&str, &str)] = &[
    ("b", "0,0,1"),
    ("g", "0,0.5,0"),
    ("r", "1,0,0"),
    ("c", "0,0.75,0.75"),
    ("m", "0.75,0,0.75"),
    ("y", "0.75,0.75,0"),
    ("k", "0,0,0"),
    ("w", "1,1,1"),
];

/// Read-only mapping from color name to color value.
pub trait ColorTable {
    /// Names in table order.
    fn names(&self) -> Vec<&str>;

    /// Resolves a name. Fails with [`GrainError::ColorTableUnavailable`]
    /// when the name is unknown or its stored value is malformed.
    fn resolve(&self, name: &str) -> Result<Rgba>;

    /// Number of entries.
    fn len(&self) -> usize {
        self.names().len()
    }

    /// True when the table has no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Built-in palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Palette {
    #[default]
    Tableau,
    Base,
}

impl Palette {
    pub fn entries(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Palette::Tableau => TABLEAU_COLORS,
            Palette::Base => BASE_COLORS,
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Palette::Tableau => write!(f, "tableau"),
            Palette::Base => write!(f, "base"),
        }
    }
}

impl FromStr for Palette {
    type Err = GrainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tableau" | "tab" => Ok(Palette::Tableau),
            "base" => Ok(Palette::Base),
            other => Err(GrainError::ColorTableUnavailable(format!(
                "unknown palette '{other}'"
            ))),
        }
    }
}

/// Ordered table of `name -> color spec` entries.
///
/// Specs are parsed on lookup, so a malformed entry only fails the names
/// that use it.
#[derive(Debug, Clone, Default)]
pub struct NamedColorTable {
    entries: Vec<(String, String)>,
}

impl NamedColorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin(palette: Palette) -> Self {
        let mut table = Self::new();
        for (name, spec) in palette.entries() {
            table.insert(*name, *spec);
        }
        table
    }

    /// Adds an entry at the end, or replaces the spec of an existing name
    /// in place.
    pub fn insert(&mut self, name: impl Into<String>, spec: impl Into<String>) {
        let name = name.into();
        let spec = spec.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = spec,
            None => self.entries.push((name, spec)),
        }
    }

    /// Reads `name spec` pairs, one per line. Blank lines and lines starting
    /// with `#` are skipped. Specs may themselves start with `#`, so only a
    /// leading `#` marks a comment.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut table = Self::new();

        for (idx, line) in BufReader::new(reader).lines().enumerate() {
            let line = line.map_err(|e| GrainError::ColorTableUnavailable(e.to_string()))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next(), fields.next()) {
                (Some(name), Some(spec), None) => table.insert(name, spec),
                _ => {
                    return Err(GrainError::ColorTableUnavailable(format!(
                        "line {}: expected '<name> <color>', found '{line}'",
                        idx + 1
                    )))
                }
            }
        }

        Ok(table)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            GrainError::ColorTableUnavailable(format!("{}: {e}", path.display()))
        })?;
        let table = Self::from_reader(file)?;
        debug!(path = %path.display(), entries = table.entries.len(), "loaded color table");
        Ok(table)
    }

    /// Resolves every entry, failing on the first bad one.
    pub fn resolve_all(&self) -> Result<Vec<(&str, Rgba)>> {
        self.entries
            .iter()
            .map(|(name, _)| Ok((name.as_str(), self.resolve(name)?)))
            .collect()
    }
}

impl ColorTable for NamedColorTable {
    fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    fn resolve(&self, name: &str) -> Result<Rgba> {
        let (_, spec) = self
            .entries
            .iter()
            .find(|(n, _)| n == name)
            .ok_or_else(|| GrainError::ColorTableUnavailable(format!("no entry for '{name}'")))?;

        Rgba::parse(spec).map_err(|e| {
            debug!(name, spec = spec.as_str(), "unresolvable color entry");
            GrainError::ColorTableUnavailable(format!("entry '{name}': {e}"))
        })
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
