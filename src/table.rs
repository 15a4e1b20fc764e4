use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use std::{
    collections::HashMap,
    fmt::{self, Display},
    path::Path,
    sync::OnceLock,
};

use crate::{
    error::{Error, Result},
    sum::Sum,
};

/// Identifies one of the two definition files and everything that depends
/// on which one it is.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TableKind {
    Branch,
    Commodity,
}

impl TableKind {
    #[must_use]
    pub fn definition_file(self) -> &'static str {
        match self {
            TableKind::Branch => "branch.lst",
            TableKind::Commodity => "commodity.lst",
        }
    }

    #[must_use]
    pub fn report_file(self) -> &'static str {
        match self {
            TableKind::Branch => "branch.out",
            TableKind::Commodity => "commodity.out",
        }
    }

    /// Returns the pattern codes of this kind must satisfy.
    ///
    /// Branch codes are three digits. Commodity codes are eight characters
    /// with at least one digit, one lowercase and one uppercase letter.
    #[must_use]
    pub fn code_pattern(self) -> &'static CodePattern {
        static BRANCH: OnceLock<CodePattern> = OnceLock::new();
        static COMMODITY: OnceLock<CodePattern> = OnceLock::new();
        match self {
            TableKind::Branch => BRANCH.get_or_init(|| CodePattern::all(&[r"^[0-9]{3}$"])),
            TableKind::Commodity => COMMODITY
                .get_or_init(|| CodePattern::all(&[r"^.{8}$", r"[0-9]", r"[a-z]", r"[A-Z]"])),
        }
    }
}

impl Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TableKind::Branch => "Branch",
            TableKind::Commodity => "Commodity",
        })
    }
}

/// A set of regular expressions that a code must match all of.
///
/// `regex` has no look-around, so a rule like "contains a digit and an
/// uppercase letter" is written as several simple expressions instead.
#[derive(Debug)]
pub struct CodePattern(Vec<Regex>);

impl CodePattern {
    /// Builds a pattern from fixed expressions.
    ///
    /// # Panics
    ///
    /// If any expression is invalid. Only use this with literals.
    #[must_use]
    pub fn all(exprs: &[&str]) -> Self {
        Self(
            exprs
                .iter()
                .map(|e| Regex::new(e).unwrap_or_else(|err| panic!("bad code pattern {e}: {err}")))
                .collect(),
        )
    }

    #[must_use]
    pub fn is_match(&self, code: &str) -> bool {
        self.0.iter().all(|r| r.is_match(code))
    }
}

/// One definition line, plus its running total.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    pub code: String,
    pub name: String,
    pub sum: Sum,
}

#[derive(Debug, Deserialize)]
struct Definition {
    code: String,
    name: String,
}

/// Holds the definitions read from one definition file.
///
/// Entries keep the order in which they were read, which is also the order
/// they are reported in. Lookup by code goes through an index, so it doesn't
/// depend on table size.
#[derive(Debug)]
pub struct ReferenceTable {
    kind: TableKind,
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl ReferenceTable {
    /// Creates an empty table of the given kind.
    #[must_use]
    pub fn new(kind: TableKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Reads the definition file for `kind` from `dir`.
    ///
    /// # Errors
    ///
    /// See [`Self::load_from`].
    pub fn load(dir: impl AsRef<Path>, kind: TableKind) -> Result<Self> {
        Self::load_from(dir.as_ref().join(kind.definition_file()), kind)
    }

    /// Reads definitions from `path`.
    ///
    /// The file consists of definitions, one per line, in the following
    /// format:
    ///
    /// ```txt
    /// CODE,NAME
    /// ```
    ///
    /// `CODE` must satisfy [`TableKind::code_pattern`] and `NAME` must not be
    /// empty. Blank lines are ignored. If a code appears twice, the later
    /// name wins but the entry keeps its first position.
    ///
    /// # Errors
    ///
    /// Returns errors if:
    /// * The file does not exist ([`Error::FileNotFound`])
    /// * A line has the wrong number of fields, an empty name, or a code
    ///   that doesn't match the pattern ([`Error::InvalidFormat`])
    /// * The file cannot be read ([`Error::Io`])
    pub fn load_from(path: impl AsRef<Path>, kind: TableKind) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound { kind });
        }
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_path(path)
            .map_err(|e| Error::from_csv(path, e))?;
        let pattern = kind.code_pattern();
        let mut table = Self::new(kind);
        for result in rdr.records() {
            let record = result.map_err(|e| Error::from_csv(path, e))?;
            let line = record.position().map_or(0, csv::Position::line);
            if record.len() != 2 {
                return Err(Error::InvalidFormat { kind, line });
            }
            let def: Definition = record
                .deserialize(None)
                .map_err(|_| Error::InvalidFormat { kind, line })?;
            if def.name.is_empty() || !pattern.is_match(&def.code) {
                return Err(Error::InvalidFormat { kind, line });
            }
            table.insert(def.code, def.name);
        }
        debug!(%kind, path = %path.display(), entries = table.len(), "definitions loaded");
        Ok(table)
    }

    /// Adds a definition with a zero total, or renames an existing one.
    pub fn insert(&mut self, code: impl Into<String>, name: impl Into<String>) {
        let code = code.into();
        let name = name.into();
        if let Some(&i) = self.index.get(&code) {
            self.entries[i].name = name;
            return;
        }
        self.index.insert(code.clone(), self.entries.len());
        self.entries.push(Entry {
            code,
            name,
            sum: Sum::default(),
        });
    }

    #[must_use]
    pub fn kind(&self) -> TableKind {
        self.kind
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Entry> {
        self.index.get(code).map(|&i| &self.entries[i])
    }

    /// Returns the running total for `code`, if it is defined.
    #[must_use]
    pub fn sum(&self, code: &str) -> Option<Sum> {
        self.get(code).map(|e| e.sum)
    }

    /// Replaces the running total for `code`. Returns `false` if `code` is not
    /// defined, in which case nothing changes.
    pub fn set_sum(&mut self, code: &str, sum: Sum) -> bool {
        match self.index.get(code) {
            Some(&i) => {
                self.entries[i].sum = sum;
                true
            }
            None => false,
        }
    }

    /// Returns the entries in definition order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
