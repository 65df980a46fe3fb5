//! Merge, CSV and command-line configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};

use crate::debugger::DebugLevel;

/// Position of unified columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnOrder {
    /// Order of first appearance, scanning sources left to right.
    #[default]
    FirstSeen,
    /// Sorted by column name.
    Alphabetical,
}

/// What to do when the same column carries different types across sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypePolicy {
    /// Only identical types (or Null) may share a column.
    Strict,
    /// Widen to the least common supertype.
    #[default]
    Relaxed,
}

/// What to do with a value that cannot be converted to its column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoercionMode {
    #[default]
    FailFast,
    /// Replace the value with Null, log a warning and keep going.
    Lenient,
}

impl FromStr for ColumnOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "first_seen" | "first" => Ok(ColumnOrder::FirstSeen),
            "alphabetical" | "alpha" | "sorted" => Ok(ColumnOrder::Alphabetical),
            other => bail!("unknown column order '{other}' (expected first_seen or alphabetical)"),
        }
    }
}

impl FromStr for TypePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(TypePolicy::Strict),
            "relaxed" => Ok(TypePolicy::Relaxed),
            other => bail!("unknown type policy '{other}' (expected strict or relaxed)"),
        }
    }
}

impl FromStr for CoercionMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "fail_fast" | "strict" => Ok(CoercionMode::FailFast),
            "lenient" => Ok(CoercionMode::Lenient),
            other => bail!("unknown coercion mode '{other}' (expected fail_fast or lenient)"),
        }
    }
}

impl fmt::Display for ColumnOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnOrder::FirstSeen => write!(f, "first_seen"),
            ColumnOrder::Alphabetical => write!(f, "alphabetical"),
        }
    }
}

impl fmt::Display for TypePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypePolicy::Strict => write!(f, "strict"),
            TypePolicy::Relaxed => write!(f, "relaxed"),
        }
    }
}

impl fmt::Display for CoercionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoercionMode::FailFast => write!(f, "fail_fast"),
            CoercionMode::Lenient => write!(f, "lenient"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    pub column_order: ColumnOrder,
    pub type_policy: TypePolicy,
    pub coercion: CoercionMode,
    /// Exact byte match on names when true; ASCII case-folded otherwise.
    pub case_sensitive: bool,
    /// Drain sources on worker threads before concatenating.
    pub parallel: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            column_order: ColumnOrder::default(),
            type_policy: TypePolicy::default(),
            coercion: CoercionMode::default(),
            case_sensitive: true,
            parallel: false,
        }
    }
}

impl MergeOptions {
    pub fn strict() -> Self {
        Self {
            type_policy: TypePolicy::Strict,
            ..Self::default()
        }
    }

    pub fn with_column_order(mut self, order: ColumnOrder) -> Self {
        self.column_order = order;
        self
    }

    pub fn with_type_policy(mut self, policy: TypePolicy) -> Self {
        self.type_policy = policy;
        self
    }

    pub fn with_coercion(mut self, mode: CoercionMode) -> Self {
        self.coercion = mode;
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

pub const DEFAULT_INFER_ROWS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub quote: u8,
    pub has_header: bool,
    /// Field text read as Null in addition to the empty field.
    pub null_token: Option<String>,
    /// Records sampled for type inference; `0` samples the whole file.
    pub infer_rows: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            has_header: true,
            null_token: None,
            infer_rows: DEFAULT_INFER_ROWS,
        }
    }
}

impl CsvOptions {
    pub fn is_null(&self, field: &str) -> bool {
        field.is_empty() || self.null_token.as_deref() == Some(field)
    }
}

pub const DEFAULT_HEAD_ROWS: usize = 5;
pub const LOG_ENV_VAR: &str = "CSVMERGE_LOG";

/// Everything the `csvmerge` binary accepts on its command line.
#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    pub merge: MergeOptions,
    pub csv: CsvOptions,
    pub debug_level: DebugLevel,
    pub files: Vec<PathBuf>,
    pub dir: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub head: usize,
    pub shell: bool,
    pub timings: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            merge: MergeOptions::default(),
            csv: CsvOptions::default(),
            debug_level: DebugLevel::Off,
            files: Vec::new(),
            dir: None,
            out: None,
            head: DEFAULT_HEAD_ROWS,
            shell: false,
            timings: false,
        }
    }
}

impl CliConfig {
    /// Parses `args` (without the program name).
    ///
    /// `env_level` is the value of [`LOG_ENV_VAR`], if set; `--debug=` wins over it.
    pub fn from_args<I, S>(args: I, env_level: Option<&str>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cfg = CliConfig::default();

        if let Some(level) = env_level {
            cfg.debug_level = DebugLevel::parse(level)
                .ok_or_else(|| anyhow!("invalid {LOG_ENV_VAR} value '{level}'"))?;
        }

        for arg in args {
            let arg = arg.as_ref();

            if let Some(level) = arg.strip_prefix("--debug=") {
                cfg.debug_level =
                    DebugLevel::parse(level).ok_or_else(|| anyhow!("invalid debug level '{level}'"))?;
            } else if let Some(order) = arg.strip_prefix("--order=") {
                cfg.merge.column_order = order.parse()?;
            } else if let Some(policy) = arg.strip_prefix("--types=") {
                cfg.merge.type_policy = policy.parse()?;
            } else if arg == "--lenient" {
                cfg.merge.coercion = CoercionMode::Lenient;
            } else if arg == "--ignore-case" {
                cfg.merge.case_sensitive = false;
            } else if arg == "--parallel" {
                cfg.merge.parallel = true;
            } else if let Some(delim) = arg.strip_prefix("--delimiter=") {
                cfg.csv.delimiter = parse_byte(delim).context("--delimiter")?;
            } else if let Some(quote) = arg.strip_prefix("--quote=") {
                cfg.csv.quote = parse_byte(quote).context("--quote")?;
            } else if arg == "--no-header" {
                cfg.csv.has_header = false;
            } else if let Some(token) = arg.strip_prefix("--null=") {
                cfg.csv.null_token = Some(token.to_string());
            } else if let Some(n) = arg.strip_prefix("--infer-rows=") {
                cfg.csv.infer_rows = n
                    .parse()
                    .with_context(|| format!("invalid --infer-rows value '{n}'"))?;
            } else if let Some(path) = arg.strip_prefix("--out=") {
                cfg.out = Some(PathBuf::from(path));
            } else if let Some(n) = arg.strip_prefix("--head=") {
                cfg.head = n
                    .parse()
                    .with_context(|| format!("invalid --head value '{n}'"))?;
            } else if let Some(dir) = arg.strip_prefix("--dir=") {
                cfg.dir = Some(PathBuf::from(dir));
            } else if arg == "--shell" {
                cfg.shell = true;
            } else if arg == "--timings" {
                cfg.timings = true;
            } else if arg.starts_with("--") {
                bail!("unknown flag '{arg}'");
            } else {
                cfg.files.push(PathBuf::from(arg));
            }
        }

        Ok(cfg)
    }

    pub fn has_inputs(&self) -> bool {
        !self.files.is_empty() || self.dir.is_some()
    }
}

fn parse_byte(s: &str) -> Result<u8> {
    match s {
        "\\t" | "tab" => Ok(b'\t'),
        _ if s.len() == 1 => Ok(s.as_bytes()[0]),
        _ => bail!("expected a single ASCII character, got '{s}'"),
    }
}
