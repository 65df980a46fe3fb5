use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl DebugLevel {
    pub fn from_u8(level: u8) -> Self {
        match level {
            0 => DebugLevel::Off,
            1 => DebugLevel::Error,
            2 => DebugLevel::Warn,
            3 => DebugLevel::Info,
            4 => DebugLevel::Debug,
            _ => DebugLevel::Trace,
        }
    }

    /// Accepts either a number (`0..=5`) or a level name, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        if let Ok(n) = s.trim().parse::<u8>() {
            return Some(Self::from_u8(n));
        }

        match s.trim().to_uppercase().as_str() {
            "OFF" => Some(DebugLevel::Off),
            "ERROR" => Some(DebugLevel::Error),
            "WARN" => Some(DebugLevel::Warn),
            "INFO" => Some(DebugLevel::Info),
            "DEBUG" => Some(DebugLevel::Debug),
            "TRACE" => Some(DebugLevel::Trace),
            _ => None,
        }
    }
}

/// Subsystem tag printed next to every log line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Component {
    Source,
    Unify,
    Concat,
    Merge,
    Output,
    Cli,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Component::Source => "source",
            Component::Unify => "unify",
            Component::Concat => "concat",
            Component::Merge => "merge",
            Component::Output => "output",
            Component::Cli => "cli",
        };
        write!(f, "{name}")
    }
}

pub static DEBUG_LEVEL: AtomicU8 = AtomicU8::new(DebugLevel::Off as u8);

pub fn set_debug_level(level: DebugLevel) {
    DEBUG_LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn get_debug_level() -> DebugLevel {
    DebugLevel::from_u8(DEBUG_LEVEL.load(Ordering::Relaxed))
}

#[inline]
pub fn should_log(level: DebugLevel) -> bool {
    level != DebugLevel::Off && (level as u8) <= DEBUG_LEVEL.load(Ordering::Relaxed)
}

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Indents log lines on this thread until dropped, including on early return.
pub struct ScopeIndent {
    active: bool,
}

impl ScopeIndent {
    pub fn enter(active: bool) -> Self {
        if active {
            DEPTH.with(|d| d.set(d.get() + 1));
        }
        Self { active }
    }
}

impl Drop for ScopeIndent {
    fn drop(&mut self) {
        if self.active {
            DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
        }
    }
}

pub fn format_indent() -> String {
    DEPTH.with(|d| "  ".repeat(d.get()))
}

pub mod color {
    pub const RED: &str = "\x1b[31m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const GREEN: &str = "\x1b[32m";
    pub const BLUE: &str = "\x1b[34m";
    pub const GRAY: &str = "\x1b[90m";
    pub const RESET: &str = "\x1b[0m";
}
