//! Wall-clock timing of the merge phases (open, unify, concat, write).

use std::cell::RefCell;
use std::time::{Duration, Instant};

pub struct PhaseTracker {
    phases: Vec<Phase>,
    current: Option<usize>,
}

struct Phase {
    name: String,
    start: Instant,
    end: Option<Instant>,
    parent: Option<usize>,
    depth: usize,
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self {
            phases: Vec::new(),
            current: None,
        }
    }

    pub fn begin(&mut self, name: impl Into<String>) {
        let depth = self.current.map(|p| self.phases[p].depth + 1).unwrap_or(0);

        self.phases.push(Phase {
            name: name.into(),
            start: Instant::now(),
            end: None,
            parent: self.current,
            depth,
        });
        self.current = Some(self.phases.len() - 1);
    }

    pub fn end(&mut self) {
        if let Some(idx) = self.current {
            self.phases[idx].end = Some(Instant::now());
            self.current = self.phases[idx].parent;
        }
    }

    /// Durations of finished phases, in the order they were started.
    pub fn durations(&self) -> Vec<(String, Duration)> {
        self.phases
            .iter()
            .filter_map(|p| p.end.map(|end| (p.name.clone(), end.duration_since(p.start))))
            .collect()
    }

    pub fn report(&self) -> String {
        let mut output = String::new();
        output.push_str("\n=== Merge Timeline ===\n");

        for phase in &self.phases {
            let duration = phase
                .end
                .map(|end| end.duration_since(phase.start))
                .unwrap_or_default();

            output.push_str(&format!(
                "{}{}  {:.2}ms\n",
                "  ".repeat(phase.depth),
                phase.name,
                duration.as_secs_f64() * 1000.0
            ));
        }

        output
    }
}

thread_local! {
    static PHASE_TRACKER: RefCell<PhaseTracker> = RefCell::new(PhaseTracker::new());
}

pub fn begin_phase(name: impl Into<String>) {
    PHASE_TRACKER.with(|t| t.borrow_mut().begin(name));
}

pub fn end_phase() {
    PHASE_TRACKER.with(|t| t.borrow_mut().end());
}

pub fn get_report() -> String {
    PHASE_TRACKER.with(|t| t.borrow().report())
}

pub fn reset() {
    PHASE_TRACKER.with(|t| *t.borrow_mut() = PhaseTracker::new());
}

#[macro_export]
macro_rules! db_phase {
    ($name:expr, $body:block) => {{
        $crate::debugger::phases::begin_phase($name);
        let result = $body;
        $crate::debugger::phases::end_phase();
        result
    }};
}
