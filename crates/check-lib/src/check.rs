//! Check engine accumulating status and performance data for one run
//!
//! A [`CheckEngine`] owns the run-wide state of one plugin invocation:
//! the escalating [`Status`], the free-text detail message and the ordered
//! performance data rows. Measured values are registered against the
//! positional threshold sets supplied at construction, and the final
//! output line plus exit code come out of [`CheckEngine::render`]. The
//! engine performs no I/O; printing the line and exiting the process is
//! the caller's job.

use std::fmt::Write;

use crate::threshold::{parse_num, ThresholdSet};

/// Plugin run status, ordered by severity.
///
/// The numeric codes are the standard monitoring exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Status {
    /// Process exit code for this status.
    pub fn code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }

    /// Status name as it appears at the start of the output line.
    pub fn name(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        }
    }
}

/// One row of reported telemetry.
///
/// The value is pre-formatted by the caller; the engine never reformats
/// it. The optional warn/crit fields are display strings for the
/// performance data segment and are replaced by the re-serialized
/// configured thresholds when [`CheckEngine::record_performance`] finds
/// one at the row's position.
#[derive(Debug, Clone, PartialEq)]
pub struct PerfData {
    pub label: String,
    pub value: String,
    pub uom: Option<String>,
    pub warn: Option<String>,
    pub crit: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
}

impl PerfData {
    /// A row with just a label and a value.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            uom: None,
            warn: None,
            crit: None,
            min: None,
            max: None,
        }
    }

    /// Set the unit of measure appended to the value.
    pub fn uom(mut self, uom: impl Into<String>) -> Self {
        self.uom = Some(uom.into());
        self
    }

    /// Set the warning display string.
    pub fn warn(mut self, warn: impl Into<String>) -> Self {
        self.warn = Some(warn.into());
        self
    }

    /// Set the critical display string.
    pub fn crit(mut self, crit: impl Into<String>) -> Self {
        self.crit = Some(crit.into());
        self
    }

    /// Set the declared minimum of the metric's domain.
    pub fn min(mut self, min: impl Into<String>) -> Self {
        self.min = Some(min.into());
        self
    }

    /// Set the declared maximum of the metric's domain.
    pub fn max(mut self, max: impl Into<String>) -> Self {
        self.max = Some(max.into());
        self
    }
}

/// Run-wide state of one plugin invocation.
#[derive(Debug, Clone)]
pub struct CheckEngine {
    status: Status,
    detail: String,
    perf_data: Vec<PerfData>,
    warning: ThresholdSet,
    critical: ThresholdSet,
}

impl CheckEngine {
    /// An engine starting at `OK` with the given positional thresholds.
    pub fn new(warning: ThresholdSet, critical: ThresholdSet) -> Self {
        Self {
            status: Status::Ok,
            detail: String::new(),
            perf_data: Vec::new(),
            warning,
            critical,
        }
    }

    /// Current run status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Append a performance data row.
    ///
    /// A threshold configured at `position` replaces the row's warn/crit
    /// display strings with its re-serialized form, even when the caller
    /// supplied its own. Never evaluates anything or changes the status.
    pub fn record_performance(&mut self, mut data: PerfData, position: usize) {
        if let Some(critical) = self.critical.get(position) {
            data.crit = Some(critical.to_string());
        }
        if let Some(warning) = self.warning.get(position) {
            data.warn = Some(warning.to_string());
        }
        self.perf_data.push(data);
    }

    /// Evaluate a measured value against the thresholds at `position`.
    ///
    /// A triggered critical threshold wins outright: the status becomes
    /// `Critical` and the warning threshold at the same position is not
    /// consulted. A triggered warning threshold raises the status unless
    /// it is already `Critical`, but still reports `Warning` to the
    /// caller. A value that does not parse as a number never triggers.
    pub fn evaluate(&mut self, value: &str, position: usize) -> Status {
        let Some(value) = parse_num(value) else {
            return Status::Ok;
        };

        if let Some(critical) = self.critical.get(position) {
            if critical.check(value) {
                self.status = Status::Critical;
                return Status::Critical;
            }
        }

        if let Some(warning) = self.warning.get(position) {
            if warning.check(value) {
                if self.status != Status::Critical {
                    self.status = Status::Warning;
                }
                return Status::Warning;
            }
        }

        Status::Ok
    }

    /// Append a space-prefixed fragment to the detail message.
    ///
    /// Callers use this to list the names of metrics whose evaluation
    /// came back non-`OK`.
    pub fn append_detail(&mut self, text: &str) {
        self.detail.push(' ');
        self.detail.push_str(text);
    }

    /// Replace both status and detail unconditionally.
    ///
    /// For conditions outside the threshold model, e.g. a key missing
    /// from the collected data or a transport fault mapped to `Unknown`.
    pub fn override_status(&mut self, status: Status, message: &str) {
        self.status = status;
        self.detail = message.to_string();
    }

    /// Raise the status to `to` if it is more severe, keeping the detail.
    pub fn escalate(&mut self, to: Status) {
        if to > self.status {
            self.status = to;
        }
    }

    /// Render the output line and exit code from the accumulated state.
    ///
    /// Pure given the current state; the caller prints the line on
    /// stdout and exits with the code.
    pub fn render(&self) -> (String, i32) {
        let mut output = String::from(self.status.name());

        if !self.detail.is_empty() {
            output.push_str(": ");
            output.push_str(self.detail.trim());
        }

        if !self.perf_data.is_empty() {
            output.push_str(" - ");
            for item in &self.perf_data {
                output.push_str(&item.label);
                output.push('=');
                output.push_str(&item.value);
                if let Some(uom) = &item.uom {
                    output.push_str(uom);
                }
                output.push(' ');
            }

            output.push('|');
            for item in &self.perf_data {
                // infallible on String
                let _ = write!(output, "'{}'={}", item.label, item.value);
                if let Some(uom) = &item.uom {
                    output.push_str(uom);
                }
                for field in [&item.warn, &item.crit, &item.min, &item.max] {
                    output.push(';');
                    if let Some(field) = field {
                        output.push_str(field);
                    }
                }
            }
        }

        (output, self.status.code())
    }
}
