//! Structured snapshots of an error chain, for logs and UIs

use crate::cause::Cause;
use crate::error::Error;
use crate::format::history;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A plain-data view of an error and its full diagnostic history.
///
/// With the `serde` feature, reports serialize to JSON (or any serde format)
/// so they can be shipped to structured log sinks.
///
/// ```rust
/// use faultline_error::{Context, Error};
///
/// let ctx = Context::background();
/// let err: Error = Error::new(&ctx, "disk full").propagate(&ctx, "save");
/// let report = err.report();
/// assert_eq!(report.message, "disk full");
/// assert_eq!(report.labels, vec!["save"]);
/// assert_eq!(report.links.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Report {
    pub message: String,
    /// `Debug` form of the cause discriminant, when one was set.
    pub kind: Option<String>,
    pub labels: Vec<&'static str>,
    pub provenance: Option<String>,
    pub panic: bool,
    /// Outermost first, same order as the `Full` rendering.
    pub links: Vec<ReportLink>,
}

/// One link of a [`Report`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ReportLink {
    pub label: Option<&'static str>,
    pub message: String,
    /// `file:line` of the construction site, when recorded.
    pub location: Option<String>,
    pub stack: Option<String>,
    pub foreign: bool,
    /// `source()` chain of a foreign error, nearest first.
    pub sources: Vec<String>,
}

impl<C: Cause> Error<C> {
    /// Snapshot this error. The empty error yields an empty report.
    pub fn report(&self) -> Report {
        if self.is_none() {
            return Report::default();
        }
        let kind = self.kind();
        let provenance = self.provenance();
        Report {
            message: self.message().to_string(),
            kind: (!kind.is_none()).then(|| format!("{:?}", kind)),
            labels: self.labels(),
            provenance: provenance.is_some().then(|| provenance.message().to_string()),
            panic: self.is_panic(),
            links: history(self)
                .into_iter()
                .map(|link| ReportLink {
                    label: link.label,
                    message: link.message.to_string(),
                    location: link
                        .trace
                        .location
                        .map(|l| format!("{}:{}", l.file(), l.line())),
                    stack: link.trace.stack.as_ref().map(|s| s.render()),
                    foreign: link.foreign.is_some(),
                    sources: link
                        .foreign
                        .map(|e| e.chain().skip(1).map(|s| s.to_string()).collect())
                        .unwrap_or_default(),
                })
                .collect(),
        }
    }
}

// =============================================================================
// Tracing
// =============================================================================

#[cfg(feature = "tracing")]
mod emit {
    use tracing::Level;

    use crate::cause::Cause;
    use crate::error::Error;
    use crate::format::Verbosity;

    impl<C: Cause> Error<C> {
        /// Emit one `tracing` event describing this error.
        ///
        /// The event message is the `Detailed` rendering; `error` holds the
        /// bare message and `labels` the tracking labels. Nothing is emitted
        /// for the empty error.
        pub fn emit(&self, level: Level) {
            if self.is_none() {
                return;
            }
            let labels = self.labels();
            let detail = self.display(Verbosity::Detailed);
            match level {
                Level::ERROR => {
                    tracing::event!(Level::ERROR, error = %self, labels = ?labels, "{}", detail)
                }
                Level::WARN => {
                    tracing::event!(Level::WARN, error = %self, labels = ?labels, "{}", detail)
                }
                Level::INFO => {
                    tracing::event!(Level::INFO, error = %self, labels = ?labels, "{}", detail)
                }
                Level::DEBUG => {
                    tracing::event!(Level::DEBUG, error = %self, labels = ?labels, "{}", detail)
                }
                Level::TRACE => {
                    tracing::event!(Level::TRACE, error = %self, labels = ?labels, "{}", detail)
                }
            }
        }
    }

    /// Emit the error of a result, if any, and hand the result back unchanged.
    ///
    /// Meant for subsystem boundaries: the caller still decides what to do
    /// with the error.
    pub trait ReportExt: Sized {
        fn emit_err(self, level: Level) -> Self;
    }

    impl<T, C: Cause> ReportExt for std::result::Result<T, Error<C>> {
        fn emit_err(self, level: Level) -> Self {
            if let Err(ref err) = self {
                err.emit(level);
            }
            self
        }
    }

    impl<T, C: Cause> ReportExt for faultline_result::Result<T, Error<C>> {
        fn emit_err(self, level: Level) -> Self {
            self.error().emit(level);
            self
        }
    }
}

#[cfg(feature = "tracing")]
pub use emit::ReportExt;
