//! Verbosity-controlled rendering
//!
//! | Specifier | Verbosity  | Output                                         |
//! |-----------|------------|------------------------------------------------|
//! | `{}`      | `Minimal`  | `message`                                      |
//! | `{:?}`    | `Standard` | `[label] message`                              |
//! | `{:#}`    | `Detailed` | `[label1,label2] message -> provenance`        |
//! | `{:#?}`   | `Full`     | detailed line, then one block per chain link   |
//!
//! Rendering never fails and the empty error renders as an empty string at
//! every level.

use std::fmt::{self, Write};

use crate::cause::Cause;
use crate::error::{Error, Kind, PANIC};
use crate::stack::Trace;

/// How much of an error to render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verbosity {
    /// Message text only.
    #[default]
    Minimal,
    /// Message with its first tracking label.
    Standard,
    /// Every label, plus the message of the error this one superseded.
    Detailed,
    /// Detailed, then every link of the history with its call site and stack.
    Full,
}

/// One block of the `Full` rendering.
pub(crate) struct Link<'a> {
    pub(crate) label: Option<&'static str>,
    pub(crate) message: &'a str,
    pub(crate) trace: &'a Trace,
    pub(crate) foreign: Option<&'a anyhow::Error>,
    /// An unlabeled `wrap` node, printed as `(wrap)`.
    pub(crate) wrap: bool,
}

/// Flatten the diagnostic history of `err`, outermost first.
///
/// Each link is followed by its identity successor and then by its
/// provenance, so the list covers every error the chain ever touched.
pub(crate) fn history<C: Cause>(err: &Error<C>) -> Vec<Link<'_>> {
    let mut links = Vec::new();
    collect(err, &mut links);
    links
}

fn collect<'a, C: Cause>(err: &'a Error<C>, out: &mut Vec<Link<'a>>) {
    let Some(node) = err.node.as_deref() else {
        return;
    };
    match &node.kind {
        Kind::Origin { message, .. } => out.push(Link {
            label: None,
            message,
            trace: &node.trace,
            foreign: None,
            wrap: false,
        }),
        Kind::Foreign { message, error } => out.push(Link {
            label: None,
            message,
            trace: &node.trace,
            foreign: Some(error),
            wrap: false,
        }),
        Kind::Panic { message } => out.push(Link {
            label: Some(PANIC),
            message,
            trace: &node.trace,
            foreign: None,
            wrap: false,
        }),
        Kind::Converted { label, from, to } => {
            // bare wraps with nothing recorded fold into their successor
            if label.is_some() || !node.trace.is_empty() {
                out.push(Link {
                    label: *label,
                    message: err.message(),
                    trace: &node.trace,
                    foreign: None,
                    wrap: label.is_none(),
                });
            }
            collect(to, out);
            collect(from, out);
        }
        Kind::Propagated { hops, inner } => {
            // most recent hop first
            for hop in hops.iter().rev() {
                out.push(Link {
                    label: Some(hop.label),
                    message: err.message(),
                    trace: &hop.trace,
                    foreign: None,
                    wrap: false,
                });
            }
            collect(inner, out);
        }
    }
}

impl<C: Cause> Error<C> {
    /// Render at the given verbosity.
    pub fn render(&self, verbosity: Verbosity) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.write_to(&mut out, verbosity);
        out
    }

    /// A `Display` adapter rendering at the given verbosity.
    ///
    /// ```rust
    /// use faultline_error::{Context, Error, Verbosity};
    ///
    /// let ctx = Context::background();
    /// let err: Error = Error::new(&ctx, "disk full").propagate(&ctx, "save");
    /// assert_eq!(format!("{}", err.display(Verbosity::Standard)), "[save] disk full");
    /// ```
    pub fn display(&self, verbosity: Verbosity) -> Render<'_, C> {
        Render {
            err: self,
            verbosity,
        }
    }

    fn write_to<W: Write>(&self, out: &mut W, verbosity: Verbosity) -> fmt::Result {
        if self.is_none() {
            return Ok(());
        }
        match verbosity {
            Verbosity::Minimal => out.write_str(self.message()),
            Verbosity::Standard => {
                if let Some(label) = self.labels().first() {
                    write!(out, "[{}] ", label)?;
                }
                out.write_str(self.message())
            }
            Verbosity::Detailed => self.write_detailed(out),
            Verbosity::Full => {
                self.write_detailed(out)?;
                for link in history(self) {
                    out.write_str("\n\n")?;
                    write_link(out, &link)?;
                }
                Ok(())
            }
        }
    }

    fn write_detailed<W: Write>(&self, out: &mut W) -> fmt::Result {
        let labels = self.labels();
        if !labels.is_empty() {
            write!(out, "[{}] ", labels.join(","))?;
        }
        out.write_str(self.message())?;
        let provenance = self.provenance();
        if provenance.is_some() {
            write!(out, " -> {}", provenance.message())?;
        }
        Ok(())
    }
}

fn write_link<W: Write>(out: &mut W, link: &Link<'_>) -> fmt::Result {
    match link.label {
        Some(label) => write!(out, "==== [{}] {} ====", label, link.message)?,
        None if link.wrap => write!(out, "==== (wrap) {} ====", link.message)?,
        None => write!(out, "==== {} ====", link.message)?,
    }
    if let Some(location) = link.trace.location {
        write!(out, "\nat {}:{}", location.file(), location.line())?;
    }
    match (&link.trace.stack, link.foreign) {
        (Some(stack), _) => write!(out, "\n{}", stack.render().trim_end())?,
        (None, Some(_)) => out.write_str("\n(no stack trace available)")?,
        (None, None) => {}
    }
    if let Some(error) = link.foreign {
        for source in error.chain().skip(1) {
            write!(out, "\ncaused by: {}", source)?;
        }
    }
    Ok(())
}

/// Renders an [`Error`] at a fixed verbosity. See [`Error::display`].
pub struct Render<'a, C: Cause> {
    err: &'a Error<C>,
    verbosity: Verbosity,
}

impl<C: Cause> fmt::Display for Render<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.err.write_to(f, self.verbosity)
    }
}

impl<C: Cause> fmt::Display for Error<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verbosity = if f.alternate() {
            Verbosity::Detailed
        } else {
            Verbosity::Minimal
        };
        self.write_to(f, verbosity)
    }
}

impl<C: Cause> fmt::Debug for Error<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verbosity = if f.alternate() {
            Verbosity::Full
        } else {
            Verbosity::Standard
        };
        self.write_to(f, verbosity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{convert, propagate, wrap, Context};

    #[derive(Debug, thiserror::Error)]
    #[error("connection refused")]
    struct Refused;

    #[derive(Debug, thiserror::Error)]
    #[error("dial tcp 10.0.0.7:5432")]
    struct Dial {
        #[source]
        source: Refused,
    }

    fn ctx() -> Context {
        Context::background()
    }

    fn new(msg: &'static str) -> Error {
        Error::new(&ctx(), msg)
    }

    #[test]
    fn test_none_renders_empty() {
        let none: Error = Error::none();
        for v in [
            Verbosity::Minimal,
            Verbosity::Standard,
            Verbosity::Detailed,
            Verbosity::Full,
        ] {
            assert_eq!(none.render(v), "");
        }
        assert_eq!(format!("{:#?}", none), "");
    }

    #[test]
    fn test_minimal() {
        let err = propagate(&ctx(), "load", new("file missing"));
        assert_eq!(err.render(Verbosity::Minimal), "file missing");
        assert_eq!(err.to_string(), "file missing");
    }

    #[test]
    fn test_standard_uses_first_label() {
        let plain = new("file missing");
        assert_eq!(format!("{:?}", plain), "file missing");

        let err = plain.propagate(&ctx(), "read").propagate(&ctx(), "load");
        assert_eq!(format!("{:?}", err), "[read] file missing");
    }

    #[test]
    fn test_detailed() {
        let low = new("connection reset").propagate(&ctx(), "db::query");
        let public = new("user lookup failed");
        let err = convert(&ctx(), "users::get", low, public).propagate(&ctx(), "handler");

        assert_eq!(
            format!("{:#}", err),
            "[users::get,handler] user lookup failed -> connection reset"
        );
        assert_eq!(err.render(Verbosity::Detailed), format!("{:#}", err));
    }

    #[test]
    fn test_detailed_without_provenance() {
        let err = new("quiet");
        assert_eq!(err.render(Verbosity::Detailed), "quiet");
    }

    #[test]
    fn test_full_contains_every_link() {
        let c1 = new("c1 original");
        let c2 = new("c2 middle");
        let c3 = new("c3 public");
        let chain = wrap(&ctx(), wrap(&ctx(), c1.clone(), c2.clone()), c3.clone())
            .propagate(&ctx(), "outer");

        let full = format!("{:#?}", chain);
        assert!(full.starts_with(&chain.render(Verbosity::Detailed)));
        for link in [&c1, &c2, &c3, &chain] {
            assert!(full.contains(&link.render(Verbosity::Minimal)));
        }
        assert!(full.contains("==== [outer] c3 public ===="));
        assert!(full.contains("\n\n==== c1 original ===="));
        // outermost first
        let c3_at = full.find("==== c3 public").unwrap();
        let c1_at = full.find("==== c1 original").unwrap();
        assert!(c3_at < c1_at);
    }

    #[test]
    fn test_full_bare_wrap_prints_once() {
        let low = new("socket closed");
        let public = new("sync failed");
        let err = wrap(&ctx(), low, public);

        let full = err.render(Verbosity::Full);
        assert_eq!(full.matches("==== sync failed ====").count(), 1);
        assert!(!full.contains("(wrap)"));
        assert!(full.contains("==== socket closed ===="));
        assert_eq!(history(&err).len(), 2);
    }

    #[cfg(not(feature = "release"))]
    #[test]
    fn test_full_traced_wrap_is_marked() {
        let ctx = Context::background().with_stack_trace();
        let err = wrap(&ctx, new("socket closed"), new("sync failed"));

        let full = err.render(Verbosity::Full);
        assert!(full.contains("==== (wrap) sync failed ===="));
        assert_eq!(full.matches("==== sync failed ====").count(), 1);
    }

    #[test]
    fn test_full_hops_most_recent_first() {
        let err = new("timeout")
            .propagate(&ctx(), "fetch")
            .propagate(&ctx(), "sync");
        let full = err.render(Verbosity::Full);
        let sync_at = full.find("==== [sync]").unwrap();
        let fetch_at = full.find("==== [fetch]").unwrap();
        assert!(sync_at < fetch_at);
        assert!(full.ends_with("==== timeout ===="));
    }

    #[test]
    fn test_full_foreign_marker() {
        let err: Error = Error::foreign(&ctx(), Dial { source: Refused });
        let full = err.render(Verbosity::Full);
        assert!(full.contains("==== dial tcp 10.0.0.7:5432 ===="));
        assert!(full.contains("(no stack trace available)"));
        assert!(full.contains("caused by: connection refused"));
    }

    #[test]
    fn test_no_stack_without_diagnostics() {
        let err = new("quiet").propagate(&ctx(), "layer");
        let full = err.render(Verbosity::Full);
        assert!(!full.contains("\nat "));
        assert!(!full.contains("no stack trace"));
    }

    #[cfg(not(feature = "release"))]
    #[test]
    fn test_full_with_diagnostics() {
        let ctx = Context::background().with_stack_trace();
        let err: Error = Error::new(&ctx, "loud").propagate(&ctx, "layer");
        let full = err.render(Verbosity::Full);
        assert!(full.contains(&format!("\nat {}:", file!())));
        assert_eq!(full.matches("\nat ").count(), 2);
    }

    #[test]
    fn test_display_adapter() {
        let err = new("x").propagate(&ctx(), "y");
        assert_eq!(err.display(Verbosity::Minimal).to_string(), "x");
        assert_eq!(err.display(Verbosity::Full).to_string(), format!("{:#?}", err));
    }
}
