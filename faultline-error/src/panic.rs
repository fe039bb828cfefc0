//! Panic boundary: turn an unwinding panic into an `Error`
//!
//! Use at request or task boundaries only. Panics signal bugs, so recovered
//! errors always carry a stack, whatever the context or build mode.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe, Location};
use std::sync::Once;

use crate::cause::Cause;
use crate::error::Error;
use crate::stack::Stack;
use crate::Context;

thread_local! {
    /// Number of `catch` scopes active on this thread.
    static DEPTH: Cell<usize> = const { Cell::new(0) };
    /// Stack recorded by the hook for the panic currently unwinding.
    static PENDING: RefCell<Option<Stack>> = const { RefCell::new(None) };
}

static HOOK: Once = Once::new();

/// Install the process panic hook once, chaining whatever hook was there.
///
/// Inside a `catch` scope the hook records the stack at the panic site and
/// stays quiet; the panic is about to become an ordinary error. Everywhere
/// else the previous hook runs unchanged.
fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if DEPTH.with(Cell::get) > 0 {
                let stack = Stack::capture();
                PENDING.with(|pending| *pending.borrow_mut() = Some(stack));
                return;
            }
            previous(info);
        }));
    });
}

/// One active `catch` on this thread.
///
/// A stack left in `PENDING` belongs to a panic the closure handled itself;
/// it is dropped on entry and when the outermost scope exits.
struct Scope;

impl Scope {
    fn enter() -> Self {
        take_pending();
        DEPTH.with(|depth| depth.set(depth.get() + 1));
        Scope
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        let depth = DEPTH.with(|depth| {
            depth.set(depth.get().saturating_sub(1));
            depth.get()
        });
        if depth == 0 {
            take_pending();
        }
    }
}

fn take_pending() -> Option<Stack> {
    PENDING.with(|pending| pending.borrow_mut().take())
}

/// Run `f`, converting a panic into an error.
///
/// The error carries the `PANIC` label, the message
/// `recovered panic: <payload>` and the stack at the panic site. Its
/// location is the `catch` call site.
///
/// `f` is treated as unwind safe: state it touched may be left half-updated
/// when an error is returned.
///
/// ```rust
/// use faultline_error::{catch, Context, Error, PANIC};
///
/// let ctx = Context::background();
/// let res: Result<(), Error> = catch(&ctx, || panic!("index out of range"));
/// let err = res.unwrap_err();
/// assert_eq!(err.message(), "recovered panic: index out of range");
/// assert_eq!(err.labels(), vec![PANIC]);
/// ```
#[track_caller]
pub fn catch<C, R, F>(ctx: &Context, f: F) -> Result<R, Error<C>>
where
    C: Cause,
    F: FnOnce() -> R,
{
    install_hook();
    // recover runs inside the scope so the pending stack is still there
    let _scope = Scope::enter();
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Ok(value),
        Err(payload) => Err(recover(ctx, payload)),
    }
}

/// Convert an already caught panic payload into an error.
///
/// For payloads from `std::thread::JoinHandle::join` or a hand-written
/// `catch_unwind`. The stack is the one recorded at the panic site when the
/// panic unwound through [`catch`] on this thread, otherwise the current one.
#[track_caller]
pub fn recover<C: Cause>(_ctx: &Context, payload: Box<dyn Any + Send>) -> Error<C> {
    let stack = take_pending().unwrap_or_else(Stack::capture);
    Error::recovered(
        format!("recovered panic: {}", payload_text(payload.as_ref())),
        Some(Location::caller()),
        stack,
    )
}

fn payload_text(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&'static str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else if let Some(err) = payload.downcast_ref::<anyhow::Error>() {
        err.to_string()
    } else {
        "non-string panic payload".to_string()
    }
}
