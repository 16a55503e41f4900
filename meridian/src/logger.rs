//! Logging bridge between the `log` facade and the host application.
//!
//! The core never writes to stdout or files itself. The host installs a
//! [`Logger`] implementation once at startup via [`set_logger`]; from then on
//! every `log` record produced inside this crate is forwarded across the FFI
//! boundary. The context macros below prefix records with the module that
//! produced them, e.g. `[Meridian][SettingsMigrator]`.

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

thread_local! {
    static THREAD_LOG_CONTEXT: RefCell<Option<String>> = const { RefCell::new(None) };
}

tokio::task_local! {
    /// Task-local logging context, set by [`LogContext`] inside async code.
    pub static LOG_CONTEXT: RefCell<Option<String>>;
}

/// Trait representing a logger that can receive log messages at various
/// levels. Implemented by the host application.
///
/// # Examples
///
/// ```rust
/// use meridian::logger::{LogLevel, Logger};
///
/// struct PrintLogger;
///
/// impl Logger for PrintLogger {
///     fn log(&self, level: LogLevel, message: String) {
///         println!("[{:?}] {}", level, message);
///     }
/// }
/// ```
#[uniffi::export(with_foreign)]
pub trait Logger: Sync + Send {
    /// Logs a message at the specified log level.
    fn log(&self, level: LogLevel, message: String);
}

/// Enumeration of possible log levels.
#[derive(Debug, Clone, uniffi::Enum)]
pub enum LogLevel {
    /// Very low priority, extremely detailed messages.
    Trace,
    /// Lower priority debugging information.
    Debug,
    /// Informational messages highlighting application progress.
    Info,
    /// Potentially harmful situations.
    Warn,
    /// Error events that may still allow the application to continue.
    Error,
}

const fn level_for(level: log::Level) -> LogLevel {
    match level {
        log::Level::Error => LogLevel::Error,
        log::Level::Warn => LogLevel::Warn,
        log::Level::Info => LogLevel::Info,
        log::Level::Debug => LogLevel::Debug,
        log::Level::Trace => LogLevel::Trace,
    }
}

/// Forwards records from the `log` facade to the host-provided [`Logger`].
struct ForeignLogger;

impl log::Log for ForeignLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        // Debug/trace records from dependencies are dropped; only this
        // crate's modules log at those levels across the FFI boundary.
        let is_own_record = record
            .module_path()
            .is_some_and(|module_path| module_path.starts_with("meridian"));
        let is_debug_or_trace =
            record.level() == log::Level::Debug || record.level() == log::Level::Trace;
        if is_debug_or_trace && !is_own_record {
            return;
        }

        if let Some(logger) = LOGGER_INSTANCE.get() {
            logger.log(level_for(record.level()), format!("{}", record.args()));
        } else {
            eprintln!("Logger not set: {}", record.args());
        }
    }

    fn flush(&self) {}
}

/// The host-provided logger, installed once by [`set_logger`].
static LOGGER_INSTANCE: OnceLock<Arc<dyn Logger>> = OnceLock::new();

/// Installs the host logger and wires it into the `log` facade.
///
/// Call this exactly once, before any other call into the core. Later calls
/// are ignored; the first logger stays installed.
///
/// # Panics
///
/// Panics if another component already registered a logger with the `log`
/// facade.
#[uniffi::export]
pub fn set_logger(logger: Arc<dyn Logger>) {
    if LOGGER_INSTANCE.set(logger).is_err() {
        println!("Logger already set");
        return;
    }

    init_logger().expect("Failed to set logger");
}

fn init_logger() -> Result<(), log::SetLoggerError> {
    static LOGGER: ForeignLogger = ForeignLogger;
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Logs a trace-level message with automatic context prefixing.
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        if let Some(ctx) = $crate::logger::get_context() {
            log::trace!("{} {}", ctx, format_args!($($arg)*))
        } else {
            log::trace!($($arg)*)
        }
    };
}

/// Logs a debug-level message with automatic context prefixing.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        if let Some(ctx) = $crate::logger::get_context() {
            log::debug!("{} {}", ctx, format_args!($($arg)*))
        } else {
            log::debug!($($arg)*)
        }
    };
}

/// Logs an info-level message with automatic context prefixing.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        if let Some(ctx) = $crate::logger::get_context() {
            log::info!("{} {}", ctx, format_args!($($arg)*))
        } else {
            log::info!($($arg)*)
        }
    };
}

/// Logs a warning-level message with automatic context prefixing.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        if let Some(ctx) = $crate::logger::get_context() {
            log::warn!("{} {}", ctx, format_args!($($arg)*))
        } else {
            log::warn!($($arg)*)
        }
    };
}

/// Logs an error-level message with automatic context prefixing.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        if let Some(ctx) = $crate::logger::get_context() {
            log::error!("{} {}", ctx, format_args!($($arg)*))
        } else {
            log::error!($($arg)*)
        }
    };
}

/// Tracks which backing storage a [`LogContext`] used, so `Drop` restores
/// the correct one.
enum LogContextStorage {
    TaskLocal,
    ThreadLocal,
}

/// A scope guard that sets a logging context and clears it when dropped.
///
/// # Examples
///
/// ```rust
/// use meridian::logger::LogContext;
///
/// {
///     let _log_ctx = LogContext::new("MediaCatalog");
///     log::info!("prefixed with [Meridian][MediaCatalog]");
/// } // context cleared here
/// ```
pub struct LogContext {
    previous: Option<String>,
    storage: LogContextStorage,
}

impl LogContext {
    /// Creates a new logging context scope, active until the value is
    /// dropped.
    #[must_use]
    pub fn new(module: &str) -> Self {
        let new_context = Some(format!("[Meridian][{module}]"));

        // Prefer the task-local slot (survives .await points); fall back to
        // the thread-local one for sync code.
        match LOG_CONTEXT.try_with(|ctx| {
            let mut ctx = ctx.borrow_mut();
            let prev = ctx.clone();
            *ctx = new_context.clone();
            prev
        }) {
            Ok(previous) => Self {
                previous,
                storage: LogContextStorage::TaskLocal,
            },
            Err(_) => {
                let previous = THREAD_LOG_CONTEXT.with(|ctx| {
                    let mut ctx = ctx.borrow_mut();
                    let prev = ctx.clone();
                    *ctx = new_context;
                    prev
                });
                Self {
                    previous,
                    storage: LogContextStorage::ThreadLocal,
                }
            }
        }
    }
}

impl Drop for LogContext {
    fn drop(&mut self) {
        match self.storage {
            LogContextStorage::TaskLocal => {
                let _ = LOG_CONTEXT.try_with(|ctx| {
                    (*ctx.borrow_mut()).clone_from(&self.previous);
                });
            }
            LogContextStorage::ThreadLocal => {
                THREAD_LOG_CONTEXT.with(|ctx| {
                    (*ctx.borrow_mut()).clone_from(&self.previous);
                });
            }
        }
    }
}

/// Gets the current logging context, if any.
#[must_use]
pub fn get_context() -> Option<String> {
    LOG_CONTEXT
        .try_with(|ctx| ctx.borrow().clone())
        .unwrap_or_else(|_| THREAD_LOG_CONTEXT.with(|ctx| ctx.borrow().clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullLogger;

    impl Logger for NullLogger {
        fn log(&self, _level: LogLevel, _message: String) {}
    }

    #[test]
    fn test_repeated_set_logger_keeps_first_and_does_not_panic() {
        set_logger(Arc::new(NullLogger));
        set_logger(Arc::new(NullLogger));
        assert!(LOGGER_INSTANCE.get().is_some());
    }

    #[test]
    fn test_context_set_and_restored_on_drop() {
        assert_eq!(get_context(), None);
        {
            let _ctx = LogContext::new("Outer");
            assert_eq!(get_context(), Some("[Meridian][Outer]".to_string()));
            {
                let _inner = LogContext::new("Inner");
                assert_eq!(get_context(), Some("[Meridian][Inner]".to_string()));
            }
            assert_eq!(get_context(), Some("[Meridian][Outer]".to_string()));
        }
        assert_eq!(get_context(), None);
    }
}
