//! Routes `log` records from the library through `cli::output`.

use log::{Level, LevelFilter, Log, Metadata, Record};

use super::output;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = record.args().to_string();
        match record.level() {
            Level::Error => output::error(&msg),
            Level::Warn => output::warning(&msg),
            Level::Info | Level::Debug | Level::Trace => output::debug(&msg),
        }
    }

    fn flush(&self) {}
}

/// Install the console logger.  Warnings are always shown; `verbose`
/// adds debug records.
pub fn init(verbose: bool) {
    // A logger installed earlier stays in place.
    log::set_logger(&LOGGER).ok();
    log::set_max_level(level_for(verbose));
}

fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_enables_debug() {
        assert_eq!(level_for(true), LevelFilter::Debug);
        assert_eq!(level_for(false), LevelFilter::Warn);
    }

    #[test]
    fn init_twice_keeps_working() {
        init(false);
        init(true);
        assert_eq!(log::max_level(), LevelFilter::Debug);
    }
}
