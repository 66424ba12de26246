use log::{
    Level,
    LevelFilter,
    Log,
    Metadata,
    Record,
};

struct StderrLogger;

fn tag(level: Level) -> &'static str {
    match level {
        Level::Trace => "TRCE",
        Level::Debug => "DBUG",
        Level::Info => "INFO",
        Level::Warn => "WARN",
        Level::Error => "ERRO",
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", tag(record.level()), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

pub fn init(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
