//! Console + rotating JSON file logging driven by the `logging` config section.
//!
//! Each key of the section names a subsystem (a tracing target prefix such as
//! `products` or `tower_http`); `default` covers every other target.

use std::{
    collections::HashMap,
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};

use file_rotate::{compression::Compression, suffix::AppendCount, ContentLimit, FileRotate};
use parking_lot::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use crate::config::{LoggingConfig, Section};

const DEFAULT_SECTION: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_BACKUPS: usize = 3;

/// "off"/"none" disable output; anything unrecognised falls back to INFO.
fn parse_level(s: &str) -> LevelFilter {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" | "warning" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" | "none" => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}

/// Level for the file sink of a section; empty means "same as console".
fn file_level(section: &Section) -> LevelFilter {
    if section.file_level.trim().is_empty() {
        parse_level(&section.console_level)
    } else {
        parse_level(&section.file_level)
    }
}

fn target_matches(target: &str, prefix: &str) -> bool {
    target == prefix
        || target
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with("::"))
}

fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

// -------- rotating file sinks --------

type SharedRotate = Arc<Mutex<FileRotate<AppendCount>>>;

fn open_rotating(path: &Path, section: &Section) -> std::io::Result<SharedRotate> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
    let rot = FileRotate::new(
        path,
        AppendCount::new(section.max_backups.unwrap_or(DEFAULT_MAX_BACKUPS)),
        ContentLimit::BytesSurpassed(max_bytes as usize),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Ok(Arc::new(Mutex::new(rot)))
}

/// Writer for one record; `None` swallows the bytes.
struct SinkHandle(Option<SharedRotate>);

impl Write for SinkHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &self.0 {
            Some(f) => f.lock().write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &self.0 {
            Some(f) => f.lock().flush(),
            None => Ok(()),
        }
    }
}

/// Picks the file of the longest matching subsystem, else the default file.
#[derive(Clone, Default)]
struct FileRouter {
    fallback: Option<SharedRotate>,
    // sorted longest prefix first
    routes: Vec<(String, SharedRotate)>,
}

impl FileRouter {
    fn build(cfg: &LoggingConfig, base_dir: &Path) -> Self {
        let mut router = FileRouter::default();
        for (name, section) in cfg {
            if section.file.trim().is_empty() {
                continue;
            }
            let path = resolve_log_path(&section.file, base_dir);
            let sink = match open_rotating(&path, section) {
                Ok(sink) => sink,
                Err(e) => {
                    eprintln!(
                        "cannot open log file '{}' for '{}': {}",
                        path.display(),
                        name,
                        e
                    );
                    continue;
                }
            };
            if name == DEFAULT_SECTION {
                router.fallback = Some(sink);
            } else {
                router.routes.push((name.clone(), sink));
            }
        }
        router.routes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        router
    }

    fn route(&self, target: &str) -> Option<SharedRotate> {
        self.routes
            .iter()
            .find(|(prefix, _)| target_matches(target, prefix))
            .map(|(_, sink)| sink.clone())
            .or_else(|| self.fallback.clone())
    }

    fn is_empty(&self) -> bool {
        self.fallback.is_none() && self.routes.is_empty()
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = SinkHandle;

    fn make_writer(&'a self) -> Self::Writer {
        SinkHandle(self.fallback.clone())
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        SinkHandle(self.route(meta.target()))
    }
}

// -------- filters --------

fn console_targets(cfg: &LoggingConfig) -> Targets {
    let default = cfg
        .get(DEFAULT_SECTION)
        .map(|s| parse_level(&s.console_level))
        .unwrap_or(LevelFilter::INFO);
    cfg.iter()
        .filter(|(name, _)| name.as_str() != DEFAULT_SECTION)
        .fold(Targets::new().with_default(default), |t, (name, s)| {
            t.with_target(name.clone(), parse_level(&s.console_level))
        })
}

/// A subsystem without its own file still writes to the default file at its
/// own file level.
fn file_targets(cfg: &LoggingConfig) -> Targets {
    let default = cfg
        .get(DEFAULT_SECTION)
        .filter(|s| !s.file.trim().is_empty())
        .map(file_level)
        .unwrap_or(LevelFilter::OFF);
    cfg.iter()
        .filter(|(name, _)| name.as_str() != DEFAULT_SECTION)
        .fold(Targets::new().with_default(default), |t, (name, s)| {
            t.with_target(name.clone(), file_level(s))
        })
}

// -------- public init --------

/// Install the global subscriber. Relative log file paths resolve against
/// `base_dir` (normally `server.home_dir`). Calling it twice is harmless.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` records from dependencies before the subscriber goes in.
    let _ = tracing_log::LogTracer::init();

    let ansi = atty::is(atty::Stream::Stdout);
    let console = fmt::layer()
        .with_ansi(ansi)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(console_targets(cfg));

    let router = FileRouter::build(cfg, base_dir);
    let file = (!router.is_empty()).then(|| {
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(router)
            .with_filter(file_targets(cfg))
    });

    let _ = tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_logging_config;
    use tempfile::tempdir;

    fn section(console: &str, file: &str, file_level: &str) -> Section {
        Section {
            console_level: console.into(),
            file: file.into(),
            file_level: file_level.into(),
            max_backups: Some(2),
            max_size_mb: Some(1),
        }
    }

    #[test]
    fn level_parsing() {
        assert_eq!(parse_level("trace"), LevelFilter::TRACE);
        assert_eq!(parse_level("DEBUG"), LevelFilter::DEBUG);
        assert_eq!(parse_level(" Warn "), LevelFilter::WARN);
        assert_eq!(parse_level("off"), LevelFilter::OFF);
        assert_eq!(parse_level("none"), LevelFilter::OFF);
        assert_eq!(parse_level("loud"), LevelFilter::INFO);
    }

    #[test]
    fn empty_file_level_follows_console() {
        assert_eq!(file_level(&section("warn", "x.log", "")), LevelFilter::WARN);
        assert_eq!(file_level(&section("warn", "x.log", "trace")), LevelFilter::TRACE);
    }

    #[test]
    fn prefix_matching_respects_module_boundaries() {
        assert!(target_matches("products", "products"));
        assert!(target_matches("products::domain::service", "products"));
        assert!(!target_matches("products_extra", "products"));
        assert!(!target_matches("users", "products"));
    }

    #[test]
    fn relative_paths_resolve_under_base_dir() {
        let tmp = tempdir().unwrap();
        let resolved = resolve_log_path("logs/catalog.log", tmp.path());
        assert!(resolved.starts_with(tmp.path()));
        assert!(resolved.ends_with("logs/catalog.log"));

        let abs = tmp.path().join("elsewhere.log");
        assert_eq!(resolve_log_path(abs.to_str().unwrap(), Path::new("/ignored")), abs);
    }

    #[test]
    fn router_prefers_subsystem_file_and_creates_parents() {
        let tmp = tempdir().unwrap();
        let mut cfg = default_logging_config();
        cfg.insert("products".into(), section("info", "nested/products.log", "debug"));
        cfg.insert("users".into(), section("info", "", "debug"));

        let router = FileRouter::build(&cfg, tmp.path());
        assert!(tmp.path().join("nested").is_dir());
        assert!(tmp.path().join("logs").is_dir());
        assert_eq!(router.routes.len(), 1);

        let products = router.route("products::api::rest").unwrap();
        let fallback = router.fallback.clone().unwrap();
        assert!(!Arc::ptr_eq(&products, &fallback));
        assert!(Arc::ptr_eq(&router.route("users::domain").unwrap(), &fallback));
    }

    #[test]
    fn router_without_files_is_empty() {
        let tmp = tempdir().unwrap();
        let mut cfg = LoggingConfig::new();
        cfg.insert(DEFAULT_SECTION.into(), section("info", "", ""));
        let router = FileRouter::build(&cfg, tmp.path());
        assert!(router.is_empty());
        assert!(router.route("anything").is_none());
    }

    #[test]
    fn init_is_idempotent() {
        let tmp = tempdir().unwrap();
        let mut cfg = LoggingConfig::new();
        cfg.insert(DEFAULT_SECTION.into(), section("off", "logs/t.log", "debug"));
        init_logging_from_config(&cfg, tmp.path());
        init_logging_from_config(&cfg, tmp.path());
        tracing::info!("logging smoke");
    }
}
