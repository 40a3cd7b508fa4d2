#![allow(dead_code)]
use std::path::PathBuf;

use std::sync::Once;

static LOGGER_INIT: Once = Once::new();

// Tests run concurrently, so the global logger may only be installed once.
#[cfg(test)]
pub fn ensure_env_logger_initialized() {
    use std::io::Write;

    LOGGER_INIT.call_once(|| {
        let mut builder = env_logger::Builder::from_default_env();
        builder
            .format(|buf, record| writeln!(buf, "[{}] - {}", record.level(), record.args()))
            .is_test(true)
            .init();
    });
}

pub fn samples_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("samples")
        .canonicalize()
        .unwrap()
}

pub fn publication_sample() -> PathBuf {
    samples_dir().join("publication.json")
}

pub fn opds2_feed_sample() -> PathBuf {
    samples_dir().join("opds2_feed.json")
}

pub fn opds1_feed_sample() -> PathBuf {
    samples_dir().join("opds1_feed.xml")
}

pub fn smil_sample() -> PathBuf {
    samples_dir().join("chapter.smil")
}

pub fn read_sample(path: PathBuf) -> String {
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e))
}
