//! Shared test helpers for workspace crates.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve a fixture path under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}

/// Read a fixture as UTF-8 text, panicking with the fixture name on failure.
pub fn read_fixture(name: &str) -> String {
	let path = fixture_path(name);
	std::fs::read_to_string(&path).unwrap_or_else(|err| panic!("fixture {} unreadable: {err}", path.display()))
}

/// Parse a JSON fixture with `serde_json`.
pub fn load_fixture_json(name: &str) -> serde_json::Value {
	serde_json::from_str(&read_fixture(name)).unwrap_or_else(|err| panic!("fixture {name} is not JSON: {err}"))
}

/// In-memory log sink shared between a subscriber and the test reading it.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.0.lock().unwrap_or_else(PoisonError::into_inner).extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

impl<'a> MakeWriter<'a> for Captured {
	type Writer = Captured;

	fn make_writer(&'a self) -> Self::Writer {
		self.clone()
	}
}

/// Run `f` with a thread-local `debug` subscriber and return its result with the formatted log text.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
	let sink = Captured::default();
	let subscriber = tracing_subscriber::fmt()
		.with_writer(sink.clone())
		.with_max_level(Level::DEBUG)
		.with_ansi(false)
		.finish();
	let result = tracing::subscriber::with_default(subscriber, f);
	let bytes = sink.0.lock().unwrap_or_else(PoisonError::into_inner).clone();
	(result, String::from_utf8_lossy(&bytes).into_owned())
}
