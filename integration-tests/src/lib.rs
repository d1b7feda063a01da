use std::path::{Path, PathBuf};

mod fake_tool;
pub use fake_tool::fake_tool_main;

// Adapted from
// https://github.com/rust-lang/cargo/blob/485670b3983b52289a2f353d589c57fae2f60f82/tests/testsuite/support/mod.rs#L507
// https://github.com/assert-rs/assert_cmd/blob/3ae01c9cf76e8b652c8ed4d2d64ff53149096339/src/cargo.rs#L192
fn target_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .map(|mut path| {
            path.pop();
            if path.ends_with("deps") {
                path.pop();
            }
            path
        })
        .unwrap()
}

fn exe_name(name: &str) -> String {
    format!("{}{}", name, std::env::consts::EXE_SUFFIX)
}

fn cargo_bin(name: &str) -> PathBuf {
    target_dir().join(exe_name(name))
}

/// A scratch directory holding copies of the fake tool under different names
/// together with the files that script them.
pub struct Workdir {
    dir: tempfile::TempDir,
}

impl Workdir {
    const FAKE_TOOL_BINARY: &'static str = "integration-tests";

    pub fn new() -> Self {
        let dir = tempfile::TempDir::new().unwrap();
        Self { dir }
    }

    pub fn with_tool(self, name: &str) -> Self {
        std::fs::copy(
            cargo_bin(Self::FAKE_TOOL_BINARY),
            self.tool(name),
        )
        .unwrap();
        self
    }

    pub fn with_stdout(self, tool: &str, stdout: impl AsRef<[u8]>) -> Self {
        self.with_tool_file(tool, "stdout", stdout)
    }

    pub fn with_exit_status(self, tool: &str, exit_status: i32) -> Self {
        self.with_tool_file(tool, "exit-status", exit_status.to_string())
    }

    /// Makes `tool` fail for any invocation with an argument containing `pattern`.
    pub fn with_failure_on(self, tool: &str, pattern: &str) -> Self {
        self.with_tool_file(tool, "fail-on", pattern)
    }

    /// Makes `tool` append `suffix` to the file named by its last argument.
    pub fn with_append(self, tool: &str, suffix: impl AsRef<[u8]>) -> Self {
        self.with_tool_file(tool, "append", suffix)
    }

    fn with_tool_file(self, tool: &str, extension: &str, contents: impl AsRef<[u8]>) -> Self {
        std::fs::write(self.path().join(format!("{}.{}", tool, extension)), contents).unwrap();
        self
    }

    pub fn with_file(self, name: &str, contents: impl AsRef<[u8]>) -> Self {
        let path = self.path().join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn tool(&self, name: &str) -> PathBuf {
        self.path().join(exe_name(name))
    }

    /// Every recorded invocation of `tool`, in the order they finished writing.
    pub fn invocations(&self, tool: &str) -> Vec<Vec<String>> {
        std::fs::read_to_string(self.path().join(format!("{}.args", tool)))
            .unwrap_or_default()
            .lines()
            .map(|line| line.split('\t').map(|s| s.to_owned()).collect())
            .collect()
    }

    pub fn env(&self, tool: &str) -> Env {
        Env::new(&self.path().join(format!("{}.env", tool))).unwrap()
    }
}

impl Default for Workdir {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Env {
    env: Vec<(String, String)>,
}

impl Env {
    fn new(env_file: &Path) -> std::io::Result<Self> {
        let env = std::fs::read_to_string(env_file)?
            .lines()
            .filter_map(|s| s.split_once('='))
            .map(|(key, value)| (key.to_owned(), value.to_owned()))
            .collect();
        Ok(Env { env })
    }

    pub fn assert_var(&self, key: impl AsRef<str>, value: impl AsRef<str>) -> &Self {
        let key = key.as_ref();
        let value = value.as_ref();
        assert!(self.env.iter().any(|(k, v)| k == key && v == value));
        self
    }
}
