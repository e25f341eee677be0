use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;

use rars_engine::{AssemblyError, Engine, ErrorList, Program, SimConfig, SimulationError, TerminationReason};
use tempfile::TempDir;

/// Writer whose contents stay readable after it is boxed away.
#[derive(Clone, Debug, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct TestContext {
    pub dir: TempDir,
    pub program: Program,
    output: SharedBuffer,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    pub fn with_config(config: SimConfig) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let output = SharedBuffer::default();
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
            program: Program::with_output(config, Box::new(output.clone())),
            output,
        }
    }

    /// Writes a source file into the context's directory.
    pub fn source(&self, name: &str, text: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, text).expect("write source");
        path
    }

    /// Assembles `text` as the single file `main.s`.
    pub fn assemble(&mut self, text: &str) -> Result<ErrorList, AssemblyError> {
        let main = self.source("main.s", text);
        self.program.assemble(std::slice::from_ref(&main), &main)
    }

    /// Assembles, sets up and runs `text` once.
    pub fn run(&mut self, text: &str) -> Result<TerminationReason, SimulationError> {
        let _ = self.assemble(text).expect("assembly should succeed");
        self.program.setup(None, None)?;
        self.program.simulate()
    }

    /// Output written by the program so far.
    pub fn output(&self) -> String {
        self.output.contents()
    }

    /// Register value by name.
    pub fn reg(&self, name: &str) -> i64 {
        self.program.register_value(name).expect("known register")
    }
}
