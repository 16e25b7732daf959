//! Mock helper launcher with in-memory pipes.

use std::collections::VecDeque;
use std::io;
use std::io::Read;
use std::io::Write;
use std::os::fd::RawFd;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicI32;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use crate::usecases::ports::HelperChild;
use crate::usecases::ports::HelperLauncher;
use crate::usecases::ports::HelperPipes;
use crate::usecases::ports::HelperReader;
use crate::usecases::ports::LaunchError;
use crate::usecases::ports::ReapStatus;

/// Captures everything written to the helper's stdin.
#[derive(Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
    failure: Arc<Mutex<Option<i32>>>,
    closed: Arc<AtomicBool>,
}

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock().unwrap()).into_owned()
    }

    pub fn clear(&self) {
        self.bytes.lock().unwrap().clear();
    }

    /// Makes every following write fail with the raw OS error `errno`.
    pub fn fail_writes_with(&self, errno: i32) {
        *self.failure.lock().unwrap() = Some(errno);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn writer(&self) -> MockWriter {
        MockWriter {
            buffer: self.clone(),
        }
    }
}

struct MockWriter {
    buffer: SharedBuffer,
}

impl Write for MockWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if let Some(errno) = *self.buffer.failure.lock().unwrap() {
            return Err(io::Error::from_raw_os_error(errno));
        }
        self.buffer.bytes.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for MockWriter {
    fn drop(&mut self) {
        self.buffer.closed.store(true, Ordering::SeqCst);
    }
}

enum ReadStep {
    Data(Vec<u8>),
    Eof,
    Error(i32),
}

/// Bytes the fake helper "prints". An empty script reads as `WouldBlock`.
#[derive(Clone, Default)]
pub struct ReadScript {
    steps: Arc<Mutex<VecDeque<ReadStep>>>,
    closed: Arc<AtomicBool>,
}

impl ReadScript {
    pub fn push_str(&self, data: &str) {
        self.push_bytes(data.as_bytes());
    }

    pub fn push_bytes(&self, data: &[u8]) {
        self.steps
            .lock()
            .unwrap()
            .push_back(ReadStep::Data(data.to_vec()));
    }

    pub fn push_eof(&self) {
        self.steps.lock().unwrap().push_back(ReadStep::Eof);
    }

    pub fn push_error(&self, errno: i32) {
        self.steps.lock().unwrap().push_back(ReadStep::Error(errno));
    }

    pub fn pending(&self) -> usize {
        self.steps.lock().unwrap().len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

struct MockReader {
    script: ReadScript,
    fd: Option<RawFd>,
    nonblocking_error: Option<i32>,
    nonblocking: Arc<AtomicBool>,
}

impl Read for MockReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut steps = self.script.steps.lock().unwrap();
        match steps.pop_front() {
            None => Err(io::Error::from(io::ErrorKind::WouldBlock)),
            Some(ReadStep::Eof) => {
                steps.push_front(ReadStep::Eof);
                Ok(0)
            }
            Some(ReadStep::Error(errno)) => Err(io::Error::from_raw_os_error(errno)),
            Some(ReadStep::Data(mut data)) => {
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                if n < data.len() {
                    steps.push_front(ReadStep::Data(data.split_off(n)));
                }
                Ok(n)
            }
        }
    }
}

impl HelperReader for MockReader {
    fn raw_fd(&self) -> Option<RawFd> {
        self.fd
    }

    fn set_nonblocking(&self) -> io::Result<()> {
        if let Some(errno) = self.nonblocking_error {
            return Err(io::Error::from_raw_os_error(errno));
        }
        self.nonblocking.store(true, Ordering::SeqCst);
        Ok(())
    }
}

impl Drop for MockReader {
    fn drop(&mut self) {
        self.script.closed.store(true, Ordering::SeqCst);
    }
}

pub struct MockChild {
    pid: u32,
    status: Arc<Mutex<ReapStatus>>,
    reaps: Arc<AtomicUsize>,
}

impl HelperChild for MockChild {
    fn pid(&self) -> Option<u32> {
        Some(self.pid)
    }

    fn try_reap(&mut self) -> io::Result<ReapStatus> {
        self.reaps.fetch_add(1, Ordering::SeqCst);
        Ok(*self.status.lock().unwrap())
    }
}

/// Test-side view of one launched fake helper.
#[derive(Clone)]
pub struct MockSessionIo {
    pub command: PathBuf,
    pub pid: u32,
    pub fd: Option<RawFd>,
    /// Frames written by the candidate window.
    pub stdin: SharedBuffer,
    /// Output the fake helper produces.
    pub stdout: ReadScript,
    nonblocking: Arc<AtomicBool>,
    status: Arc<Mutex<ReapStatus>>,
    reaps: Arc<AtomicUsize>,
}

impl MockSessionIo {
    pub fn is_nonblocking(&self) -> bool {
        self.nonblocking.load(Ordering::SeqCst)
    }

    pub fn exit(&self, code: i32) {
        *self.status.lock().unwrap() = ReapStatus::Exited(Some(code));
    }

    pub fn reap_count(&self) -> usize {
        self.reaps.load(Ordering::SeqCst)
    }
}

pub struct MockLauncher {
    fail_spawn: AtomicBool,
    with_fd: bool,
    nonblocking_error: Option<i32>,
    next_fd: AtomicI32,
    next_pid: AtomicU32,
    attempts: AtomicUsize,
    sessions: Mutex<Vec<MockSessionIo>>,
}

impl Default for MockLauncher {
    fn default() -> Self {
        Self {
            fail_spawn: AtomicBool::new(false),
            with_fd: true,
            nonblocking_error: None,
            next_fd: AtomicI32::new(100),
            next_pid: AtomicU32::new(4000),
            attempts: AtomicUsize::new(0),
            sessions: Mutex::new(Vec::new()),
        }
    }
}

impl MockLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let launcher = Self::default();
        launcher.set_fail_spawn(true);
        launcher
    }

    pub fn without_fd(mut self) -> Self {
        self.with_fd = false;
        self
    }

    pub fn with_nonblocking_error(mut self, errno: i32) -> Self {
        self.nonblocking_error = Some(errno);
        self
    }

    pub fn set_fail_spawn(&self, fail: bool) {
        self.fail_spawn.store(fail, Ordering::SeqCst);
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn launch_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn session(&self, nth: usize) -> MockSessionIo {
        self.sessions.lock().unwrap()[nth].clone()
    }

    pub fn last_session(&self) -> MockSessionIo {
        self.sessions
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no helper launched")
    }
}

impl HelperLauncher for MockLauncher {
    fn launch(&self, command: &Path) -> Result<HelperPipes, LaunchError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_spawn.load(Ordering::SeqCst) {
            return Err(LaunchError::Spawn {
                command: command.to_path_buf(),
                source: io::Error::from(io::ErrorKind::NotFound),
            });
        }

        let fd = self
            .with_fd
            .then(|| self.next_fd.fetch_add(1, Ordering::SeqCst));
        let io = MockSessionIo {
            command: command.to_path_buf(),
            pid: self.next_pid.fetch_add(1, Ordering::SeqCst),
            fd,
            stdin: SharedBuffer::default(),
            stdout: ReadScript::default(),
            nonblocking: Arc::new(AtomicBool::new(false)),
            status: Arc::new(Mutex::new(ReapStatus::Running)),
            reaps: Arc::new(AtomicUsize::new(0)),
        };

        let pipes = HelperPipes {
            child: Box::new(MockChild {
                pid: io.pid,
                status: Arc::clone(&io.status),
                reaps: Arc::clone(&io.reaps),
            }),
            reader: Box::new(MockReader {
                script: io.stdout.clone(),
                fd,
                nonblocking_error: self.nonblocking_error,
                nonblocking: Arc::clone(&io.nonblocking),
            }),
            writer: Box::new(io.stdin.writer()),
        };

        self.sessions.lock().unwrap().push(io);
        Ok(pipes)
    }
}
