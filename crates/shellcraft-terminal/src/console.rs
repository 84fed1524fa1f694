//! Line-oriented terminal abstraction.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// ANSI sequence: erase display and scrollback, move the cursor home.
const CLEAR_SEQUENCE: &str = "\x1b[2J\x1b[3J\x1b[H";

/// How often a waiting read checks the interrupt flag.
const INTERRUPT_POLL: Duration = Duration::from_millis(50);

/// One message from the input reader thread.
type LineResult = io::Result<Option<String>>;

/// The raw text display and line input the shell talks to.
///
/// An interrupted read or write reports `io::ErrorKind::Interrupted`; the
/// dispatch loop treats that as "abandon this step".
pub trait Console {
    /// Write `text` as is (no newline added) and flush.
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Block for one line of input, without its line terminator.
    /// Returns `Ok(None)` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>>;

    /// Clear the visible display.
    fn clear(&mut self) -> io::Result<()>;
}

/// Console over the process's stdin/stdout.
///
/// With an interrupt flag attached (set from a Ctrl-C handler), stdin is
/// read on a background thread so a pending read can be abandoned: the
/// read fails with `Interrupted` as soon as the flag is raised, and the
/// next line typed is kept for the following read. A write after the flag
/// is raised fails the same way. Either lowers the flag again.
#[derive(Debug, Default)]
pub struct Terminal {
    interrupt: Option<Arc<AtomicBool>>,
    lines: Option<Receiver<LineResult>>,
}

impl Terminal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interrupt(flag: Arc<AtomicBool>) -> Self {
        Self {
            interrupt: Some(flag),
            lines: Some(spawn_reader(|| io::stdin().lock())),
        }
    }

    fn check_interrupt(&self) -> io::Result<()> {
        match &self.interrupt {
            Some(flag) if flag.swap(false, Ordering::SeqCst) => {
                Err(io::Error::from(io::ErrorKind::Interrupted))
            },
            _ => Ok(()),
        }
    }

    /// Wait for the reader thread, giving up when the interrupt flag rises.
    fn wait_for_line(&self, lines: &Receiver<LineResult>) -> LineResult {
        loop {
            match lines.recv_timeout(INTERRUPT_POLL) {
                Ok(line) => return line,
                Err(RecvTimeoutError::Timeout) => {
                    if let Err(e) = self.check_interrupt() {
                        // Put the next prompt on a fresh line after `^C`.
                        let _ = io::stdout().write_all(b"\n");
                        return Err(e);
                    }
                },
                Err(RecvTimeoutError::Disconnected) => return Ok(None),
            }
        }
    }
}

impl Console for Terminal {
    fn write(&mut self, text: &str) -> io::Result<()> {
        self.check_interrupt()?;
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.flush()
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        if let Some(lines) = &self.lines {
            return self.wait_for_line(lines);
        }
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(strip_line_ending(line)))
    }

    fn clear(&mut self) -> io::Result<()> {
        self.write(CLEAR_SEQUENCE)
    }
}

/// Read lines from the input `open` returns on a new thread, sending each
/// one down the returned channel. The thread stops after end of input, a
/// read error, or once the receiver is dropped.
fn spawn_reader<F, R>(open: F) -> Receiver<LineResult>
where
    F: FnOnce() -> R + Send + 'static,
    R: BufRead,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut input = open();
        loop {
            let mut line = String::new();
            let msg = match input.read_line(&mut line) {
                Ok(0) => Ok(None),
                Ok(_) => Ok(Some(strip_line_ending(line))),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => Err(e),
            };
            let last = !matches!(msg, Ok(Some(_)));
            if tx.send(msg).is_err() || last {
                break;
            }
        }
    });
    rx
}

fn strip_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

/// Scripted input for [`MemoryConsole`].
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Line(String),
    Interrupt,
}

#[derive(Debug, Default)]
struct MemoryState {
    input: VecDeque<Input>,
    /// Everything written since the last clear.
    display: String,
    /// Everything ever written.
    written: String,
    clears: usize,
}

/// In-memory console fed from a script of lines.
///
/// Clones share state, so a handle kept by the caller observes what the
/// shell wrote after the console was boxed into it.
#[derive(Debug, Clone, Default)]
pub struct MemoryConsole {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryConsole {
    /// A console that will return `lines` in order, then end of input.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let console = Self::default();
        for line in lines {
            console.push_line(line);
        }
        console
    }

    pub fn push_line(&self, line: impl Into<String>) {
        self.state
            .borrow_mut()
            .input
            .push_back(Input::Line(line.into()));
    }

    /// Queue a simulated Ctrl-C for the next read.
    pub fn push_interrupt(&self) {
        self.state.borrow_mut().input.push_back(Input::Interrupt);
    }

    /// Text currently on the display (since the last clear).
    pub fn display(&self) -> String {
        self.state.borrow().display.clone()
    }

    /// Everything written, including text later cleared.
    pub fn written(&self) -> String {
        self.state.borrow().written.clone()
    }

    pub fn clear_count(&self) -> usize {
        self.state.borrow().clears
    }

    /// Number of scripted inputs not consumed yet.
    pub fn pending(&self) -> usize {
        self.state.borrow().input.len()
    }
}

impl Console for MemoryConsole {
    fn write(&mut self, text: &str) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        state.display.push_str(text);
        state.written.push_str(text);
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        match self.state.borrow_mut().input.pop_front() {
            Some(Input::Line(line)) => Ok(Some(line)),
            Some(Input::Interrupt) => Err(io::Error::from(io::ErrorKind::Interrupted)),
            None => Ok(None),
        }
    }

    fn clear(&mut self) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        state.display.clear();
        state.clears += 1;
        Ok(())
    }
}
