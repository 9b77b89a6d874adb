//! Rank-aware output channel for user-visible status text.
//!
//! Every process owns one channel, chosen once from its rank by
//! [`channel_for`]: the root gets a [`RootSink`] that writes to the console or
//! to a file, every other rank gets a [`NullSink`] that discards. Callers
//! never check the rank themselves.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::role::ProcessRole;
use crate::error::{Error, Result};

/// Where channel output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Console,
    File(PathBuf),
}

pub trait OutputChannel: Send {
    /// Write `text` as-is. A no-op on inactive channels.
    fn write_text(&mut self, text: &str) -> Result<()>;

    fn write_line(&mut self, line: &str) -> Result<()> {
        self.write_text(line)?;
        self.write_text("\n")
    }

    /// Switch the destination to a freshly created file. Allowed once.
    fn redirect_to_file(&mut self, path: &Path) -> Result<()>;

    /// Push anything buffered to the destination.
    fn flush(&mut self) -> Result<()>;

    fn destination(&self) -> &Destination;

    /// Whether writes on this process produce any output.
    fn is_active(&self) -> bool;
}

/// Select the channel implementation for this process.
pub fn channel_for(role: &ProcessRole) -> Box<dyn OutputChannel> {
    if role.is_root() {
        Box::new(RootSink::console())
    } else {
        Box::new(NullSink::default())
    }
}

/// Active channel of the root process.
pub struct RootSink {
    destination: Destination,
    writer: Box<dyn Write + Send>,
}

impl RootSink {
    pub fn console() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    /// Console destination backed by an arbitrary writer.
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            destination: Destination::Console,
            writer,
        }
    }
}

impl OutputChannel for RootSink {
    fn write_text(&mut self, text: &str) -> Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    fn redirect_to_file(&mut self, path: &Path) -> Result<()> {
        if let Destination::File(current) = &self.destination {
            return Err(Error::ChannelAlreadyRedirected {
                path: current.clone(),
            });
        }
        let file = File::create(path).map_err(|source| Error::OpenChannelFile {
            path: path.to_path_buf(),
            source,
        })?;
        self.writer.flush()?;
        self.writer = Box::new(file);
        self.destination = Destination::File(path.to_path_buf());
        debug!(path = %path.display(), "output channel redirected");
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn destination(&self) -> &Destination {
        &self.destination
    }

    fn is_active(&self) -> bool {
        true
    }
}

/// Channel of every non-root process: text is dropped, never buffered.
///
/// A redirect only records the new destination, so that a second redirect
/// fails on every rank alike; no file is opened or created.
#[derive(Debug)]
pub struct NullSink {
    destination: Destination,
}

impl Default for NullSink {
    fn default() -> Self {
        Self {
            destination: Destination::Console,
        }
    }
}

impl OutputChannel for NullSink {
    fn write_text(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }

    fn redirect_to_file(&mut self, path: &Path) -> Result<()> {
        if let Destination::File(current) = &self.destination {
            return Err(Error::ChannelAlreadyRedirected {
                path: current.clone(),
            });
        }
        self.destination = Destination::File(path.to_path_buf());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn destination(&self) -> &Destination {
        &self.destination
    }

    fn is_active(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::SharedBuffer;
    use std::fs;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Writer that counts flushes.
    #[derive(Clone, Default)]
    struct FlushCounter {
        flushes: Arc<AtomicUsize>,
    }

    impl Write for FlushCounter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn flush_reaches_root_writer_and_is_a_no_op_elsewhere() {
        let counter = FlushCounter::default();
        let mut sink = RootSink::with_writer(Box::new(counter.clone()));

        sink.flush().expect("flush");
        assert_eq!(counter.flushes.load(Ordering::SeqCst), 1);

        let mut null = NullSink::default();
        null.flush().expect("flush");
    }

    #[test]
    fn channel_for_selects_by_rank() {
        assert!(channel_for(&ProcessRole::serial()).is_active());
        assert!(!channel_for(&ProcessRole::new(4, 0)).is_active());
        assert_eq!(
            channel_for(&ProcessRole::new(4, 0)).destination(),
            &Destination::Console
        );
    }

    #[test]
    fn root_sink_writes_to_console_writer_until_redirected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let buffer = SharedBuffer::default();
        let mut sink = RootSink::with_writer(Box::new(buffer.clone()));

        sink.write_line("before").expect("write");
        let log = temp.path().join("run.log");
        sink.redirect_to_file(&log).expect("redirect");
        sink.write_text("after").expect("write");
        sink.write_line(" redirect").expect("write");

        assert_eq!(buffer.contents(), "before\n");
        assert_eq!(sink.destination(), &Destination::File(log.clone()));
        assert_eq!(
            fs::read_to_string(&log).expect("read log"),
            "after redirect\n"
        );
    }

    #[test]
    fn redirect_truncates_existing_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let log = temp.path().join("run.log");
        fs::write(&log, "stale contents\n").expect("write stale");

        let mut sink = RootSink::with_writer(Box::new(SharedBuffer::default()));
        sink.redirect_to_file(&log).expect("redirect");
        sink.write_line("fresh").expect("write");

        assert_eq!(fs::read_to_string(&log).expect("read log"), "fresh\n");
    }

    #[test]
    fn second_redirect_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut sink = RootSink::with_writer(Box::new(SharedBuffer::default()));
        sink.redirect_to_file(&temp.path().join("a.log"))
            .expect("first redirect");

        let err = sink
            .redirect_to_file(&temp.path().join("b.log"))
            .unwrap_err();

        assert!(matches!(err, Error::ChannelAlreadyRedirected { .. }));
        assert!(!temp.path().join("b.log").exists());
    }

    #[test]
    fn unopenable_redirect_target_is_a_configuration_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let target = temp.path().join("missing-dir").join("run.log");
        let mut sink = RootSink::with_writer(Box::new(SharedBuffer::default()));

        let err = sink.redirect_to_file(&target).unwrap_err();

        assert!(matches!(err, Error::OpenChannelFile { ref path, .. } if *path == target));
        assert_eq!(sink.destination(), &Destination::Console);
    }

    #[test]
    fn null_sink_never_produces_output() {
        let temp = tempfile::tempdir().expect("tempdir");
        let log = temp.path().join("run.log");
        let mut sink = NullSink::default();

        sink.write_line("dropped").expect("write");
        sink.redirect_to_file(&log).expect("redirect");
        sink.write_line("dropped too").expect("write");

        assert!(!sink.is_active());
        assert!(!log.exists());
        assert_eq!(sink.destination(), &Destination::File(log));
    }
}
