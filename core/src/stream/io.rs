//! Transport adapters: normalised input/output plus `Read`/`Write` wrappers
//! around the frame codec.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::constants::DEFAULT_READ_CHUNK_SIZE;
use crate::stream::decoder::{DecoderConfig, FrameDecoder};
use crate::stream::encoder::{EncoderConfig, FrameEncoder};
use crate::telemetry::TelemetrySnapshot;
use crate::types::StreamError;

/// Canonical input abstraction
pub enum InputSource {
    Reader(Box<dyn Read + Send>),
    File(PathBuf),
    Memory(Vec<u8>),
}

/// Canonical output abstraction
pub enum OutputSink {
    Writer(Box<dyn Write + Send>),
    File(PathBuf),
    /// Collect into a shared in-memory buffer.
    Memory,
}

/// Normalize input source into a boxed reader
pub fn open_input(src: InputSource) -> Result<Box<dyn Read + Send>, StreamError> {
    let reader: Box<dyn Read + Send> = match src {
        InputSource::Reader(r) => r,
        InputSource::File(p) => Box::new(std::fs::File::open(p)?),
        InputSource::Memory(b) => Box::new(io::Cursor::new(b)),
    };
    Ok(reader)
}

/// Normalize output sink into a boxed writer.
///
/// A `Memory` sink also returns the handle to the buffer it fills.
pub fn open_output(
    sink: OutputSink,
) -> Result<(Box<dyn Write + Send>, Option<Arc<Mutex<Vec<u8>>>>), StreamError> {
    match sink {
        OutputSink::Writer(w) => Ok((w, None)),
        OutputSink::File(p) => Ok((Box::new(std::fs::File::create(p)?), None)),
        OutputSink::Memory => {
            let buf = Arc::new(Mutex::new(Vec::new()));
            let writer = SharedBufferWriter { buf: buf.clone() };
            Ok((Box::new(writer), Some(buf)))
        }
    }
}

struct SharedBufferWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl Write for SharedBufferWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .buf
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "output buffer poisoned"))?;
        guard.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Read up to `len` bytes, stopping early only at EOF.
///
/// Used to pull deliveries of a fixed size so blocks come out full-sized even
/// when the underlying reader returns short reads.
pub fn read_exact_or_eof<R: Read + ?Sized>(r: &mut R, len: usize) -> Result<Vec<u8>, StreamError> {
    let mut buf = vec![0u8; len];
    let mut off = 0;

    while off < len {
        match r.read(&mut buf[off..]) {
            Ok(0) => break,
            Ok(n) => off += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    buf.truncate(off);
    Ok(buf)
}

// ================= Encode side =================

/// `Write` adapter: every `write` call is one encoder delivery.
pub struct FrameWriter<W: Write> {
    inner: W,
    encoder: FrameEncoder,
}

impl<W: Write> FrameWriter<W> {
    pub fn new(inner: W) -> Self {
        Self::with_config(inner, EncoderConfig::default())
    }

    pub fn with_config(inner: W, config: EncoderConfig) -> Self {
        Self {
            inner,
            encoder: FrameEncoder::with_config(config),
        }
    }

    /// Encode `chunk` and write its frames through.
    pub fn write_frames(&mut self, chunk: &[u8]) -> Result<(), StreamError> {
        let out = self.encoder.feed(chunk)?;
        self.inner.write_all(&out)?;
        Ok(())
    }

    /// End the stream: emits the identifier if nothing was written, then flushes.
    pub fn finish(&mut self) -> Result<(), StreamError> {
        let tail = self.encoder.finish()?;
        self.inner.write_all(&tail)?;
        self.inner.flush()?;
        Ok(())
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        self.encoder.telemetry()
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for FrameWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_frames(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// ================= Decode side =================

/// `Read` adapter: pulls framed bytes from `inner`, yields original bytes.
///
/// Decoder errors surface as `io::ErrorKind::InvalidData` with the
/// `StreamError` kept as the inner error.
pub struct FrameReader<R: Read> {
    inner: R,
    decoder: FrameDecoder,
    chunk: Vec<u8>,
    pending: Vec<u8>,
    pos: usize,
    eof: bool,
}

impl<R: Read> FrameReader<R> {
    pub fn new(inner: R, verify_checksums: bool) -> Self {
        Self::with_config(
            inner,
            DecoderConfig {
                verify_checksums,
                ..DecoderConfig::default()
            },
            DEFAULT_READ_CHUNK_SIZE,
        )
    }

    pub fn with_config(inner: R, config: DecoderConfig, read_chunk_size: usize) -> Self {
        Self {
            inner,
            decoder: FrameDecoder::with_config(config),
            chunk: vec![0u8; read_chunk_size.max(1)],
            pending: Vec::new(),
            pos: 0,
            eof: false,
        }
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        self.decoder.telemetry()
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Pull one chunk from `inner` through the decoder.
    fn fill(&mut self) -> io::Result<()> {
        let n = loop {
            match self.inner.read(&mut self.chunk) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };

        if n == 0 {
            self.eof = true;
            self.decoder.finish()?;
            return Ok(());
        }

        self.pending = self.decoder.feed(&self.chunk[..n])?;
        self.pos = 0;
        Ok(())
    }
}

impl<R: Read> Read for FrameReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        while self.pos == self.pending.len() {
            if self.eof {
                return Ok(0);
            }
            self.fill()?;
        }

        let n = buf.len().min(self.pending.len() - self.pos);
        buf[..n].copy_from_slice(&self.pending[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
