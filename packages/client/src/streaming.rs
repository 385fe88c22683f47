//! Chunked stream copy with progress reporting.
//!
//! Copies a response body into a destination sink, invoking a progress
//! callback at a bounded cadence and staying cancellable at every
//! iteration.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use crate::error::Error;
use crate::handler::Outcome;

/// Buffer size and callback cadence for [`copy_with_progress`].
///
/// `cadence` is the number of buffer-fills between progress callbacks.
#[derive(Debug, Clone, Copy)]
pub struct ProgressOptions {
    pub buffer_size: usize,
    pub cadence: u64,
}

impl Default for ProgressOptions {
    fn default() -> Self {
        Self {
            buffer_size: 8192,
            cadence: 100,
        }
    }
}

impl ProgressOptions {
    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    #[must_use]
    pub fn with_cadence(mut self, cadence: u64) -> Self {
        self.cadence = cadence;
        self
    }
}

/// Copy `source` into `sink`, reporting `(total_bytes, bytes_so_far,
/// fraction)` every `cadence` reads and once more at end of stream with
/// `fraction = 1.0`.
///
/// `fraction` is `bytes_so_far / total_bytes` rounded to two decimal
/// places, or `0.0` while the total is unknown or zero. Cancellation is
/// checked before every read and once more after the loop, so a signal
/// racing the last write is still observed. Resolves to the sink so the
/// chain can keep going.
pub async fn copy_with_progress<R, W, F>(
    mut source: R,
    mut sink: W,
    total_bytes: Option<u64>,
    options: ProgressOptions,
    token: &CancellationToken,
    progress: &F,
) -> Outcome<W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    F: Fn(Option<u64>, u64, f32) + ?Sized,
{
    let cadence = options.cadence.max(1);
    let mut buffer = vec![0u8; options.buffer_size.max(1)];
    let mut bytes_so_far: u64 = 0;
    let mut reads: u64 = 0;

    loop {
        if token.is_cancelled() {
            log::debug!("stream copy cancelled after {bytes_so_far} bytes");
            return Outcome::Canceled;
        }
        let read = match source.read(&mut buffer).await {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!("stream copy read failed after {bytes_so_far} bytes: {e}");
                return Outcome::Failure(Error::body("failed to read source stream").with(e));
            }
        };
        if read == 0 {
            progress(total_bytes, bytes_so_far, 1.0);
            break;
        }
        if let Err(e) = sink.write_all(&buffer[..read]).await {
            tracing::warn!("stream copy write failed after {bytes_so_far} bytes: {e}");
            return Outcome::Failure(Error::body("failed to write to destination sink").with(e));
        }
        bytes_so_far += read as u64;
        reads += 1;
        if reads % cadence == 0 {
            progress(total_bytes, bytes_so_far, fraction(total_bytes, bytes_so_far));
        }
    }

    if let Err(e) = sink.flush().await {
        return Outcome::Failure(Error::body("failed to flush destination sink").with(e));
    }
    if token.is_cancelled() {
        return Outcome::Canceled;
    }
    Outcome::Success(sink)
}

#[allow(clippy::cast_precision_loss)]
fn fraction(total_bytes: Option<u64>, bytes_so_far: u64) -> f32 {
    match total_bytes {
        Some(total) if total > 0 => {
            let raw = bytes_so_far as f64 / total as f64;
            ((raw * 100.0).round() / 100.0) as f32
        }
        _ => 0.0,
    }
}
