//! Producer → engine byte transport.
//!
//! ```text
//!  producer stdout ──► [read task] ──► mpsc<Bytes> (bounded) ──► [write task] ──► engine stdin
//!                           ▲                                          ▲
//!                           └──────────── CancellationToken ───────────┘
//! ```
//!
//! A full channel parks the read task, which stops draining the producer's
//! pipe; that is the only backpressure there is.

use bytes::Bytes;
use futures::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PumpStats {
    pub bytes_read: u64,
    pub bytes_written: u64,
}

/// Forward `reader` into `writer` until the reader ends, the writer fails
/// or `cancel` fires. The writer is shut down on the way out so the engine
/// sees end of input.
pub async fn pump<R, W>(
    reader: R,
    writer: W,
    capacity: usize,
    cancel: CancellationToken,
) -> PumpStats
where
    R: AsyncRead + Send + Unpin + 'static,
    W: AsyncWrite + Send + Unpin + 'static,
{
    let (tx, rx) = mpsc::channel::<Bytes>(capacity.max(1));
    let read_task = tokio::spawn(read_into(reader, tx, cancel.clone()));
    let write_task = tokio::spawn(write_from(rx, writer, cancel));

    let (bytes_read, bytes_written) = tokio::join!(read_task, write_task);
    PumpStats {
        bytes_read: bytes_read.unwrap_or_else(|e| {
            log::error!("read task panicked: {}", e);
            0
        }),
        bytes_written: bytes_written.unwrap_or_else(|e| {
            log::error!("write task panicked: {}", e);
            0
        }),
    }
}

async fn read_into<R>(reader: R, tx: mpsc::Sender<Bytes>, cancel: CancellationToken) -> u64
where
    R: AsyncRead + Unpin,
{
    let mut stream = ReaderStream::new(reader);
    let mut total = 0u64;
    loop {
        let chunk = tokio::select! {
            _ = cancel.cancelled() => break,
            // write side is gone, nobody will read what we produce
            _ = tx.closed() => break,
            item = stream.next() => match item {
                Some(Ok(chunk)) => chunk,
                Some(Err(e)) => {
                    log::warn!("producer read error: {}", e);
                    break;
                }
                None => {
                    log::debug!("producer stream closed");
                    break;
                }
            },
        };

        let len = chunk.len() as u64;
        tokio::select! {
            _ = cancel.cancelled() => break,
            sent = tx.send(chunk) => {
                if sent.is_err() {
                    break;
                }
            }
        }
        total += len;
    }
    total
}

async fn write_from<W>(mut rx: mpsc::Receiver<Bytes>, mut writer: W, cancel: CancellationToken) -> u64
where
    W: AsyncWrite + Unpin,
{
    let mut total = 0u64;
    loop {
        let chunk = tokio::select! {
            _ = cancel.cancelled() => break,
            chunk = rx.recv() => match chunk {
                Some(chunk) => chunk,
                None => break,
            },
        };

        let written = tokio::select! {
            _ = cancel.cancelled() => break,
            res = writer.write_all(&chunk) => res,
        };
        if let Err(e) = written {
            if e.kind() == std::io::ErrorKind::BrokenPipe {
                log::debug!("engine closed its input");
            } else {
                log::warn!("engine write error: {}", e);
            }
            break;
        }
        total += chunk.len() as u64;
    }

    // Unblocks a producer parked on a full channel.
    rx.close();
    if !cancel.is_cancelled() {
        if let Err(e) = writer.shutdown().await {
            log::debug!("engine input shutdown: {}", e);
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::time::Duration;

    use tokio::io::AsyncReadExt;

    use super::*;

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[tokio::test]
    async fn test_pump_forwards_bytes_unmodified() -> anyhow::Result<()> {
        let data = pattern(300_000);
        let (engine_in, mut engine_side) = tokio::io::duplex(1024);

        let cancel = CancellationToken::new();
        let pump = tokio::spawn(pump(Cursor::new(data.clone()), engine_in, 2, cancel));

        let mut received = Vec::new();
        engine_side.read_to_end(&mut received).await?;
        let stats = pump.await?;

        assert_eq!(received, data);
        assert_eq!(stats.bytes_read, data.len() as u64);
        assert_eq!(stats.bytes_written, data.len() as u64);
        Ok(())
    }

    #[tokio::test]
    async fn test_pump_empty_input() -> anyhow::Result<()> {
        let (engine_in, mut engine_side) = tokio::io::duplex(64);
        let stats = pump(Cursor::new(Vec::new()), engine_in, 4, CancellationToken::new()).await;
        let mut received = Vec::new();
        engine_side.read_to_end(&mut received).await?;
        assert!(received.is_empty());
        assert_eq!(stats, PumpStats::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_cancel_stops_both_tasks() -> anyhow::Result<()> {
        // producer that never writes nor closes
        let (_producer_side, producer_out) = tokio::io::duplex(64);
        let (engine_in, _engine_side) = tokio::io::duplex(64);

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(pump(producer_out, engine_in, 4, cancel.clone()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();

        tokio::time::timeout(Duration::from_secs(5), handle).await??;
        Ok(())
    }

    #[tokio::test]
    async fn test_engine_gone_stops_reader() -> anyhow::Result<()> {
        let (mut producer_side, producer_out) = tokio::io::duplex(64);
        let (engine_in, engine_side) = tokio::io::duplex(64);
        drop(engine_side);

        let handle = tokio::spawn(pump(producer_out, engine_in, 4, CancellationToken::new()));
        producer_side.write_all(b"frame").await?;

        // producer_side stays open: only the failed write can end the pump
        let stats = tokio::time::timeout(Duration::from_secs(5), handle).await??;
        assert_eq!(stats.bytes_written, 0);
        Ok(())
    }
}
