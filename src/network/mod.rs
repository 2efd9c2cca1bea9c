//! ## Network module
//!
//! Channels to the two external collaborators of the controller:
//! - the turn authority, which owns elevator motion and delivers new requests ([turn_client])
//! - the solvers (oracles), which judge authorization guesses ([oracle_client])
//!
//! Every exchange is a blocking request/response: one message out, the matching answer
//! awaited before anything else happens. Messages are serialized with bincode
//! ([crate::world_view::serial]) and framed with a 4 byte big-endian length.
//!
//! ## Functions
//! - `write_frame`: Serializes and sends one message
//! - `read_frame`: Receives and deserializes one message
//! - `connect`: Opens a TCP stream to a channel address

pub mod turn_client;
pub mod oracle_client;

use anyhow::{bail, Context};
use serde::{de::DeserializeOwned, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::{config, print, world_view::serial};


/// Serializes `msg` and writes it as one length-prefixed frame.
///
/// ## Errors
/// - serialization failed, the frame is larger than [config::MAX_FRAME_LEN], or the write failed
pub async fn write_frame<W, T>(stream: &mut W, msg: &T) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let payload = serial::serialize(msg)?;
    if payload.len() > config::MAX_FRAME_LEN {
        bail!("Frame of {} bytes exceeds limit of {} bytes", payload.len(), config::MAX_FRAME_LEN);
    }
    let len = (payload.len() as u32).to_be_bytes(); // Lengde som big-endian bytes

    stream.write_all(&len).await.context("Failed to write frame length")?;
    stream.write_all(&payload).await.context("Failed to write frame payload")?;
    stream.flush().await.context("Failed to flush stream")?;
    Ok(())
}

/// Reads one length-prefixed frame and deserializes it.
///
/// ## Errors
/// - the peer closed the stream, announced a frame larger than [config::MAX_FRAME_LEN],
///   or sent bytes that do not decode into `T`
pub async fn read_frame<R, T>(stream: &mut R) -> anyhow::Result<T>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let mut len_buf = [0u8; 4];
    stream.read_exact(&mut len_buf).await.context("Peer closed the channel")?;
    let len = u32::from_be_bytes(len_buf) as usize;
    if len > config::MAX_FRAME_LEN {
        bail!("Peer announced a frame of {} bytes, limit is {}", len, config::MAX_FRAME_LEN);
    }

    let mut buffer = vec![0u8; len];
    stream.read_exact(&mut buffer).await.context("Channel closed in the middle of a frame")?;
    serial::deserialize(&buffer)
}

/// Opens a TCP stream to `addr`, with Nagle switched off since every message is awaited.
pub async fn connect(addr: &str) -> anyhow::Result<TcpStream> {
    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("Failed to connect to {}", addr))?;
    if let Err(e) = stream.set_nodelay(true) {
        print::warn(format!("Could not set TCP_NODELAY on {}: {}", addr, e));
    }
    Ok(stream)
}
