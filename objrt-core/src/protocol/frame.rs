//! Length-prefixed framing: a 4-byte unsigned big-endian length followed by
//! that many payload bytes.

use std::io;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Largest payload either side will read or write.
pub const MAX_FRAME_LEN: usize = 128 * 1024 * 1024;

const LEN_PREFIX: usize = 4;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("declared frame length {declared} exceeds the {max} byte limit")]
    TooLarge { declared: usize, max: usize },

    #[error("connection closed before a full frame was read")]
    UnexpectedEof,

    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

fn map_read_err(err: io::Error) -> FrameError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        FrameError::UnexpectedEof
    } else {
        FrameError::Io(err)
    }
}

/// Reads one frame. The declared length is checked against
/// [`MAX_FRAME_LEN`] before any of the body is read.
pub async fn read_frame<R>(reader: &mut R) -> Result<Vec<u8>, FrameError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut prefix = [0u8; LEN_PREFIX];
    reader.read_exact(&mut prefix).await.map_err(map_read_err)?;

    let declared = u32::from_be_bytes(prefix) as usize;
    if declared > MAX_FRAME_LEN {
        return Err(FrameError::TooLarge {
            declared,
            max: MAX_FRAME_LEN,
        });
    }

    let mut payload = vec![0u8; declared];
    reader.read_exact(&mut payload).await.map_err(map_read_err)?;
    Ok(payload)
}

/// Writes one frame and flushes. Payloads above [`MAX_FRAME_LEN`] are
/// refused without writing anything.
pub async fn write_frame<W>(
    writer: &mut W,
    payload: &[u8],
) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    if payload.len() > MAX_FRAME_LEN {
        return Err(FrameError::TooLarge {
            declared: payload.len(),
            max: MAX_FRAME_LEN,
        });
    }

    let prefix = (payload.len() as u32).to_be_bytes();
    writer.write_all(&prefix).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}
