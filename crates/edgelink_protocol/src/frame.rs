//! Field framing over a byte stream.
//!
//! One logical field per transport write/read. A field is a UTF-8 string of
//! at most [`MAX_FIELD_BYTES`] bytes; the stream carries no delimiter, so a
//! single read consumes the whole field.

use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Maximum payload of one wire field, in bytes.
///
/// Both peers read with this granularity, so raising it is a breaking
/// protocol change.
pub const MAX_FIELD_BYTES: usize = 1024;

/// Reads one field from the stream.
///
/// Returns `Ok(None)` on a zero-length read, which the protocol treats as
/// the peer having closed the connection.
///
/// # Errors
///
/// Returns an error on I/O failure or if the field is not valid UTF-8.
pub async fn read_field<R>(reader: &mut R) -> io::Result<Option<String>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; MAX_FIELD_BYTES];
    let n = reader.read(&mut buf).await?;
    if n == 0 {
        return Ok(None);
    }
    buf.truncate(n);

    let field = String::from_utf8(buf)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(Some(field))
}

/// Writes one field to the stream and flushes it.
///
/// Flushing per field matters: the peer blocks on its next read until the
/// field arrives.
///
/// # Errors
///
/// Returns `InvalidInput` if the field exceeds [`MAX_FIELD_BYTES`], or any
/// underlying I/O error.
pub async fn write_field<W>(writer: &mut W, field: &str) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    if field.len() > MAX_FIELD_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("field of {} bytes exceeds {}", field.len(), MAX_FIELD_BYTES),
        ));
    }

    writer.write_all(field.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn field_roundtrip() {
        let (mut writer, mut reader) = tokio::io::duplex(MAX_FIELD_BYTES);

        write_field(&mut writer, "login").await.expect("write field");
        let field = read_field(&mut reader)
            .await
            .expect("read field")
            .expect("expected field");

        assert_eq!(field, "login");
    }

    #[tokio::test]
    async fn eof_reads_as_none() {
        let (writer, mut reader) = tokio::io::duplex(64);
        drop(writer);

        let field = read_field(&mut reader).await.expect("read field");
        assert!(field.is_none());
    }

    #[tokio::test]
    async fn oversize_field_rejected() {
        let (mut writer, _reader) = tokio::io::duplex(64);
        let oversize = "x".repeat(MAX_FIELD_BYTES + 1);

        let result = write_field(&mut writer, &oversize).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn max_size_field_accepted() {
        let (mut writer, mut reader) = tokio::io::duplex(MAX_FIELD_BYTES);
        let exact = "y".repeat(MAX_FIELD_BYTES);

        write_field(&mut writer, &exact).await.expect("write field");
        let field = read_field(&mut reader)
            .await
            .expect("read field")
            .expect("expected field");

        assert_eq!(field.len(), MAX_FIELD_BYTES);
    }

    #[tokio::test]
    async fn invalid_utf8_rejected() {
        let (mut writer, mut reader) = tokio::io::duplex(64);
        tokio::io::AsyncWriteExt::write_all(&mut writer, &[0xFF, 0xFE])
            .await
            .expect("write bytes");
        drop(writer);

        let result = read_field(&mut reader).await;
        assert!(result.is_err());
    }
}
