//! Reading audio from byte sources.

use bytes::Bytes;
use futures::TryStreamExt;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

/// Read a source to its end as a list of chunks.
///
/// The first read error aborts the whole read, so a truncated recording is
/// never handed on as if it were complete.
pub async fn read_chunks<R: AsyncRead>(reader: R) -> std::io::Result<Vec<Bytes>> {
    ReaderStream::new(reader).try_collect().await
}
