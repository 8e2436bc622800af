//! Newline-delimited JSON-RPC over a reader/writer pair (normally
//! stdin/stdout). Nothing but protocol messages may be written to `writer`.

use jobtrack_core::store::TrackerStore;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _, AsyncWrite, AsyncWriteExt as _};

use crate::{
  error::{Error, RpcError},
  handler::Server,
  protocol::Response,
};

/// Serve until `reader` reaches end of file.
///
/// A line that is not valid UTF-8 gets a parse error reply; serving goes on.
pub async fn serve<S, R, W>(server: &Server<S>, mut reader: R, mut writer: W) -> Result<(), Error>
where
  S: TrackerStore,
  R: AsyncBufRead + Unpin,
  W: AsyncWrite + Unpin,
{
  let mut buf = Vec::new();
  loop {
    buf.clear();
    if reader.read_until(b'\n', &mut buf).await? == 0 {
      break;
    }

    let reply = match std::str::from_utf8(&buf) {
      Ok(line) if line.trim().is_empty() => continue,
      Ok(line) => server.handle_message(line.trim()).await,
      Err(e) => {
        tracing::warn!(error = %e, "non-UTF-8 input line");
        let failure = Response::failure(Value::Null, RpcError::parse_error(e));
        Some(serde_json::to_value(failure)?)
      }
    };

    if let Some(reply) = reply {
      let mut bytes = serde_json::to_vec(&reply)?;
      bytes.push(b'\n');
      writer.write_all(&bytes).await?;
      writer.flush().await?;
    }
  }
  tracing::info!("input closed, shutting down");
  Ok(())
}
