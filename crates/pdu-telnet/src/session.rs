//! Line-oriented console session over a telnet byte stream

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace};

use crate::config::TelnetPrompts;
use crate::error::TelnetError;
use crate::iac::{self, IacFilter};

const READ_CHUNK: usize = 1024;

/// Buffered console session. Reads block until the awaited marker arrives;
/// there is no read timeout.
pub struct TelnetSession<S> {
    stream: S,
    filter: IacFilter,
    buffer: BytesMut,
}

impl<S> TelnetSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            filter: IacFilter::new(),
            buffer: BytesMut::with_capacity(READ_CHUNK),
        }
    }

    /// Perform the login handshake and wait for the command prompt
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
        prompts: &TelnetPrompts,
    ) -> Result<(), TelnetError> {
        self.read_until(&prompts.login).await?;
        self.write_line(username).await?;
        self.read_until(&prompts.password).await?;
        self.write_line(password).await?;

        // A rejected password brings the login prompt back
        let (matched, _) = self
            .read_until_any(&[prompts.command.as_str(), prompts.login.as_str()])
            .await?;
        if matched != 0 {
            return Err(TelnetError::LoginRejected(username.to_string()));
        }
        debug!(username, "Console login accepted");
        Ok(())
    }

    /// Read until `marker` appears, returning everything up to and including it
    pub async fn read_until(&mut self, marker: &str) -> Result<String, TelnetError> {
        self.read_until_any(&[marker]).await.map(|(_, text)| text)
    }

    /// Read until the earliest of `markers` appears; returns its position in
    /// `markers` and the text up to and including it
    pub async fn read_until_any(&mut self, markers: &[&str]) -> Result<(usize, String), TelnetError> {
        loop {
            let earliest = markers
                .iter()
                .enumerate()
                .filter_map(|(i, m)| find(&self.buffer, m.as_bytes()).map(|pos| (pos + m.len(), i)))
                .min();
            if let Some((end, which)) = earliest {
                let chunk = self.buffer.split_to(end);
                return Ok((which, String::from_utf8_lossy(&chunk).into_owned()));
            }

            if self.fill().await? == 0 {
                return Err(TelnetError::ClosedBeforeMarker {
                    marker: markers.join(" | "),
                });
            }
        }
    }

    /// Write one line terminated with CRLF
    pub async fn write_line(&mut self, line: &str) -> Result<(), TelnetError> {
        let mut out = BytesMut::with_capacity(line.len() + 2);
        iac::escape(line.as_bytes(), &mut out);
        out.put_slice(b"\r\n");
        trace!(bytes = out.len(), "Console write");
        self.stream.write_all(&out).await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Drain the stream until the peer closes it
    pub async fn read_to_end(&mut self) -> Result<String, TelnetError> {
        while self.fill().await? > 0 {}
        let rest = self.buffer.split();
        Ok(String::from_utf8_lossy(&rest).into_owned())
    }

    /// One read from the stream through the option filter. Returns the raw
    /// byte count; 0 means EOF.
    async fn fill(&mut self) -> Result<usize, TelnetError> {
        let mut raw = [0u8; READ_CHUNK];
        let n = self.stream.read(&mut raw).await?;
        if n == 0 {
            return Ok(0);
        }
        let mut replies = Vec::new();
        self.filter.feed(&raw[..n], &mut self.buffer, &mut replies);
        if !replies.is_empty() {
            trace!(bytes = replies.len(), "Option negotiation reply");
            self.stream.write_all(&replies).await?;
            self.stream.flush().await?;
        }
        Ok(n)
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
