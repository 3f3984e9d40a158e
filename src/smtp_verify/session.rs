use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use super::SmtpProbeError;

/// One parsed SMTP reply, possibly spanning multiple `250-…` lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SmtpReply {
    pub code: u16,
    pub lines: Vec<String>,
}

impl SmtpReply {
    pub fn is_positive_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }

    pub fn is_transient_failure(&self) -> bool {
        (400..500).contains(&self.code)
    }
}

/// A live SMTP dialogue over one TCP connection. Every read and write is
/// bounded by the command timeout.
pub(crate) struct SmtpSession {
    stream: TcpStream,
    buffer: Vec<u8>,
    command_timeout: Duration,
}

impl SmtpSession {
    /// Connect to the first reachable address of `host`.
    pub async fn connect(
        host: &str,
        addresses: &[SocketAddr],
        connect_timeout: Duration,
        command_timeout: Duration,
    ) -> Result<Self, SmtpProbeError> {
        let mut last_err = None;
        for addr in addresses {
            match timeout(connect_timeout, TcpStream::connect(addr)).await {
                Ok(Ok(stream)) => {
                    return Ok(Self {
                        stream,
                        buffer: Vec::new(),
                        command_timeout,
                    });
                }
                Ok(Err(err)) => last_err = Some(SmtpProbeError::connect(host, err)),
                Err(_) => last_err = Some(SmtpProbeError::Timeout(connect_timeout)),
            }
        }
        Err(last_err.unwrap_or(SmtpProbeError::NoSmtpServers))
    }

    /// Send one command line and read the server's reply.
    pub async fn send_command(&mut self, command: &str) -> Result<SmtpReply, SmtpProbeError> {
        let mut data = command.as_bytes().to_vec();
        data.extend_from_slice(b"\r\n");
        timeout(self.command_timeout, self.stream.write_all(&data))
            .await
            .map_err(|_| SmtpProbeError::Timeout(self.command_timeout))?
            .map_err(SmtpProbeError::io)?;
        self.read_reply().await
    }

    /// Best-effort session teardown; the verdict is already known by the
    /// time this runs.
    pub async fn quit(&mut self) {
        let _ = self.send_command("QUIT").await;
    }

    pub async fn read_reply(&mut self) -> Result<SmtpReply, SmtpProbeError> {
        let mut lines = Vec::new();
        let mut code: Option<u16> = None;
        loop {
            let line = self.read_line().await?;
            if line.len() < 3 {
                return Err(SmtpProbeError::Protocol(format!("invalid reply: {line}")));
            }
            let parsed_code = line
                .get(..3)
                .and_then(|head| head.parse::<u16>().ok())
                .ok_or_else(|| {
                    SmtpProbeError::Protocol(format!("invalid code in line: {line}"))
                })?;
            if let Some(existing) = code {
                if existing != parsed_code {
                    return Err(SmtpProbeError::Protocol(format!(
                        "inconsistent reply codes: {existing} vs {parsed_code}"
                    )));
                }
            } else {
                code = Some(parsed_code);
            }
            let is_last = !line.as_bytes().get(3).map(|b| *b == b'-').unwrap_or(false);
            let text = line.get(4..).unwrap_or_default().to_string();
            lines.push(text);
            if is_last {
                break;
            }
        }
        Ok(SmtpReply {
            code: code.unwrap_or(0),
            lines,
        })
    }

    async fn read_line(&mut self) -> Result<String, SmtpProbeError> {
        loop {
            if let Some(pos) = self.buffer.iter().position(|byte| *byte == b'\n') {
                let mut line = self.buffer.drain(..=pos).collect::<Vec<_>>();
                if line.ends_with(b"\r\n") {
                    line.truncate(line.len() - 2);
                } else if line.ends_with(b"\n") {
                    line.truncate(line.len() - 1);
                }
                return String::from_utf8(line)
                    .map_err(|err| SmtpProbeError::Protocol(format!("utf8 error: {err}")));
            }

            let mut buf = [0u8; 512];
            let read = timeout(self.command_timeout, self.stream.read(&mut buf))
                .await
                .map_err(|_| SmtpProbeError::Timeout(self.command_timeout))?
                .map_err(SmtpProbeError::io)?;
            if read == 0 {
                return Err(SmtpProbeError::io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed",
                )));
            }
            self.buffer.extend_from_slice(&buf[..read]);
        }
    }
}
