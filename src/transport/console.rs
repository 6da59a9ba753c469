//! Line-based transport for running the bot in a terminal.
//!
//! Every line is one message from a single fixed user. Replies are printed
//! with the attached menu, if any, on the line below as `[button] [button]`.

use super::{Incoming, Transport, TransportError};
use crate::dialog::Reply;
use crate::session::UserId;
use async_trait::async_trait;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};

pub struct ConsoleTransport<R, W> {
    lines: Lines<R>,
    writer: W,
    user_id: UserId,
}

impl<R, W> ConsoleTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W, user_id: UserId) -> Self {
        Self {
            lines: reader.lines(),
            writer,
            user_id,
        }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl ConsoleTransport<BufReader<io::Stdin>, io::Stdout> {
    pub fn stdio(user_id: UserId) -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout(), user_id)
    }
}

pub fn render(reply: &Reply) -> String {
    let mut out = reply.text.clone();
    out.push('\n');
    if let Some(keyboard) = reply.keyboard {
        let buttons: Vec<String> = keyboard.buttons().iter().map(|b| format!("[{}]", b)).collect();
        out.push_str(&buttons.join(" "));
        out.push('\n');
    }
    out
}

#[async_trait]
impl<R, W> Transport for ConsoleTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn recv(&mut self) -> Result<Vec<Incoming>, TransportError> {
        match self.lines.next_line().await? {
            Some(line) if line.trim().is_empty() => Ok(Vec::new()),
            Some(line) => Ok(vec![Incoming {
                user_id: self.user_id,
                chat_id: self.user_id,
                text: line,
            }]),
            None => Err(TransportError::Closed),
        }
    }

    async fn send(&mut self, _chat_id: i64, reply: &Reply) -> Result<(), TransportError> {
        self.writer.write_all(render(reply).as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "console"
    }
}
