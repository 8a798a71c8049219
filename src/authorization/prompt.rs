//! Credential prompts.
//!
//! The handshake asks the user for three things at most: phone number,
//! one-time code and two-factor password. [`CredentialPrompt`] is where an
//! application plugs in its UI; [`TerminalPrompt`] asks line by line on a
//! terminal or reads a pre-recorded answer script.

use std::io;

use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines, Stderr, Stdin,
};

/// Source of user-supplied credentials.
#[async_trait::async_trait]
pub trait CredentialPrompt: Send {
    /// Asks for the phone number, in international format.
    async fn phone_number(&mut self) -> io::Result<String>;

    /// Asks for the one-time code sent to `phone_number`.
    async fn code(&mut self, phone_number: &str) -> io::Result<String>;

    /// Asks for the two-factor password; `hint` may be empty.
    async fn password(&mut self, hint: &str) -> io::Result<String>;
}

/// Line-oriented prompt over any async reader and writer.
///
/// Each question is written to `out`, the answer is the next non-empty
/// line of input with surrounding whitespace removed.
#[derive(Debug)]
pub struct TerminalPrompt<R, W> {
    lines: Lines<R>,
    out: W,
}

impl TerminalPrompt<BufReader<Stdin>, Stderr> {
    /// Questions on stderr, answers from stdin.
    ///
    /// Stdin is read as plain lines: an interactive terminal echoes every
    /// answer, the two-factor password included. Feed answers from a file
    /// or pipe when that matters.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stderr())
    }
}

impl<R, W> TerminalPrompt<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Creates a prompt reading answers from `input` and writing questions to `out`.
    pub fn new(input: R, out: W) -> Self {
        Self {
            lines: input.lines(),
            out,
        }
    }

    async fn ask(&mut self, question: &str) -> io::Result<String> {
        self.out.write_all(question.as_bytes()).await?;
        self.out.flush().await?;
        loop {
            let Some(line) = self.lines.next_line().await? else {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input closed before an answer was given",
                ));
            };
            let answer = line.trim();
            if !answer.is_empty() {
                return Ok(answer.to_string());
            }
        }
    }
}

#[async_trait::async_trait]
impl<R, W> CredentialPrompt for TerminalPrompt<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn phone_number(&mut self) -> io::Result<String> {
        self.ask("Enter phone number: ").await
    }

    async fn code(&mut self, phone_number: &str) -> io::Result<String> {
        if phone_number.is_empty() {
            self.ask("Enter code: ").await
        } else {
            self.ask(&format!("Enter code sent to {phone_number}: ")).await
        }
    }

    /// The answer is read like any other line and is not masked; see
    /// [`TerminalPrompt::stdio`].
    async fn password(&mut self, hint: &str) -> io::Result<String> {
        if hint.is_empty() {
            self.ask("Enter password: ").await
        } else {
            self.ask(&format!("Enter password (hint: {hint}): ")).await
        }
    }
}
