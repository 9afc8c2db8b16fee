use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::warn;

use crate::domain::Turn;

use super::super::Container;

/// Shown in place of a reply when the backend fails.
pub const ERROR_REPLY: &str = "Error fetching joke. Please try again.";

const BANNER: &str = "🤣 JokeBot - AI Joke Generator\n\
Ask me for a joke about any topic, and I'll make you laugh!\n\
Commands: /history, /reset, /quit\n";

/// Interactive terminal chat. Reads one request per line until `/quit`
/// or end of input.
pub struct ChatController<'a> {
    container: &'a Container,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn chat(&self) -> Result<String> {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let turns = self.run(stdin, tokio::io::stdout()).await?;
        Ok(format!("Bye! ({turns} messages handled)"))
    }

    /// Drive a session over arbitrary streams; returns how many requests
    /// produced a reply.
    pub async fn run<R, W>(&self, input: R, mut output: W) -> Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let handler = self.container.handle_request_use_case();
        let mut state = handler.new_state();
        let mut lines = input.lines();
        let mut handled = 0;

        output.write_all(BANNER.as_bytes()).await?;

        loop {
            output.write_all(b"> ").await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match line.trim() {
                "/quit" | "/exit" => break,
                "/history" => {
                    output
                        .write_all(Self::format_history(state.history()).as_bytes())
                        .await?;
                    continue;
                }
                "/reset" => {
                    state = handler.new_state();
                    output.write_all(b"Conversation cleared.\n").await?;
                    continue;
                }
                _ => {}
            }

            let text = match handler.execute(&mut state, &line).await {
                Ok(Some(reply)) => reply.text().to_string(),
                Ok(None) => continue,
                Err(e) => {
                    warn!("Request failed: {}", e);
                    ERROR_REPLY.to_string()
                }
            };

            handled += 1;
            output.write_all(format!("{text}\n").as_bytes()).await?;
        }

        output.flush().await?;
        Ok(handled)
    }

    fn format_history(history: &[Turn]) -> String {
        if history.is_empty() {
            return "No messages yet.\n".to_string();
        }

        let mut out = String::new();
        for turn in history {
            out.push_str(&format!("you: {}\nbot: {}\n", turn.user(), turn.bot()));
        }
        out
    }
}
