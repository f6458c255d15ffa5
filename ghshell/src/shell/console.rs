//! Line-oriented user interaction.

use async_trait::async_trait;
use std::io;

/// Where the shell reads input and writes output.
///
/// `None` from a read means the input stream ended.
#[async_trait]
pub trait Console: Send {
    /// Shows `prompt` and reads one line, without the line terminator.
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Like [`Console::read_line`], but the typed text is not echoed.
    async fn read_secret(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Writes one line of output.
    fn print_line(&mut self, text: &str);
}
