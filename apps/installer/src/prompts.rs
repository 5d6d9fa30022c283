//! Terminal implementations of the upload chooser and external-upload confirmer.

use std::future::Future;
use std::pin::Pin;

use burrow_install_queue::{
    Confirmation, ExternalUploadConfirmer, QueueError, UploadChoice, UploadChooser,
};
use burrow_models::Upload;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

/// Asks on stderr, reads answers from one line reader shared by all prompts.
pub struct TerminalPrompts<R = BufReader<Stdin>> {
    lines: Mutex<Lines<R>>,
}

impl TerminalPrompts {
    pub fn stdin() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin + Send> TerminalPrompts<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: Mutex::new(reader.lines()),
        }
    }

    /// Next answer line, `None` at end of input.
    async fn read_line(&self) -> Result<Option<String>, QueueError> {
        self.lines
            .lock()
            .await
            .next_line()
            .await
            .map_err(|e| QueueError::Prompt(e.to_string()))
    }
}

impl<R: AsyncBufRead + Unpin + Send> UploadChooser for TerminalPrompts<R> {
    fn pick_upload<'a>(
        &'a self,
        uploads: &'a [Upload],
    ) -> Pin<Box<dyn Future<Output = Result<UploadChoice, QueueError>> + Send + 'a>> {
        Box::pin(async move {
            eprintln!("Several uploads are available:");
            for (i, upload) in uploads.iter().enumerate() {
                eprintln!("  {}) {}", i + 1, describe(upload));
            }

            loop {
                eprint!("Pick one [1-{}], or q to cancel: ", uploads.len());
                let Some(line) = self.read_line().await? else {
                    return Ok(UploadChoice::Aborted);
                };
                match parse_choice(&line, uploads.len()) {
                    Some(choice) => return Ok(choice),
                    None => eprintln!("Not a valid choice: {}", line.trim()),
                }
            }
        })
    }
}

impl<R: AsyncBufRead + Unpin + Send> ExternalUploadConfirmer for TerminalPrompts<R> {
    fn confirm_external_upload<'a>(
        &'a self,
        upload: &'a Upload,
    ) -> Pin<Box<dyn Future<Output = Result<Confirmation, QueueError>> + Send + 'a>> {
        Box::pin(async move {
            let host = if upload.host.is_empty() {
                "a third-party site"
            } else {
                upload.host.as_str()
            };
            eprintln!(
                "{} is hosted on {host}. Its contents cannot be verified and it may not install correctly.",
                upload.label()
            );
            eprint!("Install anyway? [y/N] ");

            let line = self.read_line().await?.unwrap_or_default();
            Ok(parse_confirmation(&line))
        })
    }
}

/// One-line description of an upload for the picker.
fn describe(upload: &Upload) -> String {
    let mut text = upload.label().to_string();
    if upload.demo {
        text.push_str(" (demo)");
    }
    if let Some(build) = &upload.build
        && !build.user_version.is_empty()
    {
        text.push_str(&format!(" v{}", build.user_version));
    }
    if upload.size > 0 {
        text.push_str(&format!(" [{:.1} MB]", upload.size as f64 / 1_048_576.0));
    }
    text
}

/// Parses a 1-based pick. Empty or `q` cancels; anything else invalid is `None`.
fn parse_choice(line: &str, count: usize) -> Option<UploadChoice> {
    let line = line.trim();
    if line.is_empty() || line.eq_ignore_ascii_case("q") {
        return Some(UploadChoice::Aborted);
    }
    match line.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Some(UploadChoice::Picked(n - 1)),
        _ => None,
    }
}

fn parse_confirmation(line: &str) -> Confirmation {
    let line = line.trim();
    Confirmation::from(line.eq_ignore_ascii_case("y") || line.eq_ignore_ascii_case("yes"))
}
