use std::{future::Future, time::Duration};

/// How long a trainer has to answer a yes/no question.
pub(crate) const CONFIRMATION_WINDOW: Duration = Duration::from_secs(20);

pub(crate) const DECLINED_REPLY: &str = "Operation cancelled.";
pub(crate) const TIMED_OUT_REPLY: &str = "Exiting operation.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Confirmation {
    Accepted,
    Declined,
    TimedOut,
}

/// Reads a yes/no answer. Anything else isn't an answer.
pub(crate) fn parse_yes_no(content: &str) -> Option<bool> {
    match content.trim().to_lowercase().as_str() {
        "yes" | "y" => Some(true),
        "no" | "n" => Some(false),
        _ => None,
    }
}

/// Waits for `answer` for at most `window`.
///
/// `answer` resolves to `None` when the source of answers goes away, which
/// counts the same as running out of time.
pub(crate) async fn await_confirmation<F>(answer: F, window: Duration) -> Confirmation
where
    F: Future<Output = Option<bool>>,
{
    match tokio::time::timeout(window, answer).await {
        Ok(Some(true)) => Confirmation::Accepted,
        Ok(Some(false)) => Confirmation::Declined,
        Ok(None) | Err(_) => Confirmation::TimedOut,
    }
}
