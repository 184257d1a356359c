//! Line-oriented chat mode.
//!
//! Each line the user enters is analyzed and answered with a bot message. The
//! transcript only lives for the session.

use crate::client::Analyzer;
use crate::render::{Report, NO_RESULT_MESSAGE};
use crate::session::{Completion, ResultsView, Session, GENERIC_FAILURE_MESSAGE};
use colored::Colorize;
use dialoguer::Input;

/// Lead line of a bot reply
pub const CHAT_LEAD: &str = "It looks like you're experiencing:";

/// Who wrote a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

/// In-memory conversation driven by a `Session`
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Send one line and return the bot's reply.
    ///
    /// Blank lines are ignored and produce no messages.
    pub async fn send<A: Analyzer>(&mut self, analyzer: &A, line: &str) -> Option<&Message> {
        if line.trim().is_empty() {
            return None;
        }

        self.messages.push(Message {
            sender: Sender::User,
            text: line.to_string(),
        });

        let mut session = Session::new();
        session.submission_mut()?.set_input(line);

        let reply = match session.submit(analyzer).await {
            Ok(Completion::Shown) => match session.results() {
                Some(ResultsView::Found(response)) => {
                    Report::from_response(response).to_text_with_lead(CHAT_LEAD)
                }
                _ => NO_RESULT_MESSAGE.to_string(),
            },
            _ => format!("{} Please try again.", GENERIC_FAILURE_MESSAGE),
        };

        self.messages.push(Message {
            sender: Sender::Bot,
            text: reply.trim_end().to_string(),
        });
        self.messages.last()
    }
}

/// Run the interactive chat loop until the user types `exit` or `quit`
pub async fn run<A: Analyzer>(analyzer: &A) -> anyhow::Result<()> {
    println!("{}", "Mental Health AI Assistant".bold().cyan());
    println!("{}\n", "Type how you feel. 'exit' to leave.".dimmed());

    let mut conversation = Conversation::new();
    loop {
        let line: String = Input::new()
            .with_prompt("you")
            .allow_empty(true)
            .interact_text()?;

        if matches!(line.trim(), "exit" | "quit") {
            break;
        }

        println!("{}", "Typing...".italic().dimmed());
        if let Some(reply) = conversation.send(analyzer, &line).await {
            println!("{}\n{}\n", "bot:".bold().green(), reply.text);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisResponse;
    use crate::client::AnalysisError;
    use reqwest::StatusCode;

    #[derive(Clone)]
    struct Canned(Option<&'static str>);

    impl Analyzer for Canned {
        async fn analyze(&self, _text: &str) -> Result<AnalysisResponse, AnalysisError> {
            match self.0 {
                Some(prediction) => {
                    let mut response = AnalysisResponse::new(prediction);
                    response.tips = vec!["Take a walk".into()];
                    Ok(response)
                }
                None => Err(AnalysisError::Status {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                }),
            }
        }
    }

    #[tokio::test]
    async fn reply_contains_prediction_and_tips() {
        let mut chat = Conversation::new();
        let reply = chat.send(&Canned(Some("stress")), "so much work").await.unwrap();
        assert_eq!(reply.sender, Sender::Bot);
        assert!(reply.text.starts_with("It looks like you're experiencing:\nstress"));
        assert!(reply.text.contains("• Take a walk"));
        assert_eq!(chat.messages().len(), 2);
        assert_eq!(chat.messages()[0].text, "so much work");
    }

    #[tokio::test]
    async fn failure_reply_is_generic() {
        let mut chat = Conversation::new();
        let reply = chat.send(&Canned(None), "hello").await.unwrap();
        assert!(reply.text.starts_with(GENERIC_FAILURE_MESSAGE));
        assert!(!reply.text.contains("503"));
    }

    #[tokio::test]
    async fn blank_prediction_reply_says_no_result() {
        let mut chat = Conversation::new();
        let reply = chat.send(&Canned(Some("")), "hello").await.unwrap();
        assert_eq!(reply.text, NO_RESULT_MESSAGE);
    }

    #[tokio::test]
    async fn blank_line_is_ignored() {
        let mut chat = Conversation::new();
        assert!(chat.send(&Canned(Some("normal")), "   ").await.is_none());
        assert!(chat.messages().is_empty());
    }
}
