// One conversation with the assistant
//
// Owns the interpreter, the conversation context and the dispatcher, and
// writes every utterance to the conversation log.

use crate::config::Config;
use crate::core::dispatcher::{Dispatcher, Outcome};
use crate::db::{ConversationLogEntry, Database};
use crate::error::Result;
use crate::interpreter::{CommandProcessor, CommandResult, ConversationContext};
use chrono::{Local, NaiveDateTime};
use std::sync::Arc;

/// An utterance's interpretation and what applying it did
#[derive(Debug, Clone)]
pub struct Exchange {
    pub result: CommandResult,
    pub outcome: Outcome,
}

pub struct Session {
    db: Arc<Database>,
    processor: CommandProcessor,
    context: ConversationContext,
    dispatcher: Dispatcher,
}

impl Session {
    pub fn new(db: Arc<Database>, config: &Config) -> Result<Self> {
        let processor = CommandProcessor::new()?.with_suggestion_limit(config.suggestion_limit);

        Ok(Self {
            dispatcher: Dispatcher::new(Arc::clone(&db)),
            context: ConversationContext::with_capacity(config.history_capacity),
            processor,
            db,
        })
    }

    /// Interpret, apply and log one utterance
    ///
    /// # Arguments
    /// * `text` - What the user typed
    /// * `now` - Reference time for dates and completion stamps
    pub async fn handle(&mut self, text: &str, now: NaiveDateTime) -> Result<Exchange> {
        let snapshot = self.dispatcher.load_snapshot(now).await?;
        let result = self.processor.process(text, &snapshot, &mut self.context, now);
        let applied = self.dispatcher.apply(&result, now).await;

        let input = text.trim();
        if !input.is_empty() {
            let success = result.success && applied.is_ok();
            self.db
                .log_utterance(input, result.action_name(), success, &result.message)
                .await?;
        }

        let outcome = applied?;
        Ok(Exchange { result, outcome })
    }

    pub async fn handle_now(&mut self, text: &str) -> Result<Exchange> {
        self.handle(text, Local::now().naive_local()).await
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    /// Forget the conversation so far; the log is kept
    pub fn reset(&mut self) {
        self.context.clear();
    }

    /// Logged utterances, newest first
    pub async fn history(&self, limit: i64) -> Result<Vec<ConversationLogEntry>> {
        self.db.get_conversation_log(limit).await
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}
