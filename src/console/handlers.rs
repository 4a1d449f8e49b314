//! Operator command dispatch
//!
//! Maps each `OperatorCommand` onto the state machine. Commands that do not
//! apply in the current state are no-ops and are reported as `Ignored`.

use crate::protocol::OperatorCommand;
use crate::state::AppState;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Updated,
    Ignored(String),
    Quit,
}

pub async fn handle_command(cmd: OperatorCommand, state: &Arc<AppState>) -> Outcome {
    match cmd {
        OperatorCommand::Select { participant } => match state.select(participant).await {
            Ok(()) => Outcome::Updated,
            Err(e) => ignored(e),
        },

        OperatorCommand::MarkCorrect => match state.mark_correct().await {
            Ok(_) => Outcome::Updated,
            Err(e) => ignored(e),
        },

        OperatorCommand::MarkIncorrect => match state.mark_incorrect().await {
            Ok(_) => Outcome::Updated,
            Err(e) => ignored(e),
        },

        OperatorCommand::NextQuestion => {
            state.next_question().await;
            Outcome::Updated
        }

        OperatorCommand::Rename { participant, name } => {
            match state.rename_participant(participant, name).await {
                Ok(_) => Outcome::Updated,
                Err(e) => ignored(e),
            }
        }

        OperatorCommand::ResetGame => {
            state.reset_game().await;
            Outcome::Updated
        }

        OperatorCommand::Quit => {
            tracing::info!("Operator quit");
            state.shutdown();
            Outcome::Quit
        }
    }
}

fn ignored(e: impl std::fmt::Display) -> Outcome {
    tracing::debug!("Ignoring command: {}", e);
    Outcome::Ignored(e.to_string())
}
