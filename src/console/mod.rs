//! Terminal front ends for the two roles

pub mod handlers;
pub mod render;

use crate::config::VariantConfig;
use crate::protocol::OperatorCommand;
use crate::public::{self, PublicView};
use crate::state::AppState;
use crate::store::StateStore;
use crate::types::SharedState;
use handlers::Outcome;
use render::{render_operator, TerminalScreen};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, watch};

fn print_operator(state: &SharedState, config: &VariantConfig) {
    println!("{}", render_operator(state, config));
}

/// Read operator commands from stdin, one per line, until `quit`, EOF or
/// shutdown. The frame is reprinted after every state change, including
/// auto resets.
pub async fn run_operator(
    state: Arc<AppState>,
    shutdown: watch::Receiver<bool>,
) -> std::io::Result<()> {
    run_operator_with(state, BufReader::new(tokio::io::stdin()), shutdown).await
}

/// Operator loop over any line source. Pending resets are cancelled on every
/// exit path, including input errors.
pub async fn run_operator_with<R: AsyncBufRead + Unpin>(
    state: Arc<AppState>,
    input: R,
    mut shutdown: watch::Receiver<bool>,
) -> std::io::Result<()> {
    let result = operator_loop(&state, input, &mut shutdown).await;
    state.shutdown();
    result
}

async fn operator_loop<R: AsyncBufRead + Unpin>(
    state: &Arc<AppState>,
    input: R,
    shutdown: &mut watch::Receiver<bool>,
) -> std::io::Result<()> {
    let mut lines = input.lines();
    let mut snapshots = state.subscribe();
    print_operator(&state.snapshot().await, &state.config);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::info!("Operator input closed");
                    break;
                };
                let Some(cmd) = OperatorCommand::parse_line(&line) else {
                    tracing::debug!("Unbound input: {:?}", line);
                    continue;
                };
                if handle_outcome(handlers::handle_command(cmd, state).await) {
                    break;
                }
            }
            snapshot = snapshots.recv() => {
                match snapshot {
                    Ok(snapshot) => print_operator(&snapshot, &state.config),
                    Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
    Ok(())
}

// True when the loop should stop
fn handle_outcome(outcome: Outcome) -> bool {
    match outcome {
        Outcome::Updated => false,
        Outcome::Ignored(reason) => {
            println!("({})", reason);
            false
        }
        Outcome::Quit => true,
    }
}

/// Audience screen polling the shared store
pub async fn run_public(
    store: StateStore,
    config: &VariantConfig,
    shutdown: watch::Receiver<bool>,
) {
    let mut view = PublicView::new(config.trigger_mode).with_question_count(config.question_count());
    let mut screen = TerminalScreen::new(Arc::new(config.questions.clone()));
    tracing::info!(
        "Public screen polling '{}' every {:?}",
        store.key(),
        config.poll_interval
    );
    public::run_polling(store, config.poll_interval, &mut view, &mut screen, shutdown).await;
}

/// Operator console with an in-process public screen that only plays cues
pub async fn run_both(
    state: Arc<AppState>,
    shutdown: watch::Receiver<bool>,
) -> std::io::Result<()> {
    let screen = TerminalScreen::cues_only(Arc::new(state.config.questions.clone()));
    let public = public::spawn_subscribed(
        state.subscribe(),
        PublicView::new(state.config.trigger_mode)
            .with_question_count(state.config.question_count()),
        screen,
    );

    let result = run_operator(state, shutdown).await;
    public.stop().await;
    result
}
