use crate::cli::Args;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use waiting_dialog::config::Config;
use waiting_dialog::constants::demo::{JITTER_FRACTION, POLL_MS};
use waiting_dialog::dialog::{DialogController, DialogOptions, HeaderText};
use waiting_dialog::error::AppError;
use waiting_dialog::surface::{DismissHook, TerminalSurface};
use waiting_dialog::terminal_manager::{ScreenOptions, ScreenSession};

/// How the demo run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Dismissed,
}

/// Session options requested on the command line
pub fn dialog_options(args: &Args) -> DialogOptions {
    let mut options = DialogOptions::new();
    if args.no_header {
        options.header_text = Some(HeaderText::Hidden);
    } else if let Some(text) = &args.header_text {
        options.header_text = Some(HeaderText::from(text.as_str()));
    }
    options.header_size = args.header_size;
    options.dialog_size = args.dialog_size.clone();
    options.progress_type = args.progress_type.clone();
    if args.ltr {
        options.rtl = Some(false);
    }
    options.timer_ms = args.timer_ms;
    options
}

/// Duration of one simulated step, jittered around `step_ms`
pub fn step_delay(rng: &mut impl Rng, step_ms: u64) -> Duration {
    let base = step_ms as f64;
    let jitter = base * JITTER_FRACTION;
    let ms = rng.random_range((base - jitter)..=(base + jitter));
    Duration::from_millis(ms.max(1.0) as u64)
}

/// Advances the dialog through `steps` units of fake work.
///
/// Stops early once the dialog is no longer visible.
pub async fn simulate_job(
    dialog: DialogController,
    steps: u64,
    step_ms: u64,
) -> Result<(), AppError> {
    let mut rng = SmallRng::from_os_rng();

    for step in 1..=steps {
        tokio::time::sleep(step_delay(&mut rng, step_ms)).await;
        if !dialog.is_visible() {
            tracing::info!("Job cancelled after {} of {steps} steps", step - 1);
            return Ok(());
        }
        dialog.set_progress_ratio(step, steps)?;
        dialog.message(Some(&format!("Step {step} of {steps}")), None)?;
    }

    tracing::info!("Job finished {steps} steps");
    Ok(())
}

fn is_dismiss_key(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

async fn drive(
    args: &Args,
    dialog: &DialogController,
    hook: &DismissHook,
) -> Result<Outcome, AppError> {
    let handle = dialog.show(Some(&args.message), dialog_options(args))?;
    tracing::info!("Started demo job behind {handle}");

    if args.animate {
        dialog.animate(None, args.timer_ms.map(Duration::from_millis), None)?;
    }

    let job = tokio::spawn(simulate_job(dialog.clone(), args.steps, args.step_ms));

    loop {
        if job.is_finished() {
            job.await
                .map_err(|e| AppError::invalid_state(format!("Demo job failed: {e}")))??;
            // Leave the full bar on screen for a moment
            tokio::time::sleep(Duration::from_millis(args.step_ms)).await;
            return Ok(Outcome::Completed);
        }
        if !dialog.is_visible() {
            job.abort();
            return Ok(Outcome::Dismissed);
        }

        if event::poll(Duration::from_millis(POLL_MS))? {
            match event::read()? {
                Event::Key(key_event)
                    if key_event.kind == KeyEventKind::Press
                        && is_dismiss_key(key_event.code, key_event.modifiers) =>
                {
                    hook.dismiss();
                }
                Event::Resize(columns, rows) => dialog.resize(columns, rows)?,
                _ => {}
            }
        }
    }
}

/// Run the demo: a simulated job behind the waiting dialog.
///
/// - Sets up the terminal and draws the dialog
/// - Polls for Esc / 'q' to dismiss it
/// - Cleans up terminal state whatever the outcome
pub async fn run_demo(args: &Args, config: &Config) -> Result<Outcome, AppError> {
    let (screen, out) = ScreenSession::enter(ScreenOptions {
        debug_mode: args.debug,
        window_title: Some("Waiting Dialog".to_string()),
    })?;
    let (columns, rows) = screen.dimensions();

    let surface = TerminalSurface::new(out, columns, rows);
    let hook = surface.dismiss_hook();
    let dialog = DialogController::with_defaults(surface, config.session_defaults()?);

    let result = drive(args, &dialog, &hook).await;

    dialog.animator().stop_all();
    if let Err(e) = dialog.hide() {
        tracing::warn!("Failed to close waiting dialog: {e}");
    }
    screen.leave()?;

    match result {
        Ok(outcome) => {
            tracing::info!("Demo ended: {outcome:?}");
            Ok(outcome)
        }
        Err(e) => {
            if e.is_caller_error() {
                tracing::warn!("Demo stopped by a rejected dialog call: {e}");
            } else {
                tracing::error!("Demo failed: {e}");
            }
            Err(e)
        }
    }
}
