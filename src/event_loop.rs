//! Async driver for the live view.
//!
//! One task, two event sources: terminal input via the crossterm
//! `EventStream`, and the display-tick scheduler. Each tick runs the full
//! pipeline to completion and redraws before control yields back, so ticks
//! never overlap.

use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use std::path::Path;

use crate::display::Display;
use crate::export;
use crate::input::{handle_key_event, KeyAction};
use crate::render_loop::RenderLoop;
use crate::scheduler::TickScheduler;

/// Run the live view until the user quits or the scheduler is cancelled.
///
/// Teardown of the render loop (camera release, tick cancellation) is the
/// caller's responsibility via `RenderLoop::teardown` / drop; this function
/// only drives.
pub async fn run(
    render_loop: &mut RenderLoop,
    scheduler: &mut TickScheduler,
    display: &mut Display,
    output_dir: &Path,
) -> std::io::Result<()> {
    let mut events = EventStream::new();

    loop {
        tokio::select! {
            // Terminal input: exports and quit
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        match handle_key_event(key_event) {
                            KeyAction::Quit => break,
                            KeyAction::Snapshot => {
                                let path = export::default_snapshot_path(output_dir);
                                report_export(
                                    display,
                                    "snapshot",
                                    &path,
                                    export::save_snapshot(&render_loop.latest(), &path),
                                )?;
                            }
                            KeyAction::SaveText => {
                                let path = export::default_text_path(output_dir);
                                report_export(
                                    display,
                                    "text",
                                    &path,
                                    export::save_text(&render_loop.latest(), &path),
                                )?;
                            }
                            KeyAction::None => {}
                        }
                    }
                    Some(Ok(Event::Resize(_, _))) => {
                        // Leftovers may sit outside the frame area now
                        display.invalidate();
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e),
                    None => break,
                }
            }

            // Display tick: run the pipeline and redraw
            ticked = scheduler.next_tick() => {
                if !ticked {
                    break;
                }
                render_loop.tick();
                display.draw(&render_loop.latest())?;
            }
        }
    }

    Ok(())
}

/// Show the outcome of an export without interrupting the loop.
fn report_export(
    display: &mut Display,
    kind: &str,
    path: &Path,
    result: Result<(), export::ExportError>,
) -> std::io::Result<()> {
    match result {
        Ok(()) => display.notify(&format!("saved {} to {}", kind, path.display())),
        Err(e) => {
            log::warn!("{} export failed: {}", kind, e);
            display.notify(&format!("{} export failed: {}", kind, e))
        }
    }
}
