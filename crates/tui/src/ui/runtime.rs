//! Runtime: the event loop and effect execution for the TUI.
//!
//! - Owns the terminal lifecycle (alternate screen, raw mode, mouse capture).
//! - A dedicated input task forwards `crossterm` events over a channel.
//! - Keys and mouse events go to the `MainView`, which returns `Effect`s.
//! - Effects are run on the next tick. Collaborator calls (storage, contact
//!   delivery) are spawned and their outcomes come back as `Msg`s.
//! - Ticking is fast while effects or collaborator calls are pending and slow
//!   when idle.
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use civiclab_types::{Effect, FileInfo, Msg};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::{StreamExt, stream::FuturesUnordered};
use rat_focus::FocusBuilder;
use ratatui::{Terminal, prelude::*};
use tokio::task::JoinHandle;
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, warn};

use crate::app::App;
use crate::ui::components::Component;
use crate::ui::main_component::MainView;

/// A spawned collaborator call; `None` when there is nothing to report back.
type PendingCall = JoinHandle<Option<Msg>>;

/// Spawn the input task that reads terminal events and forwards them over a
/// Tokio channel. Mouse moves are throttled to one per 16 ms.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    let mut last_mouse_event = Instant::now();

    tokio::spawn(async move {
        let sixteen_ms = Duration::from_millis(16);
        loop {
            if !matches!(event::poll(sixteen_ms), Ok(true)) {
                continue;
            }
            match event::read() {
                Ok(event) => {
                    let is_mouse_move = event.as_mouse_event().is_some_and(|e| e.kind == MouseEventKind::Moved);
                    if is_mouse_move {
                        if last_mouse_event.elapsed() < sixteen_ms {
                            continue;
                        }
                        last_mouse_event = Instant::now();
                    }
                    if let Err(e) = sender.send(event).await {
                        warn!("Failed to send event: {}", e);
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read event: {}", e);
                    break;
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Rebuild the focus tree for the current structure, then draw.
fn render<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, main_view: &mut MainView) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    rebuild_focus(app, main_view);
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

fn rebuild_focus(app: &mut App, main_view: &mut MainView) {
    let old_focus = std::mem::take(&mut app.focus);
    app.focus = FocusBuilder::rebuild_for(app, Some(old_focus));
    if app.focus.focused().is_none() {
        main_view.restore_focus(app);
    }
}

fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) => main_view.handle_key_events(app, key_event),
        Event::Mouse(mouse_event) => main_view.handle_mouse_events(app, mouse_event),
        Event::Resize(width, height) => main_view.handle_message(app, Msg::Resize(width, height)),
        Event::FocusGained | Event::FocusLost | Event::Paste(_) => Vec::new(),
    }
}

/// Entry point for the TUI runtime: sets up the terminal, runs the event loop,
/// and restores the terminal on exit.
pub async fn run_app(mut app: App) -> Result<()> {
    let mut input_receiver = spawn_input_thread();
    let mut main_view = MainView::new(&app);
    let mut terminal = setup_terminal()?;

    let mut pending_calls: FuturesUnordered<PendingCall> = FuturesUnordered::new();
    let mut effects: Vec<Effect> = Vec::with_capacity(5);

    let fast_interval = Duration::from_millis(100);
    let idle_interval = Duration::from_millis(5000);
    let mut current_interval = idle_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(&mut terminal, &mut app, &mut main_view)?;

    loop {
        let busy = !effects.is_empty() || !pending_calls.is_empty();
        let target_interval = if busy { fast_interval } else { idle_interval };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }
        let mut needs_render = false;
        tokio::select! {
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    // Input channel closed; shut down cleanly.
                    break;
                };
                if let Event::Key(key_event) = event
                    && key_event.code == KeyCode::Char('c')
                    && key_event.modifiers.contains(KeyModifiers::CONTROL)
                {
                    break;
                }
                effects.extend(handle_input_event(&mut app, &mut main_view, event));
                needs_render = true;
            }

            _ = ticker.tick() => {
                effects.extend(main_view.handle_message(&mut app, Msg::Tick));
                if !effects.is_empty() {
                    // move effects out so ones produced while processing wait for the next tick
                    let mut effects_to_process = Vec::with_capacity(effects.len());
                    effects_to_process.append(&mut effects);

                    handle_navigation_effects(&mut app, &mut main_view, &mut effects_to_process);
                    process_effects(&mut app, &mut main_view, effects_to_process, &mut pending_calls, &mut effects);
                    needs_render = true;
                }
            }

            Some(joined) = pending_calls.next(), if !pending_calls.is_empty() => {
                match joined {
                    Ok(Some(msg)) => effects.extend(main_view.handle_message(&mut app, msg)),
                    Ok(None) => {}
                    Err(error) => warn!(%error, "collaborator task failed"),
                }
                needs_render = true;
            }

            _ = signal::ctrl_c() => { break; }
        }

        if needs_render {
            render(&mut terminal, &mut app, &mut main_view)?;
        }
    }

    cleanup_terminal(&mut terminal)?;
    Ok(())
}

/// Open and close modals. These need the `MainView`, so they run before the rest.
fn handle_navigation_effects(app: &mut App, main_view: &mut MainView, effects: &mut Vec<Effect>) {
    let navigation_effects = effects
        .extract_if(.., |effect| matches!(effect, Effect::ShowModal(_) | Effect::CloseModal))
        .collect::<Vec<Effect>>();

    for effect in navigation_effects {
        match effect {
            Effect::ShowModal(modal) => main_view.set_open_modal_kind(app, Some(modal)),
            Effect::CloseModal => {
                main_view.set_open_modal_kind(app, None);
                rebuild_focus(app, main_view);
            }
            _ => {}
        }
    }
}

fn process_effects(
    app: &mut App,
    main_view: &mut MainView,
    effects: Vec<Effect>,
    pending_calls: &mut FuturesUnordered<PendingCall>,
    effects_out: &mut Vec<Effect>,
) {
    for effect in effects {
        debug!(?effect, "processing effect");
        match effect {
            Effect::TagFilterToggled(tag) => {
                app.toggle_tag_filter(&tag);
            }
            Effect::Navigate(url) => app.navigate(url),
            Effect::UploadFile(path) => pending_calls.push(spawn_upload(app, path)),
            Effect::DeleteStoredFile(file) => pending_calls.push(spawn_delete(app, file)),
            Effect::SendContactMessage { project_id, message } => {
                pending_calls.push(spawn_contact(app, project_id, message));
            }
            Effect::SendMsg(msg) => effects_out.extend(main_view.handle_message(app, msg)),
            // Already handled by `handle_navigation_effects`.
            Effect::ShowModal(_) | Effect::CloseModal => {}
        }
    }
}

fn spawn_upload(app: &App, path: PathBuf) -> PendingCall {
    let storage = app.ctx.storage.clone();
    tokio::spawn(async move {
        Some(match storage.upload(&path).await {
            Ok(upload) => Msg::FileUploaded(upload),
            Err(error) => Msg::FileUploadFailed {
                path,
                error: error.to_string(),
            },
        })
    })
}

fn spawn_delete(app: &App, file: FileInfo) -> PendingCall {
    let storage = app.ctx.storage.clone();
    tokio::spawn(async move {
        Some(match storage.delete(&file.key).await {
            Ok(()) => Msg::FileDeleted(file),
            Err(error) => Msg::FileDeleteFailed {
                file,
                error: error.to_string(),
            },
        })
    })
}

fn spawn_contact(app: &App, project_id: u64, message: String) -> PendingCall {
    let contact = app.ctx.contact.clone();
    tokio::spawn(async move {
        Some(match contact.send(project_id, &message).await {
            Ok(()) => Msg::ContactMessageSent { project_id },
            Err(error) => Msg::ContactMessageFailed {
                project_id,
                error: error.to_string(),
            },
        })
    })
}

#[cfg(test)]
mod tests {
    use civiclab_types::{FileUploadData, Modal};
    use civiclab_util::SessionSnapshot;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::app::tests::test_app;

    async fn drain(app: &mut App, main_view: &mut MainView, pending: &mut FuturesUnordered<PendingCall>) -> Vec<Effect> {
        let mut effects = Vec::new();
        while let Some(joined) = pending.next().await {
            if let Some(msg) = joined.expect("task") {
                effects.extend(main_view.handle_message(app, msg));
            }
        }
        effects
    }

    #[tokio::test]
    async fn upload_then_confirmed_delete_round_trips_through_storage() {
        let dir = tempfile::tempdir().expect("temp dir");
        let source = dir.path().join("budget.csv");
        std::fs::write(&source, "a,b\n").expect("write source");

        let (mut app, _) = test_app(SessionSnapshot::signed_in(11, true));
        app.ctx.storage = std::sync::Arc::new(civiclab_util::storage::LocalDirectoryStorage::new(dir.path().join("store")));
        let mut main_view = MainView::new(&app);
        let mut pending = FuturesUnordered::new();
        let mut out = Vec::new();

        process_effects(&mut app, &mut main_view, vec![Effect::UploadFile(source)], &mut pending, &mut out);
        assert!(drain(&mut app, &mut main_view, &mut pending).await.is_empty());
        assert_eq!(app.file_list.files().len(), 1);
        assert_eq!(app.file_list.files()[0].file_name, "budget.csv");

        let App {
            file_list,
            confirmation_modal_state,
            ..
        } = &mut app;
        let mut effects = file_list.ask_to_delete_selected(confirmation_modal_state);
        handle_navigation_effects(&mut app, &mut main_view, &mut effects);
        assert_eq!(app.open_modal_kind, Some(Modal::Confirmation));

        let mut effects = main_view.handle_key_events(
            &mut app,
            crossterm::event::KeyEvent::new(KeyCode::Char('y'), KeyModifiers::NONE),
        );
        handle_navigation_effects(&mut app, &mut main_view, &mut effects);
        assert_eq!(app.open_modal_kind, None);
        process_effects(&mut app, &mut main_view, effects, &mut pending, &mut out);
        let deletes: Vec<Effect> = std::mem::take(&mut out);
        process_effects(&mut app, &mut main_view, deletes, &mut pending, &mut out);

        assert!(drain(&mut app, &mut main_view, &mut pending).await.is_empty());
        assert_eq!(app.file_list.hidden_field(), "[]");
    }

    #[tokio::test]
    async fn failed_delete_puts_the_file_back() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (mut app, _) = test_app(SessionSnapshot::signed_in(11, true));
        app.ctx.storage = std::sync::Arc::new(civiclab_util::storage::LocalDirectoryStorage::new(dir.path().to_path_buf()));
        app.update(&Msg::FileUploaded(FileUploadData {
            id: "1".to_string(),
            key: "../outside.txt".to_string(),
            public_url: "file:///outside.txt".to_string(),
            file_name: "outside.txt".to_string(),
        }));
        let before = app.file_list.hidden_field().to_string();
        let mut main_view = MainView::new(&app);
        let mut pending = FuturesUnordered::new();
        let mut out = Vec::new();

        let App {
            file_list,
            confirmation_modal_state,
            ..
        } = &mut app;
        file_list.ask_to_delete_selected(confirmation_modal_state);
        let effects = app.file_list.confirm_delete(true);
        assert_eq!(app.file_list.hidden_field(), "[]");

        process_effects(&mut app, &mut main_view, effects, &mut pending, &mut out);
        drain(&mut app, &mut main_view, &mut pending).await;
        assert_eq!(app.file_list.hidden_field(), before);
        assert!(app.file_list.error.is_some());
    }

    #[tokio::test]
    async fn contact_delivery_closes_the_modal() {
        let (mut app, sink) = test_app(SessionSnapshot::signed_in(42, true));
        let mut main_view = MainView::new(&app);
        let mut pending = FuturesUnordered::new();
        let mut out = Vec::new();

        let mut effects = app.contact_button.activate();
        handle_navigation_effects(&mut app, &mut main_view, &mut effects);
        assert_eq!(app.open_modal_kind, Some(Modal::ContactProject));

        app.contact_modal.message.set_input("Happy to help with the frontend.");
        let effects = app.contact_modal.submit(7);
        process_effects(&mut app, &mut main_view, effects, &mut pending, &mut out);
        let mut effects = drain(&mut app, &mut main_view, &mut pending).await;
        assert_eq!(effects, vec![Effect::CloseModal]);

        handle_navigation_effects(&mut app, &mut main_view, &mut effects);
        assert_eq!(app.open_modal_kind, None);
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn render_restores_focus_after_a_modal_closes() {
        let (mut app, _) = test_app(SessionSnapshot::signed_in(42, true));
        let mut main_view = MainView::new(&app);
        let mut terminal = Terminal::new(TestBackend::new(120, 32)).expect("terminal");

        app.focus.focus(&app.contact_button.focus);
        main_view.set_open_modal_kind(&mut app, Some(civiclab_types::Modal::ContactProject));
        render(&mut terminal, &mut app, &mut main_view).expect("render");
        assert!(app.contact_modal.f_message.get());

        main_view.set_open_modal_kind(&mut app, None);
        render(&mut terminal, &mut app, &mut main_view).expect("render");
        assert!(app.contact_button.focus.get());
    }
}
