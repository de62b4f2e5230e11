pub mod app;
pub mod compose;
pub mod event;
pub mod layout;
pub mod marquee;

use std::io::{self, Stdout};
use std::time::Instant;

use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::{Stream, StreamExt};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tokio::io::AsyncRead;
use tracing::{info, warn};

use crate::app::{AppContext, Result, ShutdownListener};
use crate::channel::FrameReader;
use crate::config::Config;
use crate::notifier::Notifier;

use self::app::TuiApp;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Run the consumer until a quit key, the end of terminal input, or
/// `shutdown` fires. The terminal is restored on every exit path.
pub async fn run<R>(ctx: &AppContext, reader: FrameReader<R>, shutdown: ShutdownListener) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let (mut terminal, mouse_enabled) = setup_terminal(ctx.config.display.mouse)?;
    let result = run_app(&mut terminal, ctx, reader, shutdown, mouse_enabled).await;
    restore_terminal(&mut terminal, mouse_enabled)?;
    result
}

fn setup_terminal(mouse: bool) -> Result<(Tui, bool)> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mouse_enabled = mouse && execute!(stdout, EnableMouseCapture).is_ok();
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok((terminal, mouse_enabled))
}

fn restore_terminal(terminal: &mut Tui, mouse_enabled: bool) -> Result<()> {
    disable_raw_mode()?;
    if mouse_enabled {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app<R>(
    terminal: &mut Tui,
    ctx: &AppContext,
    mut reader: FrameReader<R>,
    mut shutdown: ShutdownListener,
    mouse_enabled: bool,
) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let size = terminal.size()?;
    let mut tui_app = TuiApp::new(
        Rect::new(0, 0, size.width, size.height),
        ctx.config.display.compose_height,
        mouse_enabled,
    );
    let mut events = EventStream::new();
    info!("Consumer started ({}x{})", size.width, size.height);

    loop {
        terminal.draw(|frame| layout::render(frame, &mut tui_app, &ctx.config))?;
        if tui_app.should_quit {
            break;
        }

        next_input(
            &mut tui_app,
            &ctx.config,
            &*ctx.notifier,
            &mut reader,
            &mut events,
            &mut shutdown,
        )
        .await?;
    }

    info!("Consumer stopped");
    Ok(())
}

/// Block until the channel, the terminal, or the shutdown listener has
/// something, then apply it to the app state.
async fn next_input<R, S>(
    tui_app: &mut TuiApp,
    config: &Config,
    notifier: &dyn Notifier,
    reader: &mut FrameReader<R>,
    events: &mut S,
    shutdown: &mut ShutdownListener,
) -> Result<()>
where
    R: AsyncRead + Unpin,
    S: Stream<Item = io::Result<Event>> + Unpin,
{
    tokio::select! {
        frame = reader.next_frame(), if tui_app.channel_open => match frame {
            Ok(Some(frame)) => tui_app.consume_frame(&frame),
            Ok(None) => {
                info!("Producer closed the channel");
                tui_app.channel_closed();
            }
            Err(e) => {
                warn!("Reading from the channel failed: {}", e);
                tui_app.channel_closed();
            }
        },
        event = events.next() => match event {
            Some(Ok(event)) => handle_event(tui_app, event, config, notifier),
            Some(Err(e)) => return Err(e.into()),
            None => {
                info!("Terminal input closed");
                tui_app.should_quit = true;
            }
        },
        _ = shutdown.triggered() => {
            info!("Termination requested");
            tui_app.should_quit = true;
        }
    }
    Ok(())
}

fn handle_event(tui_app: &mut TuiApp, event: Event, config: &Config, notifier: &dyn Notifier) {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => {
            let action = config.keybindings.get_action(&key);
            tui_app.apply(action, notifier);
        }
        Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
            tui_app.click(mouse.column, mouse.row, Instant::now());
        }
        Event::Resize(width, height) => {
            tui_app.fit(Rect::new(0, 0, width, height));
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
    use futures::stream;

    use crate::app::shutdown_channel;
    use crate::channel::{encode, open_pipe};
    use crate::domain::FeedItem;
    use crate::notifier::tests::RecordingNotifier;

    fn tui_app() -> TuiApp {
        TuiApp::new(Rect::new(0, 0, 60, 16), 6, true)
    }

    fn key(code: KeyCode) -> io::Result<Event> {
        Ok(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn idle() -> stream::Pending<io::Result<Event>> {
        stream::pending()
    }

    #[tokio::test]
    async fn test_frames_reach_marquee() {
        let (mut writer, mut reader) = open_pipe();
        let (_signal, mut listener) = shutdown_channel();
        let config = Config::default();
        let notifier = RecordingNotifier::default();
        let mut app = tui_app();
        let mut events = idle();

        writer
            .write_frames(&encode(vec![FeedItem::new("Headline")]))
            .await
            .unwrap();
        next_input(&mut app, &config, &notifier, &mut reader, &mut events, &mut listener)
            .await
            .unwrap();

        let last = app.marquee.height() - 2;
        assert_eq!(app.marquee.line_text(last), " Headline");
        assert!(app.marquee.last_batch().is_some());
        assert!(!app.cursor_visible);
    }

    #[tokio::test]
    async fn test_keys_compose_and_submit() {
        let (_writer, mut reader) = open_pipe();
        let (_signal, mut listener) = shutdown_channel();
        let config = Config::default();
        let notifier = RecordingNotifier::default();
        let mut app = tui_app();
        let mut events = stream::iter(vec![
            key(KeyCode::Char('h')),
            key(KeyCode::Char('i')),
            key(KeyCode::Enter),
        ])
        .chain(idle());

        for _ in 0..3 {
            next_input(&mut app, &config, &notifier, &mut reader, &mut events, &mut listener)
                .await
                .unwrap();
        }

        assert_eq!(*notifier.messages.lock().unwrap(), vec!["hi".to_string()]);
        assert!(app.compose.is_empty());
    }

    #[tokio::test]
    async fn test_closed_channel_leaves_keyboard_working() {
        let (writer, mut reader) = open_pipe();
        drop(writer);
        let (_signal, mut listener) = shutdown_channel();
        let config = Config::default();
        let notifier = RecordingNotifier::default();
        let mut app = tui_app();
        let mut events = stream::iter(vec![key(KeyCode::Char('x'))]).chain(idle());

        next_input(&mut app, &config, &notifier, &mut reader, &mut events, &mut listener)
            .await
            .unwrap();
        next_input(&mut app, &config, &notifier, &mut reader, &mut events, &mut listener)
            .await
            .unwrap();

        assert!(!app.channel_open);
        assert_eq!(app.status_message.as_deref(), Some("news feed stopped"));
        assert_eq!(app.compose.text(), "x");
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_quit_key_and_shutdown_stop_the_loop() {
        let (_writer, mut reader) = open_pipe();
        let (signal, mut listener) = shutdown_channel();
        let config = Config::default();
        let notifier = RecordingNotifier::default();

        let mut app = tui_app();
        let mut events = stream::iter(vec![key(KeyCode::F(1))]).chain(idle());
        next_input(&mut app, &config, &notifier, &mut reader, &mut events, &mut listener)
            .await
            .unwrap();
        assert!(app.should_quit);

        let mut app = tui_app();
        let mut events = idle();
        signal.trigger();
        next_input(&mut app, &config, &notifier, &mut reader, &mut events, &mut listener)
            .await
            .unwrap();
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_mouse_and_resize_events() {
        let (_writer, mut reader) = open_pipe();
        let (_signal, mut listener) = shutdown_channel();
        let config = Config::default();
        let notifier = RecordingNotifier::default();
        let mut app = tui_app();

        let press = || -> io::Result<Event> {
            Ok(Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: 5,
                row: 2,
                modifiers: KeyModifiers::NONE,
            }))
        };
        let mut events =
            stream::iter(vec![press(), press(), Ok(Event::Resize(40, 12))]).chain(idle());

        for _ in 0..3 {
            next_input(&mut app, &config, &notifier, &mut reader, &mut events, &mut listener)
                .await
                .unwrap();
        }

        assert_eq!(app.last_click, Some((5, 2)));
        assert_eq!(app.marquee.width(), 38);
        assert_eq!(app.marquee.height(), 4);
    }
}
