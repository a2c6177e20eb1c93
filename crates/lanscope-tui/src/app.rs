//! Application core — event loop and action dispatch.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use lanscope_core::InventoryStore;

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screens::DashboardScreen;
use crate::theme;
use crate::tui::Tui;

/// Top-level application state and event loop.
pub struct App {
    screen: DashboardScreen,
    running: bool,
    store: InventoryStore,
    /// Cancellation token for the data bridge task.
    data_cancel: CancellationToken,
    /// Action sender — components dispatch through clones of this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver — the main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Active notification toast with its display timestamp.
    notification: Option<(Notification, Instant)>,
}

impl App {
    pub fn new(store: InventoryStore) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            screen: DashboardScreen::new(),
            running: true,
            store,
            data_cancel: CancellationToken::new(),
            action_tx,
            action_rx,
            notification: None,
        }
    }

    /// Run the main event loop until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.screen.init(self.action_tx.clone())?;

        // The data bridge performs the initial fetch and then forwards
        // every store snapshot change into the action channel.
        {
            let store = self.store.clone();
            let tx = self.action_tx.clone();
            let cancel = self.data_cancel.clone();
            tokio::spawn(async move {
                crate::data_bridge::run_data_bridge(store, tx, cancel).await;
            });
        }

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            // Drain and process all queued actions before the next event.
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render_frame(frame))?;
                }
            }
        }

        self.data_cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here; the rest
    /// is delegated to the dashboard screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        // Quit only when the screen isn't capturing text input.
        if key.code == KeyCode::Char('q') && !self.screen.is_capturing_input() {
            return Ok(Some(Action::Quit));
        }

        self.screen.handle_key_event(key)
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Render | Action::Resize(..) => {}

            Action::Tick => {
                // Auto-dismiss notifications after 4 seconds.
                if let Some((_, shown)) = &self.notification {
                    if shown.elapsed() > Duration::from_secs(4) {
                        self.notification = None;
                    }
                }
                let _ = self.screen.update(action)?;
            }

            Action::Refresh => self.spawn_refresh(),
            Action::Scan => self.spawn_scan(),
            Action::Authorize(id) => self.spawn_authorize(*id),

            Action::Notify(n) => {
                self.notification = Some((n.clone(), Instant::now()));
            }

            // Store snapshots go to the screen.
            other => {
                if let Some(follow_up) = self.screen.update(other)? {
                    self.action_tx.send(follow_up)?;
                }
            }
        }
        Ok(())
    }

    // ── Store operations ─────────────────────────────────────────────
    //
    // Each operation runs in its own task so the event loop never blocks
    // on the network. Results come back as Notify actions; the store's
    // watch channels deliver the data updates separately.

    fn spawn_refresh(&self) {
        let store = self.store.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let (devices, stats) = tokio::join!(store.load_devices(), store.load_stats());
            match (devices, stats) {
                (Ok(()), Ok(())) => {
                    let _ = tx.send(Action::Notify(Notification::info("Refreshed")));
                }
                (Err(e), _) | (_, Err(e)) => {
                    warn!(error = %e, "refresh failed");
                    let _ = tx.send(Action::Notify(Notification::error(format!(
                        "Refresh failed: {e}"
                    ))));
                }
            }
        });
    }

    fn spawn_scan(&self) {
        let store = self.store.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match store.scan_network().await {
                Ok(()) => {
                    let _ = tx.send(Action::Notify(Notification::info("Scan complete")));
                }
                Err(e) => {
                    warn!(error = %e, "network scan failed");
                    let _ = tx.send(Action::Notify(Notification::error(format!(
                        "Scan failed: {e}"
                    ))));
                }
            }
        });
    }

    fn spawn_authorize(&self, id: i64) {
        let store = self.store.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match store.authorize(id).await {
                Ok(()) => {
                    let _ = tx.send(Action::Notify(Notification::info("Device authorized")));
                }
                Err(e) => {
                    warn!(device_id = id, error = %e, "authorize failed");
                    let _ = tx.send(Action::Notify(Notification::error(format!(
                        "Authorize failed: {e}"
                    ))));
                }
            }
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_frame(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        self.screen.render(frame, layout[0]);
        self.render_status_bar(frame, layout[1]);

        if let Some((ref notif, _)) = self.notification {
            render_notification(frame, area, notif);
        }
    }

    #[allow(clippy::unused_self)]
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let hints = Span::styled(
            " / search  f filter  s scan  a authorize  r refresh  Enter details  q quit",
            theme::dim_style(),
        );
        frame.render_widget(Paragraph::new(Line::from(hints)), area);
    }
}

/// Render a notification toast in the bottom-right corner.
fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
    #[allow(clippy::cast_possible_truncation)]
    let msg_len = notif.message.len().min(u16::MAX as usize) as u16;
    let width = (msg_len + 6).clamp(20, 60);
    let height = 3u16;

    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 2); // above the status bar
    let toast_area = Rect::new(area.x + x, area.y + y, width, height);

    let (border_color, icon) = match notif.level {
        NotificationLevel::Info => (theme::ACCENT_CYAN, "·"),
        NotificationLevel::Warning => (theme::WARNING_YELLOW, "!"),
        NotificationLevel::Error => (theme::ERROR_RED, "✗"),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(toast_area);
    frame.render_widget(ratatui::widgets::Clear, toast_area);
    frame.render_widget(block, toast_area);

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
        Span::styled(notif.message.clone(), theme::dim_style()),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}
