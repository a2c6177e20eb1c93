//! Dashboard screen — stats cards, search, filter tabs, device table,
//! and the device detail popup.
//!
//! This screen owns the view-filter state (search term, filter mode,
//! selected device). The filtered list is recomputed wholesale whenever
//! the device list, the search term, or the filter mode changes; the
//! detail popup shows the device as captured at selection time and does
//! not track later store updates.

use std::sync::Arc;

use chrono::Utc;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use lanscope_core::{Device, DeviceStatus, FilterMode, Stats, filter_devices};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::time_fmt;

pub struct DashboardScreen {
    // Store snapshots
    devices: Arc<Vec<Arc<Device>>>,
    stats: Stats,
    scanning: bool,

    // View-filter state
    search_input: Input,
    search_active: bool,
    filter_mode: FilterMode,
    /// Captured at selection time; cleared by explicit dismissal.
    selected_device: Option<Arc<Device>>,

    // Derived + presentation-only state
    cached_filtered: Vec<Arc<Device>>,
    table_state: TableState,
    throbber_state: ThrobberState,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            devices: Arc::new(Vec::new()),
            stats: Stats::default(),
            scanning: false,
            search_input: Input::default(),
            search_active: false,
            filter_mode: FilterMode::default(),
            selected_device: None,
            cached_filtered: Vec::new(),
            table_state: TableState::default(),
            throbber_state: ThrobberState::default(),
        }
    }

    /// True while the search box is eating printable keystrokes, so global
    /// single-letter bindings must stay out of the way.
    pub fn is_capturing_input(&self) -> bool {
        self.search_active
    }

    /// Recompute the filtered view from scratch. Called on every change to
    /// the device list, search term, or filter mode.
    fn recompute_filtered(&mut self) {
        self.cached_filtered =
            filter_devices(&self.devices, self.search_input.value(), self.filter_mode);
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        if self.cached_filtered.is_empty() {
            self.table_state.select(None);
        } else {
            let idx = self.table_state.selected().unwrap_or(0);
            self.table_state
                .select(Some(idx.min(self.cached_filtered.len() - 1)));
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.cached_filtered.is_empty() {
            return;
        }
        let len = self.cached_filtered.len();
        let current = self.table_state.selected().unwrap_or(0);
        let next = current
            .saturating_add_signed(delta)
            .min(len.saturating_sub(1));
        self.table_state.select(Some(next));
    }

    fn highlighted(&self) -> Option<&Arc<Device>> {
        self.table_state
            .selected()
            .and_then(|idx| self.cached_filtered.get(idx))
    }

    fn cycle_filter(&mut self) {
        self.filter_mode = self.filter_mode.next();
        self.recompute_filtered();
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_stats_cards(&mut self, frame: &mut Frame, area: Rect) {
        let cards = Layout::horizontal([
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
        ])
        .split(area);

        let card = |title: &str, value: String, style: Style| {
            Paragraph::new(vec![
                Line::from(Span::styled(title.to_owned(), theme::dim_style())),
                Line::from(Span::styled(
                    value,
                    style.add_modifier(Modifier::BOLD),
                )),
            ])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(theme::border_default()),
            )
        };

        frame.render_widget(
            card(
                "Total Devices",
                self.stats.total_devices.to_string(),
                theme::title_style(),
            ),
            cards[0],
        );
        frame.render_widget(
            card(
                "Online",
                self.stats.online_devices.to_string(),
                theme::ok_style(),
            ),
            cards[1],
        );
        frame.render_widget(
            card(
                "Unauthorized",
                self.stats.unauthorized_devices.to_string(),
                theme::alert_style(),
            ),
            cards[2],
        );

        // Scan card: throbber while a scan is in flight, key hint otherwise.
        let scan_block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        if self.scanning {
            let throbber = Throbber::default()
                .label("Scanning…")
                .style(theme::title_style());
            let inner = scan_block.inner(cards[3]);
            frame.render_widget(scan_block, cards[3]);
            frame.render_stateful_widget(throbber, inner, &mut self.throbber_state);
        } else {
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from(Span::styled("Scan Network", theme::dim_style())),
                    Line::from(Span::styled("press s", theme::title_style())),
                ])
                .block(scan_block),
                cards[3],
            );
        }
    }

    fn render_controls(&self, frame: &mut Frame, area: Rect) {
        let chunks =
            Layout::horizontal([Constraint::Min(24), Constraint::Length(44)]).split(area);

        let search_style = if self.search_active {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let search = Paragraph::new(self.search_input.value()).block(
            Block::default()
                .title(" Search (/) ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(search_style),
        );
        frame.render_widget(search, chunks[0]);

        if self.search_active {
            // Put the terminal cursor inside the search box.
            #[allow(clippy::cast_possible_truncation)]
            let cursor_x =
                chunks[0].x + 1 + self.search_input.visual_cursor() as u16;
            frame.set_cursor_position((cursor_x.min(chunks[0].right() - 2), chunks[0].y + 1));
        }

        let tabs: Vec<Span> = FilterMode::ALL
            .iter()
            .flat_map(|&mode| {
                let style = if mode == self.filter_mode {
                    theme::title_style()
                } else {
                    theme::dim_style()
                };
                [Span::styled(mode.label(), style), Span::raw("  ")]
            })
            .collect();
        frame.render_widget(
            Paragraph::new(Line::from(tabs)).block(
                Block::default()
                    .title(" Filter (f) ")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(theme::border_default()),
            ),
            chunks[1],
        );
    }

    fn render_table(&mut self, frame: &mut Frame, area: Rect) {
        let now = Utc::now();

        let header = Row::new(vec![
            "", "IP", "MAC", "Hostname", "Vendor", "Last seen", "Auth",
        ])
        .style(theme::table_header());

        let rows: Vec<Row> = self
            .cached_filtered
            .iter()
            .map(|d| {
                let (marker, marker_style) = match d.status {
                    DeviceStatus::Online => ("●", theme::ok_style()),
                    DeviceStatus::Offline => ("○", theme::dim_style()),
                    DeviceStatus::Unknown => ("?", theme::dim_style()),
                };
                let auth = if d.is_authorized {
                    Cell::from("yes").style(theme::ok_style())
                } else {
                    Cell::from("NO").style(theme::alert_style())
                };
                Row::new(vec![
                    Cell::from(marker).style(marker_style),
                    Cell::from(d.ip_address.clone()),
                    Cell::from(d.mac_address.clone()),
                    Cell::from(d.display_hostname().to_owned()),
                    Cell::from(d.display_vendor().to_owned()),
                    Cell::from(time_fmt::last_seen(d.last_seen, now)),
                    auth,
                ])
            })
            .collect();

        let title = format!(
            " Devices ({}/{}) ",
            self.cached_filtered.len(),
            self.devices.len()
        );
        let table = Table::new(
            rows,
            [
                Constraint::Length(1),
                Constraint::Length(15),
                Constraint::Length(17),
                Constraint::Min(12),
                Constraint::Min(12),
                Constraint::Length(10),
                Constraint::Length(4),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected())
        .block(
            Block::default()
                .title(title)
                .title_style(theme::title_style())
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(theme::border_default()),
        );

        frame.render_stateful_widget(table, area, &mut self.table_state);
    }

    #[allow(clippy::unused_self)]
    fn render_detail(&self, frame: &mut Frame, area: Rect, device: &Device) {
        let popup = centered_rect(area, 60, 14);
        frame.render_widget(Clear, popup);

        let now = Utc::now();
        let status = match device.status {
            DeviceStatus::Online => Span::styled("ONLINE", theme::ok_style()),
            DeviceStatus::Offline => Span::styled("OFFLINE", theme::dim_style()),
            DeviceStatus::Unknown => Span::styled("UNKNOWN", theme::dim_style()),
        };
        let auth = if device.is_authorized {
            Span::styled("authorized", theme::ok_style())
        } else {
            Span::styled("UNAUTHORIZED (press a)", theme::alert_style())
        };

        let field = |label: &str, value: Span<'static>| {
            Line::from(vec![
                Span::styled(format!("{label:<12}"), theme::dim_style()),
                value,
            ])
        };

        let lines = vec![
            field("IP", Span::raw(device.ip_address.clone())),
            field("MAC", Span::raw(device.mac_address.clone())),
            field("Hostname", Span::raw(device.display_hostname().to_owned())),
            field("Vendor", Span::raw(device.display_vendor().to_owned())),
            field(
                "Type",
                Span::raw(device.device_type.clone().unwrap_or_else(|| "Unknown".into())),
            ),
            field("Status", status),
            field("Auth", auth),
            field(
                "First seen",
                Span::raw(time_fmt::relative(device.first_seen, now)),
            ),
            field(
                "Last seen",
                Span::raw(time_fmt::last_seen(device.last_seen, now)),
            ),
            Line::default(),
            Line::from(Span::styled("Esc to dismiss", theme::dim_style())),
        ];

        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .title(format!(" {} ", device.display_hostname()))
                    .title_style(theme::title_style())
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(theme::border_focused()),
            ),
            popup,
        );
    }
}

impl Component for DashboardScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Detail popup captures input until dismissed.
        if let Some(device) = self.selected_device.clone() {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Enter => {
                    self.selected_device = None;
                    None
                }
                KeyCode::Char('a') if !device.is_authorized => {
                    self.selected_device = None;
                    Some(Action::Authorize(device.id))
                }
                _ => None,
            });
        }

        // Search box captures printable input while active.
        if self.search_active {
            match key.code {
                KeyCode::Esc => {
                    self.search_active = false;
                    self.search_input.reset();
                    self.recompute_filtered();
                }
                KeyCode::Enter => self.search_active = false,
                _ => {
                    self.search_input
                        .handle_event(&crossterm::event::Event::Key(key));
                    self.recompute_filtered();
                }
            }
            return Ok(None);
        }

        Ok(match key.code {
            KeyCode::Char('/') => {
                self.search_active = true;
                None
            }
            KeyCode::Char('f') | KeyCode::Tab => {
                self.cycle_filter();
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(-1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(1);
                None
            }
            KeyCode::Enter => {
                self.selected_device = self.highlighted().cloned();
                None
            }
            KeyCode::Char('s') if !self.scanning => Some(Action::Scan),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('a') => self
                .highlighted()
                .filter(|d| !d.is_authorized)
                .map(|d| Action::Authorize(d.id)),
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::DevicesUpdated(devices) => {
                self.devices = Arc::clone(devices);
                self.recompute_filtered();
            }
            Action::StatsUpdated(stats) => self.stats = *stats,
            Action::ScanningChanged(scanning) => self.scanning = *scanning,
            Action::Tick => self.throbber_state.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(5),
        ])
        .split(area);

        self.render_stats_cards(frame, chunks[0]);
        self.render_controls(frame, chunks[1]);
        self.render_table(frame, chunks[2]);

        if let Some(device) = self.selected_device.clone() {
            self.render_detail(frame, area, &device);
        }
    }
}

/// Center a fixed-size popup inside `area`, clamped to fit.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crossterm::event::{KeyCode, KeyEvent};
    use pretty_assertions::assert_eq;

    fn device(id: i64, hostname: &str, online: bool, authorized: bool) -> Arc<Device> {
        Arc::new(Device {
            id,
            ip_address: format!("192.168.1.{id}"),
            mac_address: format!("aa:bb:cc:dd:ee:{id:02x}"),
            hostname: Some(hostname.into()),
            vendor: None,
            device_type: None,
            status: if online {
                DeviceStatus::Online
            } else {
                DeviceStatus::Offline
            },
            is_authorized: authorized,
            first_seen: Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap(),
            last_seen: None,
        })
    }

    fn screen_with(devices: Vec<Arc<Device>>) -> DashboardScreen {
        let mut screen = DashboardScreen::new();
        screen
            .update(&Action::DevicesUpdated(Arc::new(devices)))
            .unwrap();
        screen
    }

    fn press(screen: &mut DashboardScreen, code: KeyCode) -> Option<Action> {
        screen.handle_key_event(KeyEvent::from(code)).unwrap()
    }

    #[test]
    fn device_update_recomputes_filtered_view() {
        let mut screen = screen_with(vec![
            device(1, "printer", true, true),
            device(2, "nas", false, false),
        ]);
        assert_eq!(screen.cached_filtered.len(), 2);

        press(&mut screen, KeyCode::Char('f')); // All -> Online
        assert_eq!(screen.cached_filtered.len(), 1);
        assert_eq!(screen.cached_filtered[0].id, 1);
    }

    #[test]
    fn search_narrows_and_esc_clears() {
        let mut screen = screen_with(vec![
            device(1, "printer", true, true),
            device(2, "nas", true, true),
        ]);

        press(&mut screen, KeyCode::Char('/'));
        for c in "nas".chars() {
            press(&mut screen, KeyCode::Char(c));
        }
        assert_eq!(screen.cached_filtered.len(), 1);
        assert_eq!(screen.cached_filtered[0].id, 2);

        press(&mut screen, KeyCode::Esc);
        assert_eq!(screen.search_input.value(), "");
        assert_eq!(screen.cached_filtered.len(), 2);
    }

    #[test]
    fn selection_clamps_when_filter_shrinks_list() {
        let mut screen = screen_with(vec![
            device(1, "a", true, true),
            device(2, "b", true, true),
            device(3, "c", false, false),
        ]);
        press(&mut screen, KeyCode::Down);
        press(&mut screen, KeyCode::Down);
        assert_eq!(screen.table_state.selected(), Some(2));

        // Offline filter leaves a single row; selection must clamp.
        press(&mut screen, KeyCode::Char('f')); // Online
        press(&mut screen, KeyCode::Char('f')); // Offline
        assert_eq!(screen.cached_filtered.len(), 1);
        assert_eq!(screen.table_state.selected(), Some(0));
    }

    #[test]
    fn detail_is_captured_at_selection_time() {
        let mut screen = screen_with(vec![device(1, "printer", true, false)]);
        press(&mut screen, KeyCode::Enter);
        assert!(screen.selected_device.is_some());

        // A refresh replaces the list; the captured detail must not follow.
        screen
            .update(&Action::DevicesUpdated(Arc::new(vec![device(
                1, "printer", true, true,
            )])))
            .unwrap();
        assert!(!screen.selected_device.as_ref().unwrap().is_authorized);

        press(&mut screen, KeyCode::Esc);
        assert!(screen.selected_device.is_none());
    }

    #[test]
    fn authorize_key_targets_highlighted_unauthorized_device() {
        let mut screen = screen_with(vec![
            device(1, "a", true, true),
            device(2, "b", true, false),
        ]);
        // Highlighted row 0 is already authorized — no action.
        assert!(press(&mut screen, KeyCode::Char('a')).is_none());

        press(&mut screen, KeyCode::Down);
        match press(&mut screen, KeyCode::Char('a')) {
            Some(Action::Authorize(id)) => assert_eq!(id, 2),
            other => panic!("expected Authorize, got: {other:?}"),
        }
    }

    #[test]
    fn scan_key_is_ignored_while_scanning() {
        let mut screen = screen_with(vec![]);
        assert!(matches!(press(&mut screen, KeyCode::Char('s')), Some(Action::Scan)));

        screen.update(&Action::ScanningChanged(true)).unwrap();
        assert!(press(&mut screen, KeyCode::Char('s')).is_none());
    }
}
