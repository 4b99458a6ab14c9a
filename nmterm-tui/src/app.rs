use std::collections::VecDeque;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use nmterm_core::network::{
    ConfiguredConnection, ConnectionDetail, ConnectionId, ObservedNetwork, WifiRequest,
};
use nmterm_core::{Config, Snapshot};
use tui_input::{Input, InputRequest};

use crate::worker::{Request, Response};

const MESSAGE_TTL: Duration = Duration::from_secs(4);
const LOG_CAPACITY: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Wifi,
    Networks,
    Rfkill,
    Logs,
    Debug,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Wifi => "wifi",
            Tab::Networks => "networks",
            Tab::Rfkill => "rfkill",
            Tab::Logs => "logs",
            Tab::Debug => "debug",
        }
    }
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    Refresh,
    Submit(Request),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordPurpose {
    Connect,
    Save,
}

pub enum Prompt {
    Password {
        request: WifiRequest,
        purpose: PasswordPurpose,
        input: Input,
    },
    ConfirmDelete {
        connection: ConfiguredConnection,
    },
}

pub struct DetailView {
    pub id: ConnectionId,
    pub detail: ConnectionDetail,
    pub scroll: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub level: Level,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub level: Level,
    pub text: String,
    until: Instant,
}

pub struct PollStats {
    pub at: DateTime<Local>,
    pub took: Duration,
}

/// Result of the last explicit `networking connectivity` check.
pub struct ConnectivityCheck {
    pub at: DateTime<Local>,
    pub state: Option<String>,
}

pub struct App {
    pub config: Config,
    pub tabs: Vec<Tab>,
    pub current_tab: usize,

    pub snapshot: Snapshot,
    pub last_seq: u64,
    pub last_poll: Option<PollStats>,
    pub connectivity: Option<ConnectivityCheck>,
    pub selected_network: usize,
    pub selected_connection: usize,

    pub prompt: Option<Prompt>,
    pub detail: Option<DetailView>,
    pub message: Option<Message>,
    pub log: VecDeque<LogEntry>,
    pub log_scroll: usize,
}

impl App {
    pub fn new(config: Config) -> Self {
        let mut tabs = vec![Tab::Wifi, Tab::Networks, Tab::Rfkill, Tab::Logs];
        if config.debug {
            tabs.push(Tab::Debug);
        }

        Self {
            config,
            tabs,
            current_tab: 0,
            snapshot: Snapshot::default(),
            last_seq: 0,
            last_poll: None,
            connectivity: None,
            selected_network: 0,
            selected_connection: 0,
            prompt: None,
            detail: None,
            message: None,
            log: VecDeque::with_capacity(LOG_CAPACITY),
            log_scroll: 0,
        }
    }

    pub fn tab(&self) -> Tab {
        self.tabs[self.current_tab]
    }

    pub fn select_tab(&mut self, index: usize) {
        if index < self.tabs.len() {
            self.current_tab = index;
        }
    }

    pub fn next_tab(&mut self) {
        self.current_tab = (self.current_tab + 1) % self.tabs.len();
    }

    pub fn previous_tab(&mut self) {
        self.current_tab = if self.current_tab == 0 {
            self.tabs.len() - 1
        } else {
            self.current_tab - 1
        };
    }

    /// Replace the displayed state with a newer poll result.
    ///
    /// Returns false when `seq` is not newer than what is on screen.
    pub fn apply_snapshot(&mut self, seq: u64, snapshot: Snapshot) -> bool {
        if seq <= self.last_seq {
            tracing::debug!("dropping stale poll {} (have {})", seq, self.last_seq);
            return false;
        }

        // Keep the cursor on the same network when it is still listed
        let selected_ssid = self.selected_network().map(|n| n.ssid.clone());
        let selected_name = self.selected_connection().map(|c| c.name.clone());

        self.last_seq = seq;
        self.snapshot = snapshot;

        self.selected_network = selected_ssid
            .and_then(|ssid| self.snapshot.networks.iter().position(|n| n.ssid == ssid))
            .unwrap_or_else(|| clamp(self.selected_network, self.snapshot.networks.len()));
        self.selected_connection = selected_name
            .and_then(|name| self.snapshot.connections.iter().position(|c| c.name == name))
            .unwrap_or_else(|| clamp(self.selected_connection, self.snapshot.connections.len()));

        true
    }

    pub fn apply(&mut self, response: Response) {
        match response {
            Response::Snapshot {
                seq,
                snapshot,
                took,
            } => {
                if self.apply_snapshot(seq, snapshot) {
                    self.last_poll = Some(PollStats {
                        at: Local::now(),
                        took,
                    });
                }
            }
            Response::Detail { id, detail } => {
                self.record(Level::Info, format!("loaded {} ({} fields)", id, detail.len()));
                self.detail = Some(DetailView {
                    id,
                    detail,
                    scroll: 0,
                });
            }
            Response::Connectivity { state } => {
                let shown = state.as_deref().unwrap_or("unknown");
                self.notify(Level::Info, format!("connectivity: {}", shown));
                self.connectivity = Some(ConnectivityCheck {
                    at: Local::now(),
                    state,
                });
            }
            Response::Done { message } => self.notify(Level::Info, message),
            Response::Failed { context, error } => {
                self.notify(Level::Error, format!("{} failed: {}", context, error))
            }
        }
    }

    /// Show a transient message and keep it in the log.
    pub fn notify(&mut self, level: Level, text: impl Into<String>) {
        let text = text.into();
        self.record(level, text.clone());
        self.message = Some(Message {
            level,
            text,
            until: Instant::now() + MESSAGE_TTL,
        });
    }

    pub fn record(&mut self, level: Level, text: impl Into<String>) {
        let text = text.into();
        match level {
            Level::Info => tracing::info!("{}", text),
            Level::Error => tracing::error!("{}", text),
        }
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(LogEntry {
            at: Local::now(),
            level,
            text,
        });
    }

    /// Expire the transient message.
    pub fn tick(&mut self) {
        if self
            .message
            .as_ref()
            .is_some_and(|m| Instant::now() >= m.until)
        {
            self.message = None;
        }
    }

    pub fn selected_network(&self) -> Option<&ObservedNetwork> {
        self.snapshot.networks.get(self.selected_network)
    }

    pub fn selected_connection(&self) -> Option<&ConfiguredConnection> {
        self.snapshot.connections.get(self.selected_connection)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }

        if self.prompt.is_some() {
            return self.handle_prompt_key(key);
        }

        if let Some(view) = &mut self.detail {
            match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('i') => {
                    self.detail = None
                }
                KeyCode::Up | KeyCode::Char('k') => view.scroll = view.scroll.saturating_sub(1),
                KeyCode::Down | KeyCode::Char('j') => view.scroll = view.scroll.saturating_add(1),
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Char('q') => return Some(Action::Quit),
            KeyCode::F(5) | KeyCode::Char('r') => return Some(Action::Refresh),
            KeyCode::Tab => self.next_tab(),
            KeyCode::BackTab => self.previous_tab(),
            KeyCode::Char(c @ '1'..='9') => self.select_tab(c as usize - '1' as usize),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            _ => return self.handle_tab_key(key),
        }
        None
    }

    fn move_selection(&mut self, delta: isize) {
        match self.tab() {
            Tab::Wifi => {
                self.selected_network =
                    step(self.selected_network, delta, self.snapshot.networks.len())
            }
            Tab::Networks => {
                self.selected_connection =
                    step(self.selected_connection, delta, self.snapshot.connections.len())
            }
            Tab::Logs => self.log_scroll = step(self.log_scroll, -delta, self.log.len()),
            Tab::Rfkill | Tab::Debug => {}
        }
    }

    fn handle_tab_key(&mut self, key: KeyEvent) -> Option<Action> {
        match (self.tab(), key.code) {
            (Tab::Wifi, KeyCode::Enter) => self.activate_network(),
            (Tab::Wifi, KeyCode::Char('a')) => self.save_network(),
            (Tab::Wifi, KeyCode::Char('s')) => Some(Action::Submit(Request::Rescan)),
            (Tab::Networks, KeyCode::Enter) => {
                let conn = self.selected_connection()?;
                let id = conn.id();
                Some(Action::Submit(if conn.connected {
                    Request::ConnectionDown { id }
                } else {
                    Request::ConnectionUp { id }
                }))
            }
            (Tab::Networks, KeyCode::Char('i')) => Some(Action::Submit(Request::ShowConnection {
                id: self.selected_connection()?.id(),
            })),
            (Tab::Networks, KeyCode::Char('d')) => {
                let connection = self.selected_connection()?.clone();
                self.prompt = Some(Prompt::ConfirmDelete { connection });
                None
            }
            (Tab::Networks, KeyCode::Char('x')) => {
                let conn = self.selected_connection()?;
                match conn.active_device() {
                    Some(device) => Some(Action::Submit(Request::DisconnectDevice {
                        interface: device.to_string(),
                    })),
                    None => {
                        let text = format!("{} is not active", conn.name);
                        self.notify(Level::Info, text);
                        None
                    }
                }
            }
            (Tab::Rfkill, KeyCode::Char('w')) => {
                let on = !self.snapshot.status.as_ref()?.wifi_enabled();
                Some(Action::Submit(Request::SetWifiRadio { on }))
            }
            (Tab::Rfkill, KeyCode::Char('n')) => {
                let on = !self.snapshot.status.as_ref()?.networking_enabled();
                Some(Action::Submit(Request::SetNetworking { on }))
            }
            (Tab::Rfkill, KeyCode::Char('c')) => Some(Action::Submit(Request::CheckConnectivity)),
            (Tab::Logs, KeyCode::Home) => {
                self.log_scroll = 0;
                None
            }
            _ => None,
        }
    }

    /// Enter on a scanned network: reuse a saved profile, otherwise join it.
    fn activate_network(&mut self) -> Option<Action> {
        let network = self.selected_network()?.clone();
        if network.is_hidden() {
            self.notify(Level::Error, "hidden network: SSID unknown");
            return None;
        }

        if let Some(profile) = self.snapshot.profile_for(&network.ssid) {
            let id = profile.id();
            return Some(Action::Submit(if profile.connected {
                Request::ConnectionDown { id }
            } else {
                Request::ConnectionUp { id }
            }));
        }

        let request = self.wifi_request(&network.ssid);
        if network.is_secured() {
            self.prompt = Some(Prompt::Password {
                request,
                purpose: PasswordPurpose::Connect,
                input: Input::default(),
            });
            None
        } else {
            Some(Action::Submit(Request::ConnectWifi { request }))
        }
    }

    fn save_network(&mut self) -> Option<Action> {
        let network = self.selected_network()?.clone();
        if network.is_hidden() {
            self.notify(Level::Error, "hidden network: SSID unknown");
            return None;
        }

        let request = self.wifi_request(&network.ssid);
        if network.is_secured() {
            self.prompt = Some(Prompt::Password {
                request,
                purpose: PasswordPurpose::Save,
                input: Input::default(),
            });
            None
        } else {
            Some(Action::Submit(Request::AddWifi { request }))
        }
    }

    fn wifi_request(&self, ssid: &str) -> WifiRequest {
        WifiRequest::new(ssid)
            .interface(self.config.interface.clone())
            .private(self.config.private)
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> Option<Action> {
        let prompt = self.prompt.take()?;

        match prompt {
            Prompt::ConfirmDelete { connection } => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    Some(Action::Submit(Request::DeleteConnection {
                        id: connection.id(),
                    }))
                }
                _ => None,
            },
            Prompt::Password {
                request,
                purpose,
                mut input,
            } => {
                let edit = match key.code {
                    KeyCode::Esc => return None,
                    KeyCode::Enter => {
                        let request = request.password(input.value());
                        return Some(Action::Submit(match purpose {
                            PasswordPurpose::Connect => Request::ConnectWifi { request },
                            PasswordPurpose::Save => Request::AddWifi { request },
                        }));
                    }
                    KeyCode::Char(c) => Some(InputRequest::InsertChar(c)),
                    KeyCode::Backspace => Some(InputRequest::DeletePrevChar),
                    KeyCode::Delete => Some(InputRequest::DeleteNextChar),
                    KeyCode::Left => Some(InputRequest::GoToPrevChar),
                    KeyCode::Right => Some(InputRequest::GoToNextChar),
                    KeyCode::Home => Some(InputRequest::GoToStart),
                    KeyCode::End => Some(InputRequest::GoToEnd),
                    _ => None,
                };
                if let Some(edit) = edit {
                    input.handle(edit);
                }
                self.prompt = Some(Prompt::Password {
                    request,
                    purpose,
                    input,
                });
                None
            }
        }
    }
}

fn clamp(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

fn step(index: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    index.saturating_add_signed(delta).min(len - 1)
}
