mod anchors;
mod api;
mod config;
mod error;
mod expansion;
mod export;
mod flat_row;
mod highlight;
mod message;
mod model;
mod navigation;
mod render;
mod search;
mod shell;
mod theme;

use iced::widget::{button, column, container, image, row, scrollable, text, text_input, Space};
use iced::{Element, Font, Length, Center, Fill, Color, Task, Subscription, clipboard};
use iced::advanced::widget::{Id as WidgetId, operate};
use iced::advanced::widget::operation::scrollable::{scroll_to, AbsoluteOffset};
use iced::advanced::widget::operation::focusable;
use iced::keyboard::{self, Key, key::Named};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Command;

use api::{ApiClient, User};
use config::Config;
use export::{ExportFormat, ExportRequest};
use flat_row::{FlatRow, RowKind, BUFFER_ROWS, INDENT_WIDTH, ROW_HEIGHT, category_color};
use highlight::Segment;
use message::{Message, ResolveState};
use shell::Shell;
use theme::{
    ThemeColors, button_3d_style_themed, button_link_style, button_tab_style_themed,
    get_theme_colors,
};

/// Shown on the login screen when the account is not on the allow list
const NOT_ALLOWED: &str = "You do not have permission to access this site.";

/// Height cap for the search results panel
const RESULTS_PANEL_MAX: f32 = 160.0;

pub fn main() -> iced::Result {
    env_logger::init();

    iced::application(App::boot, App::update, App::view)
        .window_size((1100.0, 800.0))
        .resizable(true)
        .title(|app: &App| {
            match app.shell.active_collection() {
                Some(collection) => format!("{} - Datadeck", collection),
                None => String::from("Datadeck"),
            }
        })
        .subscription(App::subscription)
        .run()
}

/// Which top-level screen is showing
#[derive(Debug, Clone, PartialEq, Eq)]
enum Screen {
    /// Waiting for the session check
    Checking,
    Login { notice: Option<String> },
    Viewer,
}

/// Last thing worth telling the user, shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
enum StatusLine {
    Info(String),
    Error(String),
}

// The application state (Model)
struct App {
    config: Config,
    api: ApiClient,
    screen: Screen,
    user: Option<User>,
    avatar: Option<image::Handle>,
    // Session cookie typed on the login screen
    session_input: String,
    shell: Shell,
    // Name resolution per id, never deduplicated
    names: HashMap<String, ResolveState>,
    show_export: bool,
    status: Option<StatusLine>,
    // Pending highlight-clear timer of the latest jump
    pending_clear: Option<iced::task::Handle>,
    // Virtual scrolling
    scroll_offset: f32,
    viewport_height: f32,
    rows_scrollable_id: WidgetId,
    search_input_id: WidgetId,
}

impl App {
    fn boot() -> (Self, Task<Message>) {
        let config = Config::load();
        let api = ApiClient::new(&config.api_base, config.session_cookie.clone());
        log::info!("using API at {}", config.api_base);

        let app = App {
            config,
            api,
            screen: Screen::Checking,
            user: None,
            avatar: None,
            session_input: String::new(),
            shell: Shell::new(),
            names: HashMap::new(),
            show_export: false,
            status: None,
            pending_clear: None,
            scroll_offset: 0.0,
            viewport_height: 600.0,
            rows_scrollable_id: WidgetId::unique(),
            search_input_id: WidgetId::unique(),
        };
        let task = app.check_session();
        (app, task)
    }

    fn subscription(&self) -> Subscription<Message> {
        keyboard::listen().filter_map(|event| {
            match event {
                keyboard::Event::KeyPressed { key, modifiers, .. } => {
                    Some(Message::KeyPressed(key, modifiers))
                }
                _ => None
            }
        })
    }

    fn colors(&self) -> ThemeColors {
        get_theme_colors(self.config.theme)
    }

    fn check_session(&self) -> Task<Message> {
        Task::perform(self.api.clone().current_user(), |result| {
            Message::SessionChecked(result.map_err(|e| e.to_string()))
        })
    }

    fn fetch_dataset(&self) -> Task<Message> {
        Task::perform(self.api.clone().fetch_dataset(), |result| {
            Message::DatasetLoaded(result.map_err(|e| {
                if let Some(status) = e.status() {
                    log::warn!("dataset request returned HTTP {}", status);
                }
                e.to_string()
            }))
        })
    }

    fn fetch_avatar(&self, user: &User) -> Task<Message> {
        let url = user.avatar_url().to_string();
        Task::perform(self.api.clone().fetch_avatar(url), |result| {
            let handle = match result {
                Ok(bytes) => Some(image::Handle::from_bytes(bytes)),
                Err(e) => {
                    log::warn!("avatar unavailable: {}", e);
                    None
                }
            };
            Message::AvatarLoaded(handle)
        })
    }

    fn scroll_rows_to(&self, y: f32) -> Task<Message> {
        let offset = AbsoluteOffset { x: Some(0.0), y: Some(y) };
        operate(scroll_to(self.rows_scrollable_id.clone(), offset))
    }

    fn save_config(&self) {
        if let Err(e) = self.config.save() {
            log::warn!("{}", e);
        }
    }

    /// Point the client at the configured server with the configured session
    fn rebuild_client(&mut self) {
        self.api = ApiClient::new(&self.config.api_base, self.config.session_cookie.clone());
    }

    fn cancel_pending_clear(&mut self) {
        if let Some(handle) = self.pending_clear.take() {
            handle.abort();
        }
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SessionChecked(result) => match result {
                Ok(Some(user)) if user.allowed => {
                    log::info!("signed in as {}", user.tag);
                    let avatar = self.fetch_avatar(&user);
                    self.user = Some(user);
                    self.screen = Screen::Viewer;
                    self.status = Some(StatusLine::Info("Loading data...".to_string()));
                    Task::batch([self.fetch_dataset(), avatar])
                }
                Ok(Some(user)) => {
                    log::info!("{} is not allowed", user.tag);
                    self.user = None;
                    self.screen = Screen::Login { notice: Some(NOT_ALLOWED.to_string()) };
                    Task::none()
                }
                Ok(None) => {
                    log::info!("no active session");
                    self.screen = Screen::Login { notice: None };
                    Task::none()
                }
                Err(e) => {
                    log::warn!("session check failed: {}", e);
                    self.screen = Screen::Login { notice: Some(e) };
                    Task::none()
                }
            },
            Message::SessionInputChanged(value) => {
                self.session_input = value;
                Task::none()
            }
            Message::SubmitSession => {
                let cookie = self.session_input.trim().to_string();
                if cookie.is_empty() {
                    return Task::none();
                }
                self.config.session_cookie = Some(cookie);
                self.save_config();
                self.rebuild_client();
                self.session_input.clear();
                self.screen = Screen::Checking;
                self.check_session()
            }
            Message::OpenLogin => {
                open_in_browser(&self.api.login_url());
                Task::none()
            }
            Message::Logout => {
                Task::perform(self.api.clone().logout(), |result| {
                    if let Err(e) = result {
                        log::warn!("logout request failed: {}", e);
                    }
                    Message::LoggedOut
                })
            }
            Message::LoggedOut => {
                log::info!("signed out");
                self.cancel_pending_clear();
                self.config.session_cookie = None;
                self.save_config();
                self.rebuild_client();
                self.user = None;
                self.avatar = None;
                self.shell = Shell::new();
                self.names.clear();
                self.show_export = false;
                self.status = None;
                self.screen = Screen::Login { notice: None };
                Task::none()
            }
            Message::AvatarLoaded(handle) => {
                self.avatar = handle;
                Task::none()
            }
            Message::DatasetLoaded(result) => {
                match result {
                    Ok(dataset) => {
                        let documents = dataset.document_count();
                        self.cancel_pending_clear();
                        self.shell.load_dataset(dataset);
                        self.scroll_offset = 0.0;
                        self.status = Some(StatusLine::Info(format!("Loaded {} documents", documents)));
                        self.scroll_rows_to(0.0)
                    }
                    Err(e) => {
                        log::warn!("dataset fetch failed: {}", e);
                        self.status = Some(StatusLine::Error(e));
                        Task::none()
                    }
                }
            }
            Message::Refresh => {
                self.status = Some(StatusLine::Info("Loading data...".to_string()));
                self.fetch_dataset()
            }
            Message::SelectCollection(name) => {
                if self.shell.active_collection() == Some(name.as_str()) {
                    return Task::none();
                }
                if self.shell.select_collection(&name) {
                    self.scroll_offset = 0.0;
                    return self.scroll_rows_to(0.0);
                }
                Task::none()
            }
            Message::SearchQueryChanged(query) => {
                self.shell.set_query(query);
                Task::none()
            }
            Message::ClearSearch => {
                self.shell.set_query(String::new());
                self.show_export = false;
                Task::none()
            }
            Message::FocusSearch => {
                operate(focusable::focus(self.search_input_id.clone()))
            }
            Message::TogglePath(path) => {
                self.shell.toggle(&path);
                Task::none()
            }
            Message::ExpandDocument(collection, index) => {
                self.shell.expand_document(&collection, index);
                Task::none()
            }
            Message::CollapseDocument(collection, index) => {
                self.shell.collapse_document(&collection, index);
                Task::none()
            }
            Message::CopyText(value) => clipboard::write(value),
            Message::CopyDocument(collection, index) => {
                match self.shell.document(&collection, index) {
                    Some(document) => {
                        let pretty = document.pretty();
                        self.status = Some(StatusLine::Info(format!("Copied Document #{}", index + 1)));
                        clipboard::write(pretty)
                    }
                    None => Task::none(),
                }
            }
            Message::GoToDocument(collection, id) => {
                self.cancel_pending_clear();
                let plan = self.shell.go_to_document(&collection, &id);
                let ticket = plan.ticket;

                let scroll = Task::perform(tokio::time::sleep(plan.scroll_after), move |_| {
                    Message::ScrollDue(ticket)
                });
                let (clear, handle) = Task::perform(tokio::time::sleep(plan.clear_after), move |_| {
                    Message::ClearHighlightDue(ticket)
                })
                .abortable();
                self.pending_clear = Some(handle);

                Task::batch([scroll, clear])
            }
            Message::ScrollDue(ticket) => {
                match self.shell.scroll_due(ticket) {
                    Some(y) => self.scroll_rows_to(y),
                    None => Task::none(),
                }
            }
            Message::ClearHighlightDue(ticket) => {
                if self.shell.clear_due(ticket) {
                    self.pending_clear = None;
                }
                Task::none()
            }
            Message::ResolveName(id) => {
                self.names.insert(id.clone(), ResolveState::Loading);
                let request = self.api.clone().resolve_name(id.clone());
                Task::perform(request, move |result| {
                    Message::NameResolved(id, result.map_err(|e| e.to_string()))
                })
            }
            Message::NameResolved(id, result) => {
                if let Err(e) = &result {
                    log::warn!("could not resolve {}: {}", id, e);
                }
                self.names.insert(id, ResolveState::from_result(result));
                Task::none()
            }
            Message::ToggleExportMenu => {
                self.show_export = !self.show_export;
                Task::none()
            }
            Message::Export(request) => {
                self.show_export = false;
                self.status = Some(StatusLine::Info(format!("Exporting {}...", request.label())));
                let active = self.shell.active_collection().map(str::to_string);
                let search = self.shell.query().to_string();
                Task::perform(
                    export_and_save(self.api.clone(), request, active, search),
                    |result| Message::ExportFinished(result.map_err(|e| e.to_string())),
                )
            }
            Message::ExportFinished(result) => {
                self.status = Some(match result {
                    Ok(Some(path)) => StatusLine::Info(format!("Saved {}", path.display())),
                    Ok(None) => StatusLine::Info("Export cancelled".to_string()),
                    Err(e) => {
                        log::warn!("export failed: {}", e);
                        StatusLine::Error(format!("Export failed: {}", e))
                    }
                });
                Task::none()
            }
            Message::Scrolled(viewport) => {
                self.scroll_offset = viewport.absolute_offset().y;
                self.viewport_height = viewport.bounds().height;
                Task::none()
            }
            Message::KeyPressed(key, modifiers) => {
                // Check for Cmd on macOS, Ctrl on other platforms
                let cmd_or_ctrl = modifiers.command() || modifiers.control();
                match key {
                    Key::Named(Named::Escape) => self.update(Message::ClearSearch),
                    Key::Character(c) if c.as_str() == "f" && cmd_or_ctrl => {
                        self.update(Message::FocusSearch)
                    }
                    Key::Character(c) if c.as_str() == "t" && cmd_or_ctrl => {
                        self.update(Message::ToggleTheme)
                    }
                    _ => Task::none()
                }
            }
            Message::ToggleTheme => {
                self.config.theme = self.config.theme.toggled();
                self.save_config();
                Task::none()
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let colors = self.colors();

        let content: Element<'_, Message> = match &self.screen {
            Screen::Checking => centered(
                text("Checking session...").size(16).color(colors.text_secondary).into(),
            ),
            Screen::Login { notice } => self.view_login(notice.as_deref(), colors),
            Screen::Viewer => self.view_viewer(colors),
        };

        container(content)
            .width(Fill)
            .height(Fill)
            .style(move |_theme| container::Style {
                background: Some(colors.background.into()),
                text_color: Some(colors.text_primary),
                ..Default::default()
            })
            .into()
    }

    fn view_login(&self, notice: Option<&str>, colors: ThemeColors) -> Element<'_, Message> {
        let header = column![
            text("Datadeck").size(32).color(colors.text_primary),
            text("Database viewer").size(16).color(colors.text_secondary),
        ]
        .spacing(5)
        .align_x(Center);

        let notice: Element<'_, Message> = match notice {
            Some(notice) => text(notice.to_string()).size(14).color(colors.error).into(),
            None => Space::new().into(),
        };

        let sign_in = button(text("Sign in with Discord").size(14))
            .on_press(Message::OpenLogin)
            .padding([8, 16])
            .style(button_3d_style_themed(colors));

        let session_input = text_input("Session cookie (connect.sid=...)", &self.session_input)
            .on_input(Message::SessionInputChanged)
            .on_submit(Message::SubmitSession)
            .padding(5)
            .width(Length::Fixed(320.0));

        let continue_button = button(text("Continue").size(12))
            .on_press(Message::SubmitSession)
            .padding([6, 12])
            .style(button_3d_style_themed(colors));

        centered(
            column![
                header,
                notice,
                sign_in,
                text("After signing in, paste the session cookie here:")
                    .size(12)
                    .color(colors.text_secondary),
                row![session_input, Space::new().width(Length::Fixed(8.0)), continue_button]
                    .align_y(Center),
            ]
            .spacing(15)
            .align_x(Center)
            .into(),
        )
    }

    fn view_viewer(&self, colors: ThemeColors) -> Element<'_, Message> {
        let mut sections: Vec<Element<'_, Message>> = vec![self.view_header(colors)];

        if self.show_export {
            sections.push(self.view_export_menu(colors));
        }
        sections.push(self.view_search_bar(colors));
        if !self.shell.query().is_empty() {
            sections.push(self.view_results(colors));
        }

        let body: Element<'_, Message> = if self.shell.is_loaded() {
            self.view_rows(colors)
        } else {
            let message = match &self.status {
                Some(StatusLine::Error(e)) => text(e.clone()).size(14).color(colors.error),
                _ => text("Loading data...").size(14).color(colors.text_secondary),
            };
            centered(message.into())
        };
        sections.push(body);
        sections.push(self.view_status_bar(colors));

        column(sections).into()
    }

    fn view_header(&self, colors: ThemeColors) -> Element<'_, Message> {
        let mut items: Vec<Element<'_, Message>> = vec![
            text("Datadeck").size(16).color(colors.text_primary).into(),
            Space::new().width(Length::Fixed(16.0)).into(),
        ];

        if let Some(dataset) = self.shell.dataset() {
            for collection in dataset.collections() {
                let is_active = self.shell.active_collection() == Some(collection.name.as_str());
                items.push(
                    button(text(collection.name.clone()).size(12))
                        .on_press(Message::SelectCollection(collection.name.clone()))
                        .padding([4, 10])
                        .style(button_tab_style_themed(is_active, colors))
                        .into(),
                );
                items.push(Space::new().width(Length::Fixed(4.0)).into());
            }
        }

        items.push(Space::new().width(Length::Fill).into());
        items.push(
            button(text("Export").size(12))
                .on_press(Message::ToggleExportMenu)
                .padding([4, 10])
                .style(button_tab_style_themed(self.show_export, colors))
                .into(),
        );
        items.push(Space::new().width(Length::Fixed(6.0)).into());
        items.push(
            button(text("Refresh").size(12))
                .on_press(Message::Refresh)
                .padding([4, 10])
                .style(button_3d_style_themed(colors))
                .into(),
        );
        items.push(Space::new().width(Length::Fixed(6.0)).into());
        items.push(
            button(text("◐").size(12))
                .on_press(Message::ToggleTheme)
                .padding([4, 10])
                .style(button_3d_style_themed(colors))
                .into(),
        );
        items.push(Space::new().width(Length::Fixed(12.0)).into());

        if let Some(avatar) = &self.avatar {
            items.push(
                image(avatar.clone())
                    .width(Length::Fixed(24.0))
                    .height(Length::Fixed(24.0))
                    .into(),
            );
            items.push(Space::new().width(Length::Fixed(6.0)).into());
        }
        if let Some(user) = &self.user {
            items.push(text(user.tag.clone()).size(12).color(colors.text_secondary).into());
            items.push(Space::new().width(Length::Fixed(8.0)).into());
        }
        items.push(
            button(text("Logout").size(12))
                .on_press(Message::Logout)
                .padding([4, 10])
                .style(button_3d_style_themed(colors))
                .into(),
        );

        container(row(items).align_y(Center))
            .width(Fill)
            .padding([8, 10])
            .style(move |_theme| container::Style {
                background: Some(colors.toolbar_bg.into()),
                ..Default::default()
            })
            .into()
    }

    fn view_export_menu(&self, colors: ThemeColors) -> Element<'_, Message> {
        let searching = !self.shell.query().trim().is_empty();
        let menu = ExportRequest::menu(searching);

        let rows: Vec<Element<'_, Message>> = ExportFormat::ALL
            .iter()
            .map(|&format| {
                let entries: Vec<Element<'_, Message>> = menu
                    .iter()
                    .filter(|request| request.format == format)
                    .map(|&request| {
                        button(text(request.label()).size(11))
                            .on_press(Message::Export(request))
                            .padding([4, 8])
                            .style(button_3d_style_themed(colors))
                            .into()
                    })
                    .collect();
                row(entries).spacing(6).into()
            })
            .collect();

        container(column(rows).spacing(6))
            .width(Fill)
            .padding([6, 10])
            .style(move |_theme| container::Style {
                background: Some(colors.panel_bg.into()),
                ..Default::default()
            })
            .into()
    }

    fn view_search_bar(&self, colors: ThemeColors) -> Element<'_, Message> {
        let search_input = text_input("Search all collections...", self.shell.query())
            .id(self.search_input_id.clone())
            .on_input(Message::SearchQueryChanged)
            .padding(5)
            .width(Length::Fixed(320.0));

        let clear_button = button(text("Clear").size(11))
            .padding([5, 12])
            .style(button_3d_style_themed(colors));
        let clear_button = if self.shell.query().is_empty() {
            clear_button
        } else {
            clear_button.on_press(Message::ClearSearch)
        };

        container(
            row![search_input, Space::new().width(Length::Fixed(8.0)), clear_button]
                .align_y(Center),
        )
        .width(Fill)
        .padding([6, 10])
        .style(move |_theme| container::Style {
            background: Some(colors.toolbar_bg.into()),
            ..Default::default()
        })
        .into()
    }

    fn view_results(&self, colors: ThemeColors) -> Element<'_, Message> {
        let matches = self.shell.matches();

        let panel: Element<'_, Message> = if matches.is_empty() {
            text("No results found").size(12).color(colors.text_secondary).into()
        } else {
            let items: Vec<Element<'_, Message>> = matches
                .iter()
                .map(|found| {
                    let label = format!("{} → Document #{}", found.collection, found.doc_index + 1);
                    button(text(label).size(12))
                        .on_press(Message::GoToDocument(found.collection.clone(), found.id.clone()))
                        .padding([2, 4])
                        .style(button_link_style(colors.link))
                        .into()
                })
                .collect();
            let height = (matches.len() as f32 * ROW_HEIGHT).min(RESULTS_PANEL_MAX);
            scrollable(column(items))
                .height(Length::Fixed(height))
                .width(Fill)
                .into()
        };

        container(panel)
            .width(Fill)
            .padding([6, 10])
            .style(move |_theme| container::Style {
                background: Some(colors.panel_bg.into()),
                ..Default::default()
            })
            .into()
    }

    fn view_rows(&self, colors: ThemeColors) -> Element<'_, Message> {
        let rows = self.shell.rows();
        let total_rows = rows.len();

        // Calculate visible range (with buffer for smooth scrolling)
        let first_visible = (self.scroll_offset / ROW_HEIGHT).floor() as usize;
        let visible_count = (self.viewport_height / ROW_HEIGHT).ceil() as usize + 1;
        let start = first_visible.saturating_sub(BUFFER_ROWS).min(total_rows);
        let end = (first_visible + visible_count + BUFFER_ROWS).min(total_rows);

        let mut elements: Vec<Element<'_, Message>> = Vec::new();

        let top_offset = start as f32 * ROW_HEIGHT;
        if top_offset > 0.0 {
            elements.push(Space::new().height(Length::Fixed(top_offset)).into());
        }

        for flat_row in &rows[start..end] {
            elements.push(self.render_flat_row(flat_row, colors));
        }

        // Bottom spacer keeps the scroll bar sized for all rows
        let bottom_offset = (total_rows - end) as f32 * ROW_HEIGHT;
        if bottom_offset > 0.0 {
            elements.push(Space::new().height(Length::Fixed(bottom_offset)).into());
        }

        scrollable(container(column(elements).spacing(0)).padding([10, 0]))
            .id(self.rows_scrollable_id.clone())
            .direction(scrollable::Direction::Both {
                vertical: scrollable::Scrollbar::default(),
                horizontal: scrollable::Scrollbar::default(),
            })
            .on_scroll(Message::Scrolled)
            .height(Length::Fill)
            .width(Fill)
            .into()
    }

    /// Render a single FlatRow into an Element
    fn render_flat_row<'a>(&'a self, flat_row: &'a FlatRow, colors: ThemeColors) -> Element<'a, Message> {
        let mut items: Vec<Element<'a, Message>> = vec![
            Space::new()
                .width(Length::Fixed(10.0 + flat_row.depth as f32 * INDENT_WIDTH))
                .into(),
        ];

        match &flat_row.kind {
            RowKind::DocumentHeader { collection, index } => {
                items.push(
                    text(format!("Document #{}", index + 1))
                        .font(Font::MONOSPACE)
                        .size(13)
                        .color(colors.values.key)
                        .into(),
                );
                for (label, message) in [
                    ("Copy Document", Message::CopyDocument(collection.clone(), *index)),
                    ("Expand all", Message::ExpandDocument(collection.clone(), *index)),
                    ("Collapse all", Message::CollapseDocument(collection.clone(), *index)),
                ] {
                    items.push(Space::new().width(Length::Fixed(8.0)).into());
                    items.push(
                        button(text(label).size(11))
                            .on_press(message)
                            .padding([1, 8])
                            .style(button_3d_style_themed(colors))
                            .into(),
                    );
                }
            }
            RowKind::Toggle { path, label, expanded } => {
                let indicator = if *expanded { "▾ " } else { "▸ " };
                let mut toggle: Vec<Element<'a, Message>> = vec![
                    text(indicator).font(Font::MONOSPACE).size(13).color(colors.values.bracket).into(),
                ];
                toggle.extend(key_elements(flat_row, colors));
                toggle.push(
                    text(label.clone()).font(Font::MONOSPACE).size(13).color(colors.values.bracket).into(),
                );

                items.push(
                    button(row(toggle).spacing(0))
                        .on_press(Message::TogglePath(path.clone()))
                        .padding(0)
                        .style(button::text)
                        .into(),
                );
            }
            RowKind::Scalar { segments, category, raw } => {
                items.push(text("  ").font(Font::MONOSPACE).size(13).into());
                items.extend(key_elements(flat_row, colors));
                items.extend(segment_elements(segments, category_color(*category, &colors), colors));
                items.push(Space::new().width(Length::Fixed(8.0)).into());
                items.push(
                    button(text("⧉").size(11))
                        .on_press(Message::CopyText(raw.clone()))
                        .padding(0)
                        .style(button_link_style(colors.text_secondary))
                        .into(),
                );
                if let Some(id) = &flat_row.resolve_id {
                    items.push(Space::new().width(Length::Fixed(8.0)).into());
                    items.extend(self.resolve_control(id, colors));
                }
            }
            RowKind::Gap => {}
            RowKind::NoDocuments => {
                items.push(text("No documents").size(13).color(colors.text_secondary).into());
            }
        }

        let is_highlighted = flat_row.document_id.is_some()
            && flat_row.document_id.as_deref() == self.shell.highlighted();

        let row_container = container(row(items).align_y(Center))
            .width(Length::Fixed(5000.0))
            .height(Length::Fixed(ROW_HEIGHT));

        if is_highlighted {
            row_container
                .style(move |_theme| container::Style {
                    background: Some(colors.doc_highlight.into()),
                    ..Default::default()
                })
                .into()
        } else {
            row_container.into()
        }
    }

    /// Button, progress text, name or retry for one resolvable id
    fn resolve_control<'a>(&self, id: &str, colors: ThemeColors) -> Vec<Element<'a, Message>> {
        let state = self.names.get(id).cloned().unwrap_or_default();
        match state {
            ResolveState::Idle => vec![
                button(text("resolve").size(11))
                    .on_press(Message::ResolveName(id.to_string()))
                    .padding(0)
                    .style(button_link_style(colors.link))
                    .into(),
            ],
            // Still clickable: every click is a fresh request
            ResolveState::Loading => vec![
                button(text("resolving…").size(11))
                    .on_press(Message::ResolveName(id.to_string()))
                    .padding(0)
                    .style(button_link_style(colors.text_secondary))
                    .into(),
            ],
            ResolveState::Resolved(name) => vec![
                text(format!("({})", name)).size(12).color(colors.resolved).into(),
            ],
            ResolveState::Failed(error) => vec![
                text(error).size(11).color(colors.error).into(),
                Space::new().width(Length::Fixed(6.0)).into(),
                button(text("Retry").size(11))
                    .on_press(Message::ResolveName(id.to_string()))
                    .padding(0)
                    .style(button_link_style(colors.link))
                    .into(),
            ],
        }
    }

    fn view_status_bar(&self, colors: ThemeColors) -> Element<'_, Message> {
        let document_count = self
            .shell
            .active_collection()
            .and_then(|name| self.shell.dataset()?.collection(name))
            .map(|collection| format!("Documents: {}", collection.documents.len()))
            .unwrap_or_default();

        let match_count = if self.shell.query().is_empty() {
            String::new()
        } else {
            format!("  |  Matches: {}", self.shell.matches().len())
        };

        let status = match &self.status {
            Some(StatusLine::Info(message)) => text(message.clone()).size(12).color(colors.text_secondary),
            Some(StatusLine::Error(message)) => text(message.clone()).size(12).color(colors.error),
            None => text(""),
        };

        container(
            row![
                text(document_count).size(12).color(colors.text_secondary),
                text(match_count).size(12).color(colors.text_secondary),
                Space::new().width(Length::Fill),
                status,
            ]
        )
        .width(Fill)
        .padding([5, 10])
        .style(move |_theme| container::Style {
            background: Some(colors.status_bar_bg.into()),
            ..Default::default()
        })
        .into()
    }
}

/// Field name (if any) followed by ": "
fn key_elements<'a>(flat_row: &FlatRow, colors: ThemeColors) -> Vec<Element<'a, Message>> {
    let Some(key) = &flat_row.key else {
        return Vec::new();
    };

    // Empty keys shown as "" for visibility
    let mut items = if flat_row.key_text().is_some_and(|k| k.is_empty()) {
        vec![text("\"\"").font(Font::MONOSPACE).size(13).color(colors.values.key).into()]
    } else {
        segment_elements(key, colors.values.key, colors)
    };
    items.push(text(": ").font(Font::MONOSPACE).size(13).color(colors.values.bracket).into());
    items
}

/// Plain runs in `color`, matched runs on the mark background
fn segment_elements<'a>(segments: &[Segment], color: Color, colors: ThemeColors) -> Vec<Element<'a, Message>> {
    segments
        .iter()
        .map(|segment| -> Element<'a, Message> {
            let run = text(segment.text().to_string()).font(Font::MONOSPACE).size(13);
            if segment.is_match() {
                container(run.color(colors.mark_text))
                    .style(move |_theme| container::Style {
                        background: Some(colors.mark_bg.into()),
                        ..Default::default()
                    })
                    .into()
            } else {
                run.color(color).into()
            }
        })
        .collect()
}

fn centered<'a>(content: Element<'a, Message>) -> Element<'a, Message> {
    container(content)
        .width(Fill)
        .height(Fill)
        .center(Fill)
        .into()
}

/// Fetch an export and write it wherever the user picks
async fn export_and_save(
    api: ApiClient,
    request: ExportRequest,
    active_collection: Option<String>,
    search: String,
) -> error::Result<Option<PathBuf>> {
    let bytes = api.export(request, active_collection, search).await?;
    export::save_export(bytes, request.file_name()).await
}

/// Open a URL in the system browser
fn open_in_browser(url: &str) {
    #[cfg(target_os = "macos")]
    let result = Command::new("open").arg(url).spawn();
    #[cfg(target_os = "windows")]
    let result = Command::new("cmd").args(["/C", "start", "", url]).spawn();
    #[cfg(all(unix, not(target_os = "macos")))]
    let result = Command::new("xdg-open").arg(url).spawn();

    if let Err(e) = result {
        log::warn!("could not open {}: {}", url, e);
    }
}
