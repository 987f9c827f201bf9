// app/mod.rs - Iced Daemon Application
//
// Owns the search panel window and every overlay window. User input arrives
// as `Message`s; panel handlers answer with `PanelCommand`s, which are turned
// into window tasks here. Everything runs on the UI thread.

mod view;

use std::collections::BTreeMap;

use iced::keyboard::{self, key::Named, Key};
use iced::{event, mouse, window, Event, Point, Size, Subscription, Task, Theme};
use log::{debug, info};

use crate::constants::{layout, panel as panel_const};
use crate::overlay::{OverlayWindow, PointerAction};
use crate::panel::{OverlayRole, PanelCommand, SearchPanel};

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowType {
    Panel,
    Overlay(OverlayRole),
}

#[derive(Debug, Clone)]
pub enum Message {
    PanelOpened(window::Id),
    OverlayOpened(window::Id),
    Window(window::Id, window::Event),

    // Search panel
    SearchChanged(String),
    SuggestionPicked(String),
    Submit,
    ZoomChanged(u8),
    ZoomStep(bool),
    CloseOverlays,
    ToggleSlider,
    ChangeSlider,

    // Overlay pointer input
    CursorMoved(window::Id, Point),
    CursorLeft(window::Id),
    LeftPressed(window::Id),
    LeftReleased(window::Id),
}

// ============================================================================
// Application State
// ============================================================================

pub struct StaffChartApp {
    windows: BTreeMap<window::Id, WindowType>,
    panel: SearchPanel,
}

impl StaffChartApp {
    pub fn new(panel: SearchPanel) -> (Self, Task<Message>) {
        let settings = window::Settings {
            size: Size::new(panel_const::WIDTH, panel_const::HEIGHT),
            position: window::Position::Centered,
            decorations: true,
            resizable: false,
            ..Default::default()
        };
        let (id, open_task) = window::open(settings);

        let mut windows = BTreeMap::new();
        windows.insert(id, WindowType::Panel);

        let app = Self { windows, panel };
        (app, open_task.map(Message::PanelOpened))
    }

    pub fn title(&self, window_id: window::Id) -> String {
        match self.windows.get(&window_id) {
            Some(WindowType::Panel) => panel_const::TITLE.to_string(),
            Some(WindowType::Overlay(role)) => self
                .panel
                .overlay(*role)
                .map(|overlay| overlay.title().to_string())
                .unwrap_or_default(),
            None => panel_const::TITLE.to_string(),
        }
    }

    fn overlay_id(&self, role: OverlayRole) -> Option<window::Id> {
        self.windows
            .iter()
            .find(|(_, kind)| **kind == WindowType::Overlay(role))
            .map(|(id, _)| *id)
    }

    fn overlay_role(&self, id: window::Id) -> Option<OverlayRole> {
        match self.windows.get(&id) {
            Some(WindowType::Overlay(role)) => Some(*role),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Panel commands -> window tasks
    // ------------------------------------------------------------------

    fn run(&mut self, commands: Vec<PanelCommand>) -> Task<Message> {
        let tasks: Vec<_> = commands
            .into_iter()
            .map(|command| self.run_command(command))
            .collect();
        Task::batch(tasks)
    }

    fn run_command(&mut self, command: PanelCommand) -> Task<Message> {
        match command {
            PanelCommand::Open(role) => {
                let Some(overlay) = self.panel.overlay(role) else {
                    return Task::none();
                };
                let (id, open_task) = window::open(overlay.window_settings());
                self.windows.insert(id, WindowType::Overlay(role));
                info!("Opening {:?} overlay as {:?}", role, id);
                open_task.map(Message::OverlayOpened)
            }
            PanelCommand::Close(role) => match self.overlay_id(role) {
                Some(id) => {
                    self.windows.remove(&id);
                    window::close(id)
                }
                None => Task::none(),
            },
            PanelCommand::Resize(role, size) => match self.overlay_id(role) {
                Some(id) => window::resize(id, size),
                None => Task::none(),
            },
            PanelCommand::ShowDialog(message) => {
                debug!("Showing error dialog: {}", message);
                let _ = rfd::MessageDialog::new()
                    .set_level(rfd::MessageLevel::Error)
                    .set_title("Error")
                    .set_description(message)
                    .set_buttons(rfd::MessageButtons::Ok)
                    .show();
                Task::none()
            }
        }
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PanelOpened(id) => {
                info!("Search panel opened: {:?}", id);
                window::gain_focus(id)
            }

            Message::OverlayOpened(id) => {
                if let Some(role) = self.overlay_role(id) {
                    if let Some(overlay) = self.panel.open_overlay_mut(role) {
                        overlay.show();
                    }
                }
                Task::none()
            }

            Message::Window(id, event) => self.window_event(id, event),

            Message::SearchChanged(text) => {
                self.panel.set_search_text(text);
                Task::none()
            }
            Message::SuggestionPicked(key) => {
                self.panel.select_suggestion(key);
                Task::none()
            }
            Message::Submit => {
                let commands = self.panel.submit();
                self.run(commands)
            }
            Message::ZoomChanged(percent) => {
                let commands = self.panel.set_zoom(percent);
                self.run(commands)
            }
            Message::ZoomStep(up) => {
                let commands = self.panel.step_zoom(up);
                self.run(commands)
            }
            Message::CloseOverlays => {
                let commands = self.panel.close_all();
                self.run(commands)
            }
            Message::ToggleSlider => {
                let commands = self.panel.toggle_slider();
                self.run(commands)
            }
            Message::ChangeSlider => {
                if let Some(path) = rfd::FileDialog::new()
                    .set_title("Choose slider image")
                    .add_filter("Image files", layout::SLIDER_EXTENSIONS)
                    .set_directory(self.panel.slider_dir())
                    .pick_file()
                {
                    self.panel.set_slider_path(path);
                }
                Task::none()
            }

            Message::CursorMoved(id, position) => self.pointer_moved(id, position),
            Message::CursorLeft(id) => {
                if let Some(overlay) = self.overlay_for(id) {
                    overlay.pointer_left();
                }
                Task::none()
            }
            Message::LeftPressed(id) => {
                let action = match self.overlay_for(id) {
                    Some(overlay) => overlay.pointer_pressed(),
                    None => PointerAction::None,
                };
                match action {
                    PointerAction::DragMove => window::drag(id),
                    _ => Task::none(),
                }
            }
            Message::LeftReleased(id) => {
                if let Some(overlay) = self.overlay_for(id) {
                    overlay.pointer_released();
                }
                Task::none()
            }
        }
    }

    fn overlay_for(&mut self, id: window::Id) -> Option<&mut OverlayWindow> {
        let role = self.overlay_role(id)?;
        self.panel.open_overlay_mut(role)
    }

    fn pointer_moved(&mut self, id: window::Id, position: Point) -> Task<Message> {
        let Some(overlay) = self.overlay_for(id) else {
            return Task::none();
        };
        match overlay.pointer_moved(position) {
            PointerAction::Resize { position, size } => {
                let mut tasks = vec![window::resize(id, size)];
                if overlay.position_known() {
                    tasks.push(window::move_to(id, position));
                }
                Task::batch(tasks)
            }
            _ => Task::none(),
        }
    }

    fn window_event(&mut self, id: window::Id, event: window::Event) -> Task<Message> {
        match event {
            window::Event::Opened { position, size } => {
                if let Some(overlay) = self.overlay_for(id) {
                    overlay.opened(position, size);
                }
            }
            window::Event::Moved(position) => {
                if let Some(overlay) = self.overlay_for(id) {
                    overlay.moved(position);
                }
            }
            window::Event::Resized(size) => {
                if let Some(overlay) = self.overlay_for(id) {
                    debug!("{} resized to {}x{}", overlay.title(), size.width, size.height);
                    overlay.resized(size);
                }
            }
            window::Event::Closed => return self.window_closed(id),
            _ => {}
        }
        Task::none()
    }

    fn window_closed(&mut self, id: window::Id) -> Task<Message> {
        // Windows we closed ourselves were already forgotten
        let Some(kind) = self.windows.remove(&id) else {
            return Task::none();
        };

        match kind {
            WindowType::Overlay(role) => {
                info!("{:?} overlay window closed externally", role);
                self.panel.overlay_closed(role);
                Task::none()
            }
            WindowType::Panel => {
                info!("Search panel closed, shutting down");
                let commands = self.panel.close_all();
                debug!("Closing {} overlay window(s)", commands.len());
                let close_overlays = self.run(commands);
                Task::batch([close_overlays, iced::exit()])
            }
        }
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            window::events().map(|(id, event)| Message::Window(id, event)),
            event::listen_with(pointer_event),
            keyboard::on_key_press(|key, _modifiers| match key.as_ref() {
                Key::Named(Named::PageUp) => Some(Message::ZoomStep(true)),
                Key::Named(Named::PageDown) => Some(Message::ZoomStep(false)),
                _ => None,
            }),
        ])
    }

    pub fn theme(&self, _window_id: window::Id) -> Theme {
        Theme::Dark
    }
}

/// Mouse events of every window; overlays decide what to do with them
fn pointer_event(event: Event, _status: event::Status, id: window::Id) -> Option<Message> {
    match event {
        Event::Mouse(mouse::Event::CursorMoved { position }) => Some(Message::CursorMoved(id, position)),
        Event::Mouse(mouse::Event::CursorLeft) => Some(Message::CursorLeft(id)),
        Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => Some(Message::LeftPressed(id)),
        Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
            Some(Message::LeftReleased(id))
        }
        _ => None,
    }
}
