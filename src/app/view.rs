// app/view.rs - Window Views
//
// The search panel is an ordinary opaque window. Overlays draw the scaled
// bitmap at its pixel size on a transparent surface and nothing else.

use iced::widget::{button, column, container, mouse_area, pick_list, row, slider, text, text_input, Space};
use iced::{mouse, window, Alignment, ContentFit, Element, Length};

use super::{Message, StaffChartApp, WindowType};
use crate::constants::zoom;
use crate::lookup::LookupMode;
use crate::overlay::HitZone;
use crate::panel::{OverlayRole, Status};

// Color palette (dark theme)
mod colors {
    use iced::Color;

    pub const BG_PRIMARY: Color = Color::from_rgb(0.09, 0.09, 0.12);
    pub const ERROR: Color = Color::from_rgb(0.9, 0.3, 0.35);
    pub const INFO: Color = Color::from_rgb(0.2, 0.75, 0.45);
    pub const TEXT_MUTED: Color = Color::from_rgba(1.0, 1.0, 1.0, 0.4);
}

impl StaffChartApp {
    pub fn view(&self, window_id: window::Id) -> Element<'_, Message> {
        match self.windows.get(&window_id) {
            Some(WindowType::Panel) => self.view_panel(),
            Some(WindowType::Overlay(role)) => self.view_overlay(*role),
            None => Space::new(Length::Fill, Length::Fill).into(),
        }
    }

    fn view_panel(&self) -> Element<'_, Message> {
        let input = text_input("Train no.", self.panel.search_text())
            .on_input(Message::SearchChanged)
            .on_submit(Message::Submit)
            .width(110);

        let search: Element<'_, Message> = match self.panel.lookup_mode() {
            LookupMode::Catalog => row![
                input,
                pick_list(
                    self.panel.suggestions(),
                    self.panel.selected().map(str::to_owned),
                    Message::SuggestionPicked,
                )
                .placeholder("No entries")
                .width(110),
                button(text("Show")).on_press(Message::Submit),
            ]
            .spacing(8)
            .align_y(Alignment::Center)
            .into(),
            LookupMode::FileName => row![input, button(text("Show")).on_press(Message::Submit)]
                .spacing(8)
                .align_y(Alignment::Center)
                .into(),
        };

        let status = match self.panel.status() {
            Some(Status::Error(message)) => text(message).size(12).color(colors::ERROR),
            Some(Status::Info(message)) => text(message).size(12).color(colors::INFO),
            None => text("").size(12),
        };

        let zoom_row = row![
            slider(zoom::MIN..=zoom::MAX, self.panel.zoom(), Message::ZoomChanged)
                .step(zoom::SMALL_STEP)
                .width(220),
            text(self.panel.zoom_label()).width(50),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let slider_label = if self.panel.overlay(OverlayRole::Slider).is_some() {
            "Hide slider"
        } else {
            "Show slider"
        };

        let actions = column![
            button(text("Close staff chart")).on_press(Message::CloseOverlays),
            row![
                button(text(slider_label)).on_press(Message::ToggleSlider),
                button(text("Change slider")).on_press(Message::ChangeSlider),
            ]
            .spacing(10),
        ]
        .spacing(6);

        let hint = text("PageUp / PageDown: zoom by 10%")
            .size(10)
            .color(colors::TEXT_MUTED);

        container(column![search, status, zoom_row, actions, hint].spacing(10))
            .padding(12)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_| container::Style {
                background: Some(iced::Background::Color(colors::BG_PRIMARY)),
                ..Default::default()
            })
            .into()
    }

    fn view_overlay(&self, role: OverlayRole) -> Element<'_, Message> {
        let Some(overlay) = self.panel.overlay(role) else {
            return Space::new(Length::Fill, Length::Fill).into();
        };

        // Drawn at its own pixel size; an edge-resized window shows empty margin
        let content: Element<'_, Message> = match (overlay.handle(), overlay.scaled_size()) {
            (Some(handle), Some((w, h))) => iced::widget::image(handle.clone())
                .width(Length::Fixed(w as f32))
                .height(Length::Fixed(h as f32))
                .content_fit(ContentFit::None)
                .into(),
            _ => Space::new(Length::Fill, Length::Fill).into(),
        };

        let interaction = overlay
            .hovered_zone()
            .map(HitZone::interaction)
            .unwrap_or(mouse::Interaction::Idle);

        mouse_area(container(content).width(Length::Fill).height(Length::Fill))
            .interaction(interaction)
            .into()
    }
}
