//! Dark and light palettes plus the button styles built from them.
//!
//! Value colours are grouped separately from chrome so the renderer only
//! ever needs `ValueColors`.

use iced::border::Radius;
use iced::widget::button;
use iced::widget::button::Status as ButtonStatus;
use iced::{Border, Color, Shadow, Vector};
use serde::{Deserialize, Serialize};

/// Theme choice, persisted in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AppTheme {
    #[default]
    Dark,
    Light,
}

impl AppTheme {
    pub fn toggled(self) -> Self {
        match self {
            AppTheme::Dark => AppTheme::Light,
            AppTheme::Light => AppTheme::Dark,
        }
    }
}

/// One colour per value category, plus keys and structural text
#[derive(Debug, Clone, Copy)]
pub struct ValueColors {
    pub key: Color,
    pub string: Color,
    pub number: Color,
    pub boolean: Color,
    pub null: Color,
    pub date: Color,
    pub bracket: Color,
}

#[derive(Debug, Clone, Copy)]
pub struct ButtonColors {
    pub face: Color,
    pub face_hover: Color,
    pub face_pressed: Color,
    pub face_disabled: Color,
    pub face_selected: Color,
    pub edge: Color,
    pub edge_selected: Color,
}

#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    pub values: ValueColors,
    pub buttons: ButtonColors,
    /// Background behind matched search text
    pub mark_bg: Color,
    pub mark_text: Color,
    /// Row tint of the document a search result jumped to
    pub doc_highlight: Color,
    pub background: Color,
    pub panel_bg: Color,
    pub toolbar_bg: Color,
    pub status_bar_bg: Color,
    pub error: Color,
    pub resolved: Color,
    pub link: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
}

impl ThemeColors {
    pub fn dark() -> Self {
        ThemeColors {
            values: ValueColors {
                key: Color::from_rgb(0.82, 0.84, 0.86),
                string: Color::from_rgb(0.29, 0.87, 0.50),
                number: Color::from_rgb(0.38, 0.65, 0.98),
                boolean: Color::from_rgb(0.98, 0.80, 0.08),
                null: Color::from_rgb(0.61, 0.64, 0.69),
                date: Color::from_rgb(0.75, 0.52, 0.99),
                bracket: Color::from_rgb(0.61, 0.64, 0.69),
            },
            buttons: ButtonColors {
                face: Color::from_rgb(0.22, 0.25, 0.32),
                face_hover: Color::from_rgb(0.29, 0.33, 0.39),
                face_pressed: Color::from_rgb(0.12, 0.14, 0.18),
                face_disabled: Color::from_rgb(0.17, 0.19, 0.24),
                face_selected: Color::from_rgb(0.22, 0.25, 0.32),
                edge: Color::from_rgb(0.35, 0.38, 0.45),
                edge_selected: Color::from_rgb(0.61, 0.64, 0.69),
            },
            mark_bg: Color::from_rgb(0.92, 0.70, 0.03),
            mark_text: Color::BLACK,
            doc_highlight: Color::from_rgba(0.98, 0.80, 0.08, 0.25),
            background: Color::from_rgb(0.07, 0.09, 0.15),
            panel_bg: Color::from_rgb(0.12, 0.16, 0.22),
            toolbar_bg: Color::from_rgb(0.12, 0.16, 0.22),
            status_bar_bg: Color::from_rgb(0.10, 0.12, 0.18),
            error: Color::from_rgb(0.97, 0.44, 0.44),
            resolved: Color::from_rgb(0.98, 0.80, 0.08),
            link: Color::from_rgb(0.38, 0.65, 0.98),
            text_primary: Color::WHITE,
            text_secondary: Color::from_rgb(0.61, 0.64, 0.69),
        }
    }

    pub fn light() -> Self {
        ThemeColors {
            // Darker value colours so they read on white
            values: ValueColors {
                key: Color::from_rgb(0.22, 0.25, 0.32),
                string: Color::from_rgb(0.09, 0.50, 0.24),
                number: Color::from_rgb(0.11, 0.31, 0.85),
                boolean: Color::from_rgb(0.63, 0.38, 0.03),
                null: Color::from_rgb(0.42, 0.45, 0.50),
                date: Color::from_rgb(0.49, 0.23, 0.93),
                bracket: Color::from_rgb(0.42, 0.45, 0.50),
            },
            buttons: ButtonColors {
                face: Color::from_rgb(0.90, 0.91, 0.93),
                face_hover: Color::from_rgb(0.84, 0.85, 0.88),
                face_pressed: Color::from_rgb(0.74, 0.75, 0.78),
                face_disabled: Color::from_rgb(0.94, 0.94, 0.95),
                face_selected: Color::from_rgb(0.78, 0.80, 0.84),
                edge: Color::from_rgb(0.80, 0.81, 0.84),
                edge_selected: Color::from_rgb(0.42, 0.45, 0.50),
            },
            mark_bg: Color::from_rgb(0.99, 0.88, 0.28),
            mark_text: Color::BLACK,
            doc_highlight: Color::from_rgba(0.92, 0.70, 0.03, 0.25),
            background: Color::from_rgb(0.99, 0.99, 0.99),
            panel_bg: Color::from_rgb(0.95, 0.96, 0.97),
            toolbar_bg: Color::from_rgb(0.95, 0.96, 0.97),
            status_bar_bg: Color::from_rgb(0.91, 0.92, 0.93),
            error: Color::from_rgb(0.80, 0.15, 0.15),
            resolved: Color::from_rgb(0.63, 0.38, 0.03),
            link: Color::from_rgb(0.11, 0.31, 0.85),
            text_primary: Color::from_rgb(0.07, 0.09, 0.15),
            text_secondary: Color::from_rgb(0.42, 0.45, 0.50),
        }
    }
}

pub fn get_theme_colors(theme: AppTheme) -> ThemeColors {
    match theme {
        AppTheme::Dark => ThemeColors::dark(),
        AppTheme::Light => ThemeColors::light(),
    }
}

fn framed(face: Color, text_color: Color, edge: Color, shadow: Shadow) -> button::Style {
    button::Style {
        background: Some(face.into()),
        text_color,
        border: Border {
            color: edge,
            width: 1.0,
            radius: Radius::from(4.0),
        },
        shadow,
        snap: true,
    }
}

/// Raised button for actions
pub fn button_3d_style_themed(colors: ThemeColors) -> impl Fn(&iced::Theme, ButtonStatus) -> button::Style {
    move |_theme: &iced::Theme, status: ButtonStatus| {
        let b = colors.buttons;
        let lift = Shadow {
            color: Color::from_rgba(0.0, 0.0, 0.0, 0.3),
            offset: Vector::new(0.0, 2.0),
            blur_radius: 3.0,
        };
        match status {
            ButtonStatus::Active => framed(b.face, colors.text_primary, b.edge, lift),
            ButtonStatus::Hovered => framed(b.face_hover, colors.text_primary, b.edge, lift),
            ButtonStatus::Pressed => framed(b.face_pressed, colors.text_secondary, b.face_pressed, Shadow::default()),
            ButtonStatus::Disabled => framed(b.face_disabled, colors.text_secondary, b.face_disabled, Shadow::default()),
        }
    }
}

/// Flat tab; the selected one keeps its frame in every state
pub fn button_tab_style_themed(selected: bool, colors: ThemeColors) -> impl Fn(&iced::Theme, ButtonStatus) -> button::Style {
    move |_theme: &iced::Theme, status: ButtonStatus| {
        let b = colors.buttons;
        let (face, text_color, edge) = match (selected, status) {
            (_, ButtonStatus::Disabled) => (b.face_disabled, colors.text_secondary, b.face_disabled),
            (true, _) => (b.face_selected, colors.text_primary, b.edge_selected),
            (false, ButtonStatus::Active) => (colors.toolbar_bg, colors.text_secondary, colors.toolbar_bg),
            (false, ButtonStatus::Hovered) => (b.face_hover, colors.text_primary, b.edge),
            (false, ButtonStatus::Pressed) => (b.face_pressed, colors.text_secondary, b.face_pressed),
        };
        framed(face, text_color, edge, Shadow::default())
    }
}

/// Borderless text button in a fixed colour (row actions, links)
pub fn button_link_style(color: Color) -> impl Fn(&iced::Theme, ButtonStatus) -> button::Style {
    move |_theme: &iced::Theme, status: ButtonStatus| {
        let alpha = match status {
            ButtonStatus::Hovered | ButtonStatus::Pressed => 1.0,
            ButtonStatus::Active => 0.8,
            ButtonStatus::Disabled => 0.4,
        };
        button::Style {
            background: None,
            text_color: Color { a: alpha, ..color },
            border: Border::default(),
            shadow: Shadow::default(),
            snap: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palettes_differ() {
        let dark = get_theme_colors(AppTheme::Dark);
        let light = get_theme_colors(AppTheme::Light);

        assert_ne!(dark.background, light.background);
        assert_ne!(dark.text_primary, light.text_primary);
        assert_ne!(dark.values.string, light.values.string);
    }

    #[test]
    fn test_value_categories_are_distinguishable() {
        for colors in [ThemeColors::dark(), ThemeColors::light()] {
            let v = colors.values;
            let all = [v.string, v.number, v.boolean, v.null, v.date];
            for (i, a) in all.iter().enumerate() {
                for b in &all[i + 1..] {
                    assert_ne!(a, b);
                }
            }
        }
    }

    #[test]
    fn test_toggle_theme() {
        assert_eq!(AppTheme::Dark.toggled(), AppTheme::Light);
        assert_eq!(AppTheme::Light.toggled().toggled(), AppTheme::Light);
    }
}
