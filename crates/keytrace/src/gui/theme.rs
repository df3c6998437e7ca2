use gtk::gdk;
use gtk4 as gtk;
use keytrace_core::fade::FadeState;
use keytrace_core::settings::{KeyShape, KeyboardSettings, KeyboardTheme};
use strum::IntoEnumIterator;

struct Palette {
    window: &'static str,
    key: &'static str,
    border: &'static str,
}

fn palette(theme: KeyboardTheme) -> Palette {
    match theme {
        KeyboardTheme::Dark => Palette {
            window: "#14141f",
            key: "#2a2a3d",
            border: "#3c3c55",
        },
        KeyboardTheme::Light => Palette {
            window: "#f4f4f6",
            key: "#ffffff",
            border: "#c8c8d0",
        },
        KeyboardTheme::Neon => Palette {
            window: "#05050d",
            key: "#0d0d1f",
            border: "#1f1f3a",
        },
    }
}

fn corner_radius(shape: KeyShape) -> &'static str {
    match shape {
        KeyShape::Rounded => "8px",
        KeyShape::Square => "0",
        KeyShape::Circular => "9999px",
    }
}

pub fn stylesheet(settings: &KeyboardSettings) -> String {
    let colors = palette(settings.theme);
    let primary = settings.primary_color;
    let hover = settings.hover_color;
    let text = settings.text_color;
    let radius = corner_radius(settings.key_shape);

    let depth = if settings.three_d {
        "box-shadow: 0 4px 0 rgba(0, 0, 0, 0.45);"
    } else {
        "box-shadow: none;"
    };
    let neon = if settings.theme == KeyboardTheme::Neon {
        format!("box-shadow: 0 0 8px {primary}; border-color: {primary};")
    } else {
        String::new()
    };

    let mut css = format!(
        "
.keytrace-window {{
    background-color: {window};
}}
.keytrace-drawing-area {{
    background: none;
    background-color: transparent;
}}
.keytrace-text {{
    color: {text};
    font-size: 20px;
}}
.keyboard {{
    transition: opacity 500ms ease-in-out;
}}
.key {{
    min-width: 48px;
    min-height: 48px;
    background-color: {key};
    border: 2px solid {border};
    border-radius: {radius};
    color: {text};
    font-weight: bold;
    {depth}
    {neon}
    transition: background-color 100ms;
}}
.key:hover {{
    background-color: {hover};
}}
.key.pressed {{
    background-color: {primary};
    border-color: {primary};
}}
",
        window = colors.window,
        key = colors.key,
        border = colors.border,
    );

    for state in FadeState::iter() {
        css.push_str(&format!(
            ".keyboard.fade-{state} {{ opacity: {}; }}\n",
            state.opacity()
        ));
    }
    css
}

pub fn load_css(settings: &KeyboardSettings) -> gtk::CssProvider {
    let provider = gtk::CssProvider::new();
    provider.load_from_data(&stylesheet(settings));

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
    provider
}

pub fn reload_css(provider: &gtk::CssProvider, settings: &KeyboardSettings) {
    provider.load_from_data(&stylesheet(settings));
}

#[cfg(test)]
mod tests {
    use super::*;
    use keytrace_core::settings::Color;

    #[test]
    fn test_shape_and_depth() {
        let settings = KeyboardSettings {
            key_shape: KeyShape::Circular,
            three_d: true,
            ..KeyboardSettings::default()
        };
        let css = stylesheet(&settings);
        assert!(css.contains("border-radius: 9999px;"));
        assert!(css.contains("0 4px 0"));

        let flat = stylesheet(&KeyboardSettings::default());
        assert!(flat.contains("border-radius: 8px;"));
        assert!(flat.contains("box-shadow: none;"));
    }

    #[test]
    fn test_colors_and_fade_rules() {
        let settings = KeyboardSettings {
            theme: KeyboardTheme::Neon,
            primary_color: Color::rgb(0xff, 0x00, 0xaa),
            ..KeyboardSettings::default()
        };
        let css = stylesheet(&settings);
        assert!(css.contains("box-shadow: 0 0 8px #ff00aa;"));
        assert!(css.contains(".keyboard.fade-active { opacity: 1; }"));
        assert!(css.contains(".keyboard.fade-fading { opacity: 0.3; }"));
        assert!(css.contains(".keyboard.fade-confirmed { opacity: 0.1; }"));
    }
}
