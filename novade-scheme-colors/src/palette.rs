//! The semantic colors the panel consumes, and how they are extracted.
//!
//! A [`SchemePalette`] is built either from a parsed color-scheme file
//! ([`SchemePalette::from_config`]) or synthesized from a single seed color
//! ([`SchemePalette::from_seed`]). Every entry is optional: `None` means the
//! scheme did not define the color.

use crate::color::Color;
use crate::kconfig::KConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Text color used on dark surfaces.
pub const LIGHT_TEXT: Color = Color::rgb(240, 240, 240);
/// Text color used on light surfaces.
pub const DARK_TEXT: Color = Color::rgb(34, 34, 34);
/// Positive text color for synthesized palettes.
pub const SEED_POSITIVE_TEXT: Color = Color::rgb(51, 149, 255);
/// Negative text color for synthesized palettes.
pub const SEED_NEGATIVE_TEXT: Color = Color::rgb(224, 56, 62);

/// Seed luminance above which text switches to [`DARK_TEXT`].
const SEED_TEXT_THRESHOLD: f64 = 0.5;
/// Highlight luminance above which highlighted text switches to [`DARK_TEXT`].
const HIGHLIGHT_TEXT_THRESHOLD: f64 = 0.7;

const GROUP_WM: &str = "WM";
const GROUP_WINDOW: &str = "Colors:Window";
const GROUP_SELECTION: &str = "Colors:Selection";
const GROUP_BUTTON: &str = "Colors:Button";

/// Which part of the scheme provides the window background/text colors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorSource {
    /// Window-decoration colors from the `[WM]` group.
    #[default]
    WindowManager,
    /// Window colors from `[Colors:Window]`, matching the Plasma theme.
    PlasmaTheme,
}

impl fmt::Display for ColorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorSource::WindowManager => f.write_str("window-manager"),
            ColorSource::PlasmaTheme => f.write_str("plasma-theme"),
        }
    }
}

impl FromStr for ColorSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "window-manager" | "wm" => Ok(ColorSource::WindowManager),
            "plasma-theme" | "plasma" => Ok(ColorSource::PlasmaTheme),
            other => Err(format!("unknown color source '{}'", other)),
        }
    }
}

/// The semantic colors of a scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemePalette {
    pub background: Option<Color>,
    pub text: Option<Color>,
    pub inactive_background: Option<Color>,
    pub inactive_text: Option<Color>,
    pub highlight: Option<Color>,
    pub highlighted_text: Option<Color>,
    pub positive_text: Option<Color>,
    pub neutral_text: Option<Color>,
    pub negative_text: Option<Color>,
    pub button_text: Option<Color>,
    pub button_background: Option<Color>,
    pub button_hover: Option<Color>,
    pub button_focus: Option<Color>,
}

impl SchemePalette {
    /// Extracts the palette from a parsed scheme file.
    ///
    /// `source` selects where background, text and their inactive variants
    /// come from; all other colors are read from the same groups either way.
    pub fn from_config(config: &KConfig, source: ColorSource) -> Self {
        let window = config.group(GROUP_WINDOW);
        let selection = config.group(GROUP_SELECTION);

        let (background, text, inactive_background, inactive_text) = match source {
            ColorSource::WindowManager => {
                let wm = config.group(GROUP_WM);
                (
                    wm.read_color("activeBackground"),
                    wm.read_color("activeForeground"),
                    wm.read_color("inactiveBackground"),
                    wm.read_color("inactiveForeground"),
                )
            }
            ColorSource::PlasmaTheme => (
                window.read_color("BackgroundNormal"),
                window.read_color("ForegroundNormal"),
                window.read_color("BackgroundAlternate"),
                window.read_color("ForegroundInactive"),
            ),
        };

        let mut palette = SchemePalette {
            background,
            text,
            inactive_background,
            inactive_text,
            highlight: selection.read_color("BackgroundNormal"),
            highlighted_text: selection.read_color("ForegroundNormal"),
            positive_text: window.read_color("ForegroundPositive"),
            neutral_text: window.read_color("ForegroundNeutral"),
            negative_text: window.read_color("ForegroundNegative"),
            ..SchemePalette::default()
        };
        palette.read_button_colors(config);
        palette
    }

    /// Synthesizes a palette around `seed`.
    ///
    /// Text colors are picked by luminance, inactive colors are the seed's
    /// [`Color::inactive_gray`], and button colors come from `fallback`'s
    /// `[Colors:Button]` group. The highlight is the fallback's button focus
    /// color; an undefined highlight counts as black when choosing its text.
    pub fn from_seed(seed: Color, fallback: &KConfig) -> Self {
        let text = if seed.perceptive_luminance() > SEED_TEXT_THRESHOLD { DARK_TEXT } else { LIGHT_TEXT };
        let inactive = seed.inactive_gray();

        let mut palette = SchemePalette {
            background: Some(seed),
            text: Some(text),
            inactive_background: Some(inactive),
            inactive_text: Some(inactive),
            positive_text: Some(SEED_POSITIVE_TEXT),
            neutral_text: Some(text),
            negative_text: Some(SEED_NEGATIVE_TEXT),
            ..SchemePalette::default()
        };
        palette.read_button_colors(fallback);

        palette.highlight = palette.button_focus;
        let highlight_luminance = palette.highlight.unwrap_or_default().perceptive_luminance();
        palette.highlighted_text = Some(if highlight_luminance > HIGHLIGHT_TEXT_THRESHOLD {
            DARK_TEXT
        } else {
            LIGHT_TEXT
        });
        palette
    }

    fn read_button_colors(&mut self, config: &KConfig) {
        let button = config.group(GROUP_BUTTON);
        self.button_text = button.read_color("ForegroundNormal");
        self.button_background = button.read_color("BackgroundNormal");
        self.button_hover = button.read_color("DecorationHover");
        self.button_focus = button.read_color("DecorationFocus");
    }

    /// Number of colors the scheme defines, out of 13.
    pub fn defined_count(&self) -> usize {
        self.entries().iter().filter(|(_, c)| c.is_some()).count()
    }

    /// All colors with stable, human-readable names, in display order.
    pub fn entries(&self) -> [(&'static str, Option<Color>); 13] {
        [
            ("background", self.background),
            ("text", self.text),
            ("inactive_background", self.inactive_background),
            ("inactive_text", self.inactive_text),
            ("highlight", self.highlight),
            ("highlighted_text", self.highlighted_text),
            ("positive_text", self.positive_text),
            ("neutral_text", self.neutral_text),
            ("negative_text", self.negative_text),
            ("button_text", self.button_text),
            ("button_background", self.button_background),
            ("button_hover", self.button_hover),
            ("button_focus", self.button_focus),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SCHEME: &str = r#"
[Colors:Button]
BackgroundNormal=49,54,59
DecorationFocus=61,174,233
DecorationHover=147,206,233
ForegroundNormal=252,252,252

[Colors:Selection]
BackgroundNormal=61,174,233
ForegroundNormal=252,252,252

[Colors:Window]
BackgroundAlternate=77,77,77
BackgroundNormal=35,38,41
ForegroundInactive=161,169,177
ForegroundNegative=218,68,83
ForegroundNeutral=246,116,0
ForegroundNormal=239,240,241
ForegroundPositive=39,174,96

[WM]
activeBackground=71,80,87
activeForeground=252,252,252
inactiveBackground=239,240,241
inactiveForeground=189,195,199
"#;

    fn shared_expected() -> SchemePalette {
        SchemePalette {
            highlight: Some(Color::rgb(61, 174, 233)),
            highlighted_text: Some(Color::rgb(252, 252, 252)),
            positive_text: Some(Color::rgb(39, 174, 96)),
            neutral_text: Some(Color::rgb(246, 116, 0)),
            negative_text: Some(Color::rgb(218, 68, 83)),
            button_text: Some(Color::rgb(252, 252, 252)),
            button_background: Some(Color::rgb(49, 54, 59)),
            button_hover: Some(Color::rgb(147, 206, 233)),
            button_focus: Some(Color::rgb(61, 174, 233)),
            ..SchemePalette::default()
        }
    }

    #[test]
    fn test_from_config_window_manager() {
        let palette = SchemePalette::from_config(&KConfig::parse(SCHEME), ColorSource::WindowManager);
        let expected = SchemePalette {
            background: Some(Color::rgb(71, 80, 87)),
            text: Some(Color::rgb(252, 252, 252)),
            inactive_background: Some(Color::rgb(239, 240, 241)),
            inactive_text: Some(Color::rgb(189, 195, 199)),
            ..shared_expected()
        };
        assert_eq!(palette, expected);
        assert_eq!(palette.defined_count(), 13);
    }

    #[test]
    fn test_from_config_plasma_theme() {
        let palette = SchemePalette::from_config(&KConfig::parse(SCHEME), ColorSource::PlasmaTheme);
        let expected = SchemePalette {
            background: Some(Color::rgb(35, 38, 41)),
            text: Some(Color::rgb(239, 240, 241)),
            inactive_background: Some(Color::rgb(77, 77, 77)),
            inactive_text: Some(Color::rgb(161, 169, 177)),
            ..shared_expected()
        };
        assert_eq!(palette, expected);
    }

    #[test]
    fn test_from_config_missing_groups() {
        let palette = SchemePalette::from_config(
            &KConfig::parse("[Colors:Window]\nForegroundPositive=1,2,3\n"),
            ColorSource::WindowManager,
        );
        assert_eq!(palette.positive_text, Some(Color::rgb(1, 2, 3)));
        assert_eq!(palette.background, None);
        assert_eq!(palette.button_focus, None);
        assert_eq!(palette.defined_count(), 1);
    }

    #[test]
    fn test_from_seed_dark_seed() {
        let seed = Color::rgb(20, 30, 40);
        let palette = SchemePalette::from_seed(seed, &KConfig::parse(SCHEME));

        assert_eq!(palette.background, Some(seed));
        assert_eq!(palette.text, Some(LIGHT_TEXT));
        assert_eq!(palette.neutral_text, Some(LIGHT_TEXT));
        // gray = (220 + 480 + 200) / 32 = 28 → 83 → floor 115
        assert_eq!(palette.inactive_background, Some(Color::rgb(115, 115, 115)));
        assert_eq!(palette.inactive_text, palette.inactive_background);
        assert_eq!(palette.positive_text, Some(SEED_POSITIVE_TEXT));
        assert_eq!(palette.negative_text, Some(SEED_NEGATIVE_TEXT));
        assert_eq!(palette.button_focus, Some(Color::rgb(61, 174, 233)));
        assert_eq!(palette.highlight, palette.button_focus);
        // Breeze blue luminance is about 0.58, below the 0.7 threshold.
        assert_eq!(palette.highlighted_text, Some(LIGHT_TEXT));
    }

    #[test]
    fn test_from_seed_light_seed_and_bright_focus() {
        let fallback = KConfig::parse("[Colors:Button]\nDecorationFocus=250,250,200\n");
        let palette = SchemePalette::from_seed(Color::rgb(230, 230, 230), &fallback);

        assert_eq!(palette.text, Some(DARK_TEXT));
        // gray 230 > 200 → darkened by 45
        assert_eq!(palette.inactive_background, Some(Color::rgb(185, 185, 185)));
        assert_eq!(palette.highlight, Some(Color::rgb(250, 250, 200)));
        assert_eq!(palette.highlighted_text, Some(DARK_TEXT));
        assert_eq!(palette.button_background, None);
    }

    #[test]
    fn test_from_seed_without_fallback() {
        let palette = SchemePalette::from_seed(Color::rgb(128, 128, 128), &KConfig::empty());
        assert_eq!(palette.highlight, None);
        // An undefined highlight is treated as black.
        assert_eq!(palette.highlighted_text, Some(LIGHT_TEXT));
        assert_eq!(palette.button_text, None);
    }

    #[test]
    fn test_seed_text_threshold_is_strict() {
        // Pure mid gray 128 has luminance ~0.502, just above 0.5.
        let palette = SchemePalette::from_seed(Color::rgb(128, 128, 128), &KConfig::empty());
        assert_eq!(palette.text, Some(DARK_TEXT));
        let palette = SchemePalette::from_seed(Color::rgb(127, 127, 127), &KConfig::empty());
        assert_eq!(palette.text, Some(LIGHT_TEXT));
    }

    #[test]
    fn test_color_source_parse_and_display() {
        assert_eq!("plasma".parse::<ColorSource>(), Ok(ColorSource::PlasmaTheme));
        assert_eq!("Window-Manager".parse::<ColorSource>(), Ok(ColorSource::WindowManager));
        assert!("neon".parse::<ColorSource>().is_err());
        assert_eq!(ColorSource::PlasmaTheme.to_string(), "plasma-theme");
        assert_eq!(ColorSource::default(), ColorSource::WindowManager);
    }
}
