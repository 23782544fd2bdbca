//! Dark-mode colour overrides for the embedded component library.
//!
//! The host theme supplies a palette and a mode. [`override_css`] renders a
//! fixed rule table against them, and [`ColorSchemeGuard`] mirrors the mode
//! onto the document body for as long as the guard lives.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ports::DocumentBody;

/// Body attribute owned by the plugin.
pub const IK_SCHEME_ATTRIBUTE: &str = "data-ik-color-scheme";

/// Body attribute read by the component library.
pub const MUI_SCHEME_ATTRIBUTE: &str = "data-mui-color-scheme";

const DARK_SCOPE: &str = "[data-mui-color-scheme=\"dark\"]";
const DARK_PAPER_BORDER: &str = "rgba(255, 255, 255, 0.12)";
const LIGHT_PAPER_BORDER: &str = "rgba(0, 0, 0, 0.12)";

/// Resolved colour scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light scheme; the fallback for anything not explicitly dark.
    #[default]
    Light,
    /// Dark scheme.
    Dark,
}

impl ThemeMode {
    /// Resolve the host palette type or mode string.
    ///
    /// # Examples
    /// ```
    /// use infrakitchen::domain::ThemeMode;
    ///
    /// assert_eq!(ThemeMode::resolve(Some("dark")), ThemeMode::Dark);
    /// assert_eq!(ThemeMode::resolve(Some("contrast")), ThemeMode::Light);
    /// assert_eq!(ThemeMode::resolve(None), ThemeMode::Light);
    /// ```
    pub fn resolve(palette_type: Option<&str>) -> Self {
        match palette_type {
            Some("dark") => Self::Dark,
            _ => Self::Light,
        }
    }

    /// Value written to the body `data-*` attributes.
    pub const fn data_value(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Host palette colours. Missing entries fall back to the plugin defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Palette {
    /// Primary text colour.
    pub text_primary: Option<String>,
    /// Secondary text colour.
    pub text_secondary: Option<String>,
    /// Paper background colour.
    pub background_paper: Option<String>,
    /// Divider colour; dark paper borders fall back to a translucent white.
    pub divider: Option<String>,
    /// Primary accent colour.
    pub primary_main: Option<String>,
}

impl Palette {
    /// Default primary text colour.
    pub const DEFAULT_TEXT_PRIMARY: &'static str = "#f7f9fc";
    /// Default secondary text colour.
    pub const DEFAULT_TEXT_SECONDARY: &'static str = "rgba(255, 255, 255, 0.6)";
    /// Default paper background colour.
    pub const DEFAULT_BACKGROUND_PAPER: &'static str = "#0b1220";
    /// Default primary accent colour.
    pub const DEFAULT_PRIMARY_MAIN: &'static str = "#4e9bff";

    fn text_primary(&self) -> &str {
        self.text_primary
            .as_deref()
            .unwrap_or(Self::DEFAULT_TEXT_PRIMARY)
    }

    fn text_secondary(&self) -> &str {
        self.text_secondary
            .as_deref()
            .unwrap_or(Self::DEFAULT_TEXT_SECONDARY)
    }

    fn background_paper(&self) -> &str {
        self.background_paper
            .as_deref()
            .unwrap_or(Self::DEFAULT_BACKGROUND_PAPER)
    }

    fn primary_main(&self) -> &str {
        self.primary_main
            .as_deref()
            .unwrap_or(Self::DEFAULT_PRIMARY_MAIN)
    }

    fn paper_border(&self, mode: ThemeMode) -> &str {
        match mode {
            ThemeMode::Dark => self.divider.as_deref().unwrap_or(DARK_PAPER_BORDER),
            ThemeMode::Light => LIGHT_PAPER_BORDER,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    TextPrimary,
    TextSecondary,
    Paper,
    Primary,
    PaperBorder,
    Literal(&'static str),
}

impl Tone {
    fn resolve<'a>(self, mode: ThemeMode, palette: &'a Palette) -> &'a str {
        match self {
            Self::TextPrimary => palette.text_primary(),
            Self::TextSecondary => palette.text_secondary(),
            Self::Paper => palette.background_paper(),
            Self::Primary => palette.primary_main(),
            Self::PaperBorder => palette.paper_border(mode),
            Self::Literal(value) => value,
        }
    }
}

struct Rule {
    selectors: &'static [&'static str],
    dark_only: bool,
    declarations: &'static [(&'static str, Tone)],
}

const fn dark(
    selectors: &'static [&'static str],
    declarations: &'static [(&'static str, Tone)],
) -> Rule {
    Rule {
        selectors,
        dark_only: true,
        declarations,
    }
}

const COLOR_PRIMARY: &[(&str, Tone)] = &[("color", Tone::TextPrimary)];
const COLOR_SECONDARY: &[(&str, Tone)] = &[("color", Tone::TextSecondary)];
const SURFACE: &[(&str, Tone)] = &[
    ("background-color", Tone::Paper),
    ("color", Tone::TextPrimary),
];

static RULES: &[Rule] = &[
    dark(
        &[".MuiTypography-body1", ".MuiTypography-body2"],
        COLOR_PRIMARY,
    ),
    dark(
        &[".MuiTypography-body2"],
        &[("opacity", Tone::Literal("0.6"))],
    ),
    dark(&[".MuiCard-root"], SURFACE),
    Rule {
        selectors: &[".MuiPaper-root"],
        dark_only: false,
        declarations: &[("border", Tone::PaperBorder)],
    },
    dark(&[".MuiPaper-root"], SURFACE),
    dark(&[".MuiInputBase-root"], COLOR_PRIMARY),
    dark(&[".MuiInputLabel-root"], COLOR_SECONDARY),
    dark(&[".MuiFormHelperText-root"], COLOR_SECONDARY),
    dark(
        &[".MuiChip-root"],
        &[
            ("background-color", Tone::Literal("rgba(255, 255, 255, 0.08)")),
            ("color", Tone::TextPrimary),
            ("border-color", Tone::Literal("rgba(255, 255, 255, 0.23)")),
        ],
    ),
    dark(&[".MuiChip-deleteIcon"], COLOR_SECONDARY),
    dark(&[".MuiChip-deleteIcon:hover"], COLOR_PRIMARY),
    dark(
        &[
            ".MuiMenuItem-root",
            ".MuiListItemButton-root",
            ".MuiListItem-root",
            ".MuiAutocomplete-option",
            ".MuiDataGrid-columnsManagementRow",
        ],
        COLOR_PRIMARY,
    ),
    dark(
        &[".MuiOutlinedInput-notchedOutline"],
        &[("border-color", Tone::Literal("rgba(255, 255, 255, 0.23)"))],
    ),
    dark(
        &[".MuiOutlinedInput-root:hover .MuiOutlinedInput-notchedOutline"],
        &[("border-color", Tone::Literal("rgba(255, 255, 255, 0.4)"))],
    ),
    dark(
        &[".MuiOutlinedInput-root.Mui-focused .MuiOutlinedInput-notchedOutline"],
        &[("border-color", Tone::Primary)],
    ),
    dark(
        &[
            ".MuiAutocomplete-popupIndicator svg",
            ".MuiSelect-icon",
            ".MuiIconButton-root svg",
            ".MuiButton-root svg",
            ".MuiDataGrid-panelWrapper .MuiSvgIcon-root",
            ".MuiDataGrid-panelWrapper svg",
        ],
        COLOR_PRIMARY,
    ),
    dark(
        &[
            ".MuiButton-root.Mui-disabled",
            ".MuiIconButton-root.Mui-disabled",
            ".MuiButtonBase-root.Mui-disabled",
        ],
        &[
            ("color", Tone::TextSecondary),
            ("border-color", Tone::TextSecondary),
        ],
    ),
    dark(
        &[
            ".MuiFormControlLabel-root.Mui-disabled .MuiFormControlLabel-label",
            ".MuiFormControlLabel-root .Mui-disabled",
        ],
        COLOR_SECONDARY,
    ),
    dark(&[".MuiCheckbox-root"], COLOR_SECONDARY),
    dark(
        &[
            ".MuiCheckbox-root.Mui-disabled",
            ".MuiCheckbox-root.Mui-disabled .MuiSvgIcon-root",
        ],
        COLOR_SECONDARY,
    ),
    dark(&[".MuiCheckbox-root.Mui-checked"], &[("color", Tone::Primary)]),
    dark(
        &[".MuiDataGrid-root"],
        &[
            ("background-color", Tone::Paper),
            ("color", Tone::TextPrimary),
            ("border-color", Tone::Literal("rgba(255, 255, 255, 0.12)")),
        ],
    ),
    dark(
        &[
            ".MuiDataGrid-columnHeaders",
            ".MuiDataGrid-columnHeader",
            ".MuiDataGrid-row",
            ".MuiDataGrid-cell",
            ".MuiDataGrid-footerContainer",
            ".MuiDataGrid-columnsManagementHeader",
            ".MuiDataGrid-panelWrapper",
        ],
        SURFACE,
    ),
    dark(
        &[".MuiDataGrid-overlay"],
        &[
            ("background-color", Tone::Literal("transparent")),
            ("color", Tone::TextSecondary),
        ],
    ),
    dark(
        &[".MuiDataGrid-columnHeader .MuiDataGrid-sortButton"],
        &[("background-color", Tone::Literal("transparent"))],
    ),
    dark(
        &[".MuiDataGrid-columnSeparator", ".MuiDataGrid-iconSeparator"],
        &[("color", Tone::Literal("transparent"))],
    ),
    dark(
        &[".MuiDataGrid-withBorderColor"],
        &[("border-color", Tone::Literal("transparent"))],
    ),
    dark(
        &[
            ".MuiTablePagination-selectLabel",
            ".MuiTablePagination-displayedRows",
        ],
        COLOR_SECONDARY,
    ),
];

impl Rule {
    fn render_into(&self, css: &mut String, mode: ThemeMode, palette: &Palette) {
        for (index, selector) in self.selectors.iter().enumerate() {
            if index > 0 {
                css.push_str(",\n");
            }
            if self.dark_only {
                css.push_str(DARK_SCOPE);
                css.push(' ');
            }
            css.push_str(selector);
        }
        css.push_str(" {\n");
        for (property, tone) in self.declarations {
            css.push_str("  ");
            css.push_str(property);
            css.push_str(": ");
            if *property == "border" {
                css.push_str("1px solid ");
            }
            css.push_str(tone.resolve(mode, palette));
            css.push_str(";\n");
        }
        css.push_str("}\n");
    }
}

/// Render the override stylesheet for `mode` and `palette`.
///
/// Every rule except the paper border is scoped to the dark scheme; the paper
/// border applies in both modes with a mode-dependent colour.
pub fn override_css(mode: ThemeMode, palette: &Palette) -> String {
    let mut css = String::new();
    for (index, rule) in RULES.iter().enumerate() {
        if index > 0 {
            css.push('\n');
        }
        rule.render_into(&mut css, mode, palette);
    }
    css
}

/// Mirrors a [`ThemeMode`] onto the document body until dropped.
///
/// On drop each attribute is restored to its prior value, or removed when it
/// was absent or empty before.
#[derive(Debug)]
pub struct ColorSchemeGuard<'a, B: DocumentBody> {
    body: &'a mut B,
    previous_ik: Option<String>,
    previous_mui: Option<String>,
}

impl<'a, B: DocumentBody> ColorSchemeGuard<'a, B> {
    /// Write `mode` to both scheme attributes of `body`.
    pub fn apply(body: &'a mut B, mode: ThemeMode) -> Self {
        let previous_ik = body.attribute(IK_SCHEME_ATTRIBUTE);
        let previous_mui = body.attribute(MUI_SCHEME_ATTRIBUTE);
        body.set_attribute(IK_SCHEME_ATTRIBUTE, mode.data_value());
        body.set_attribute(MUI_SCHEME_ATTRIBUTE, mode.data_value());
        debug!(mode = mode.data_value(), "applied colour scheme to document body");
        Self {
            body,
            previous_ik,
            previous_mui,
        }
    }
}

fn restore<B: DocumentBody>(body: &mut B, name: &str, previous: Option<&str>) {
    match previous.filter(|value| !value.is_empty()) {
        Some(value) => body.set_attribute(name, value),
        None => body.remove_attribute(name),
    }
}

impl<B: DocumentBody> Drop for ColorSchemeGuard<'_, B> {
    fn drop(&mut self) {
        restore(&mut *self.body, IK_SCHEME_ATTRIBUTE, self.previous_ik.as_deref());
        restore(&mut *self.body, MUI_SCHEME_ATTRIBUTE, self.previous_mui.as_deref());
    }
}
