use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ModalError;
use crate::merge::{extend, Merge};

/// Visual and semantic category of an alert modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Success,
    Warning,
    #[default]
    Danger,
    Light,
    Dark,
}

impl Variant {
    pub const ALL: [Variant; 5] = [
        Variant::Danger,
        Variant::Warning,
        Variant::Success,
        Variant::Dark,
        Variant::Light,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Success => "success",
            Variant::Warning => "warning",
            Variant::Danger => "danger",
            Variant::Light => "light",
            Variant::Dark => "dark",
        }
    }

    /// Title used by the named factories when the caller gives none.
    pub fn default_title(&self) -> &'static str {
        match self {
            Variant::Success => "Success",
            Variant::Warning => "Warning",
            Variant::Danger => "Danger",
            Variant::Light | Variant::Dark => "Message",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = ModalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|variant| variant.as_str() == s)
            .ok_or_else(|| ModalError::InvalidConfiguration(format!("unknown modal type `{}`", s)))
    }
}

/// Loading indicator style. Setting one turns the modal into a loading dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpinnerKind {
    Circle,
    Gear,
    Gears,
    Hourglass,
    #[serde(rename = "iphone-1")]
    Iphone1,
    #[serde(rename = "iphone-2")]
    Iphone2,
    Search,
    #[default]
    Spinner,
}

impl SpinnerKind {
    pub const ALL: [SpinnerKind; 8] = [
        SpinnerKind::Circle,
        SpinnerKind::Gear,
        SpinnerKind::Gears,
        SpinnerKind::Hourglass,
        SpinnerKind::Iphone1,
        SpinnerKind::Iphone2,
        SpinnerKind::Search,
        SpinnerKind::Spinner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpinnerKind::Circle => "circle",
            SpinnerKind::Gear => "gear",
            SpinnerKind::Gears => "gears",
            SpinnerKind::Hourglass => "hourglass",
            SpinnerKind::Iphone1 => "iphone-1",
            SpinnerKind::Iphone2 => "iphone-2",
            SpinnerKind::Search => "search",
            SpinnerKind::Spinner => "spinner",
        }
    }
}

impl fmt::Display for SpinnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpinnerKind {
    type Err = ModalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SpinnerKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ModalError::InvalidConfiguration(format!("unknown spinner `{}`", s)))
    }
}

/// Effective configuration of a modal.
///
/// Keys on the wire are the ones page scripts already use: `type`, `class`,
/// `title`, `message`, `closable` and `spinner`. `message` and `title` are
/// inserted into the markup as-is, sanitizing untrusted content is up to the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "type")]
    pub variant: Variant,
    #[serde(rename = "class")]
    pub style_class: Option<String>,
    pub title: String,
    pub message: String,
    pub closable: bool,
    pub spinner: Option<SpinnerKind>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            variant: Variant::Danger,
            style_class: None,
            title: "Alert".to_string(),
            message: "Modal message".to_string(),
            closable: true,
            spinner: None,
        }
    }
}

impl Config {
    /// Deep-merges dynamic partials over the defaults and decodes the result.
    ///
    /// Unknown keys are carried through the merge and dropped on decode;
    /// unknown `type` or `spinner` identifiers are rejected.
    pub fn from_partials(partials: &[Option<&Value>]) -> Result<Self, ModalError> {
        let base = serde_json::to_value(Config::default())?;
        let merged = extend(Some(base), partials);
        Ok(serde_json::from_value(merged)?)
    }

    pub fn from_patch(patch: ConfigPatch) -> Self {
        let mut config = Config::default();
        config.merge(patch);
        config
    }

    pub fn is_loading(&self) -> bool {
        self.spinner.is_some()
    }

    /// Whether the user gets a close affordance. Loading dialogs never do.
    pub fn is_dismissible(&self) -> bool {
        self.closable && !self.is_loading()
    }
}

/// Typed partial configuration, every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigPatch {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
    #[serde(rename = "class", skip_serializing_if = "Option::is_none")]
    pub style_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spinner: Option<SpinnerKind>,
}

impl ConfigPatch {
    /// Patch used by the variant factories: `{type, title, message, closable}`.
    pub fn alert(variant: Variant, message: impl Into<String>, title: Option<String>, closable: Option<bool>) -> Self {
        ConfigPatch {
            variant: Some(variant),
            title: Some(title.unwrap_or_else(|| variant.default_title().to_string())),
            message: Some(message.into()),
            closable: Some(closable.unwrap_or(true)),
            ..ConfigPatch::default()
        }
    }

    /// Patch used by the loading factory: `{message, spinner}` only.
    pub fn loading(message: impl Into<String>, spinner: Option<SpinnerKind>) -> Self {
        ConfigPatch {
            message: Some(message.into()),
            spinner: Some(spinner.unwrap_or_default()),
            ..ConfigPatch::default()
        }
    }
}

impl Merge for Config {
    type Patch = ConfigPatch;

    fn merge(&mut self, patch: ConfigPatch) {
        if let Some(variant) = patch.variant {
            self.variant = variant;
        }
        if let Some(style_class) = patch.style_class {
            self.style_class = Some(style_class);
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(message) = patch.message {
            self.message = message;
        }
        if let Some(closable) = patch.closable {
            self.closable = closable;
        }
        if let Some(spinner) = patch.spinner {
            self.spinner = Some(spinner);
        }
    }
}
