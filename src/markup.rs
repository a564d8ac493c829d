use crate::config::Config;

pub const BACKDROP_CLASS: &str = "modal-backdrop";
pub const DIALOG_CLASS: &str = "modal";
pub const CLOSE_SELECTOR: &str = "div.close";

/// Which of the two overlay elements a fragment describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Backdrop,
    Dialog,
}

impl Role {
    /// Class swapped in on mount.
    pub fn enter_class(&self) -> &'static str {
        match self {
            Role::Backdrop => "fade-in-fwd",
            Role::Dialog => "slide-in-blurred-top",
        }
    }

    /// Class swapped in when closing starts.
    pub fn exit_class(&self) -> &'static str {
        match self {
            Role::Backdrop => "fade-out",
            Role::Dialog => "slide-out-blurred-top",
        }
    }
}

/// A root `div` to attach to the presentation surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub role: Role,
    pub classes: Vec<String>,
    pub inner_html: String,
    /// Element inside the fragment that closes the modal when clicked.
    pub close_selector: Option<&'static str>,
}

impl Fragment {
    pub fn backdrop() -> Self {
        Fragment {
            role: Role::Backdrop,
            classes: vec![BACKDROP_CLASS.to_string(), Role::Backdrop.enter_class().to_string()],
            inner_html: String::new(),
            close_selector: None,
        }
    }

    pub fn dialog(config: &Config) -> Self {
        let mut classes = vec![
            DIALOG_CLASS.to_string(),
            Role::Dialog.enter_class().to_string(),
            config.variant.to_string(),
        ];
        if let Some(style_class) = config.style_class.as_deref() {
            classes.extend(style_class.split_whitespace().map(str::to_string));
        }

        Fragment {
            role: Role::Dialog,
            classes,
            inner_html: format!("{}{}", header(config), body(config)),
            close_selector: config.is_dismissible().then_some(CLOSE_SELECTOR),
        }
    }

    pub fn class_attr(&self) -> String {
        self.classes.join(" ")
    }

    pub fn outer_html(&self) -> String {
        format!("<div class=\"{}\">{}</div>", self.class_attr(), self.inner_html)
    }
}

fn header(config: &Config) -> String {
    if config.is_loading() {
        return String::new();
    }

    let close = if config.closable { "<div class=\"close\"></div>" } else { "" };
    format!("<div class=\"modal-header\"><h4>{}</h4>{}</div>", config.title, close)
}

fn body(config: &Config) -> String {
    match config.spinner {
        None => format!("<div class=\"modal-body\">{}</div>", config.message),
        Some(spinner) => format!(
            "<div class=\"modal-spinner\">\
             <div class=\"spinner-icon {}\"></div>\
             <div class=\"spinner-message\"><span>{}</span></div>\
             </div>",
            spinner, config.message
        ),
    }
}
