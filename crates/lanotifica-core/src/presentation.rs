//! Presentation parameters handed to a notification backend.
//!
//! A [`Presentation`] is built once per incoming request and passed by
//! reference to a single `show` call.

use std::path::Path;

use url::Url;

/// Title used when the caller did not supply one.
pub const DEFAULT_TITLE: &str = "Notification";

/// Freedesktop icon name set as the app icon of every notification.
pub const DEFAULT_APP_ICON: &str = "preferences-system-notifications";

/// Urgency hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Low,
    Normal,
    Critical,
}

impl Urgency {
    /// Maps the wire level (0, 1, 2) to an urgency. Anything else has no hint.
    pub fn from_level(level: i64) -> Option<Self> {
        match level {
            0 => Some(Self::Low),
            1 => Some(Self::Normal),
            2 => Some(Self::Critical),
            _ => None,
        }
    }
}

/// When the notification server should expire the notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeoutPolicy {
    /// Let the notification server decide.
    #[default]
    Default,
    /// Keep the notification until it is closed.
    Never,
    /// Close after exactly this many milliseconds.
    Milliseconds(u32),
}

impl TimeoutPolicy {
    /// Maps the wire value: `> 0` milliseconds, `0` never, `< 0` default.
    pub fn from_millis(timeout_ms: i32) -> Self {
        match timeout_ms {
            ms if ms > 0 => Self::Milliseconds(ms.unsigned_abs()),
            0 => Self::Never,
            _ => Self::Default,
        }
    }
}

/// Everything a backend needs to display one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    /// Summary line.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Originating application, when known.
    pub app_name: Option<String>,
    /// Icon name, always [`DEFAULT_APP_ICON`] unless overridden.
    pub app_icon: String,
    /// `file://` URI of a per-application image.
    pub image_path: Option<String>,
    /// Urgency hint, absent for out-of-range levels.
    pub urgency: Option<Urgency>,
    /// Expiry policy.
    pub timeout: TimeoutPolicy,
}

impl Presentation {
    /// Creates a presentation, falling back to [`DEFAULT_TITLE`] for an empty title.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            title: if title.is_empty() {
                DEFAULT_TITLE.to_string()
            } else {
                title
            },
            body: body.into(),
            app_name: None,
            app_icon: DEFAULT_APP_ICON.to_string(),
            image_path: None,
            urgency: None,
            timeout: TimeoutPolicy::Default,
        }
    }

    /// Builder: set the app name. Empty names are ignored.
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.app_name = Some(name);
        }
        self
    }

    /// Builder: attach a local image file as the image hint.
    pub fn with_image(mut self, path: &Path) -> Self {
        let uri = Url::from_file_path(path)
            .map(|url| url.to_string())
            .unwrap_or_else(|()| format!("file://{}", path.display()));
        self.image_path = Some(uri);
        self
    }

    /// Builder: set the urgency hint.
    pub fn with_urgency(mut self, urgency: Option<Urgency>) -> Self {
        self.urgency = urgency;
        self
    }

    /// Builder: set the timeout policy.
    pub fn with_timeout(mut self, timeout: TimeoutPolicy) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urgency_levels() {
        assert_eq!(Urgency::from_level(0), Some(Urgency::Low));
        assert_eq!(Urgency::from_level(1), Some(Urgency::Normal));
        assert_eq!(Urgency::from_level(2), Some(Urgency::Critical));
        assert_eq!(Urgency::from_level(-1), None);
        assert_eq!(Urgency::from_level(3), None);
    }

    #[test]
    fn timeout_branches() {
        assert_eq!(TimeoutPolicy::from_millis(5000), TimeoutPolicy::Milliseconds(5000));
        assert_eq!(TimeoutPolicy::from_millis(0), TimeoutPolicy::Never);
        assert_eq!(TimeoutPolicy::from_millis(-1), TimeoutPolicy::Default);
        assert_eq!(TimeoutPolicy::from_millis(i32::MIN), TimeoutPolicy::Default);
    }

    #[test]
    fn empty_title_falls_back() {
        let p = Presentation::new("", "body");
        assert_eq!(p.title, DEFAULT_TITLE);
        assert_eq!(p.app_icon, DEFAULT_APP_ICON);
        assert_eq!(p.app_name, None);
        assert_eq!(p.timeout, TimeoutPolicy::Default);
    }

    #[test]
    fn empty_app_name_is_ignored() {
        assert_eq!(Presentation::new("t", "b").with_app_name("").app_name, None);
        assert_eq!(
            Presentation::new("t", "b").with_app_name("Signal").app_name.as_deref(),
            Some("Signal")
        );
    }

    #[cfg(unix)]
    #[test]
    fn image_becomes_file_uri() {
        let p = Presentation::new("t", "b").with_image(Path::new("/tmp/icons/org.example app.png"));
        assert_eq!(
            p.image_path.as_deref(),
            Some("file:///tmp/icons/org.example%20app.png")
        );
        assert_eq!(p.app_icon, DEFAULT_APP_ICON);
    }
}
