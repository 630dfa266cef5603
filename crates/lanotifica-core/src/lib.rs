//! Core types: tracing, icon lookup, notification presentation

pub mod icon;
pub mod presentation;
pub mod tracing;

pub use self::icon::{IconCache, IconResolver, NoIcons, default_icon_dir};
pub use self::presentation::{
    DEFAULT_APP_ICON, DEFAULT_TITLE, Presentation, TimeoutPolicy, Urgency,
};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
