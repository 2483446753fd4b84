//! Terminal screens. Each screen maps a fetch state snapshot to a
//! [`ScreenView`]; [`Screen`] ties a view to the service that feeds it.

pub mod delegators;
pub mod slots;
pub mod validator_details;
pub mod validators;

use crate::services::fetch_service::{FetchService, FetchState, Resource};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenBody {
    Loading,
    Failed { heading: String, message: String },
    Empty { message: String, hint: Option<String> },
    Content(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenView {
    pub title: String,
    pub body: ScreenBody,
}

impl ScreenView {
    pub fn is_failed(&self) -> bool {
        matches!(self.body, ScreenBody::Failed { .. })
    }
}

impl fmt::Display for ScreenView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count()))?;
        writeln!(f)?;
        match &self.body {
            ScreenBody::Loading => writeln!(f, "Loading..."),
            ScreenBody::Failed { heading, message } => {
                writeln!(f, "{}", heading)?;
                writeln!(f, "{}", message)?;
                writeln!(f)?;
                writeln!(f, "[Retry]")
            }
            ScreenBody::Empty { message, hint } => {
                writeln!(f, "{}", message)?;
                match hint {
                    Some(hint) => writeln!(f, "{}", hint),
                    None => Ok(()),
                }
            }
            ScreenBody::Content(content) => write!(f, "{}", content),
        }
    }
}

/// Picks the body for a snapshot: loading wins over error, error over
/// empty, and only non-empty data is rendered.
pub fn body_for<T>(
    state: &FetchState<T>,
    failure_heading: &str,
    is_empty: impl Fn(&T) -> bool,
    empty: (&str, Option<&str>),
    render: impl Fn(&mut String, &T) -> fmt::Result,
) -> ScreenBody {
    if state.is_loading {
        return ScreenBody::Loading;
    }
    if let Some(error) = &state.error {
        return ScreenBody::Failed {
            heading: failure_heading.to_string(),
            message: error.to_string(),
        };
    }
    match &state.data {
        Some(data) if !is_empty(data) => {
            let mut out = String::new();
            match render(&mut out, data) {
                Ok(()) => ScreenBody::Content(out),
                Err(fmt::Error) => ScreenBody::Failed {
                    heading: failure_heading.to_string(),
                    message: "Could not format the response".to_string(),
                },
            }
        }
        _ => ScreenBody::Empty {
            message: empty.0.to_string(),
            hint: empty.1.map(str::to_string),
        },
    }
}

pub type Present<R> =
    fn(&<R as Resource>::Key, &FetchState<<R as Resource>::Output>) -> ScreenView;

/// A screen instance owning its own fetch service.
pub struct Screen<R: Resource> {
    key: R::Key,
    service: Arc<FetchService<R>>,
    present: Present<R>,
    mounted: bool,
}

impl<R: Resource> Screen<R> {
    pub fn new(service: FetchService<R>, key: R::Key, present: Present<R>) -> Self {
        Self {
            key,
            service: Arc::new(service),
            present,
            mounted: false,
        }
    }

    pub fn service(&self) -> &Arc<FetchService<R>> {
        &self.service
    }

    /// Fetches the first time the screen is shown; later calls do nothing.
    pub async fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.service.fetch(&self.key).await;
    }

    pub async fn retry(&self) {
        self.service.fetch(&self.key).await;
    }

    pub fn view(&self) -> ScreenView {
        (self.present)(&self.key, &self.service.snapshot())
    }
}
