//! What a section should show, derived from its query state.
//!
//! The view never inspects an error: it only checks whether one is present.
//! On error it shows a static [`Fallback`] for the section.

use std::fmt;
use std::sync::Arc;

use crate::query::QueryState;
use crate::services::SectionKind;

/// Static "unavailable" placeholder for one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fallback {
    section: SectionKind,
}

impl Fallback {
    pub fn new(section: SectionKind) -> Self {
        Self { section }
    }

    pub fn section(&self) -> SectionKind {
        self.section
    }

    /// The user-facing message.
    pub fn message(&self) -> &'static str {
        match self.section {
            SectionKind::Hero => "Welcome! Our featured content is taking a break. Please check back soon.",
            SectionKind::Gallery => "The gallery is unavailable right now. Please try again later.",
            SectionKind::Community => "Community highlights could not be loaded at the moment.",
            SectionKind::Partners => "Our partners will be listed here again shortly.",
            SectionKind::Testimonials => "Testimonials are unavailable right now.",
            SectionKind::Tools => "The tools overview could not be loaded at the moment.",
            SectionKind::Footer => "Links are temporarily unavailable.",
        }
    }

    /// Static markup for the placeholder.
    ///
    /// # Examples
    ///
    /// ```
    /// use rcms::services::SectionKind;
    /// use rcms::view::Fallback;
    ///
    /// let html = Fallback::new(SectionKind::Partners).render();
    /// assert!(html.starts_with(r#"<section class="section-fallback" data-section="partners""#));
    /// ```
    pub fn render(&self) -> String {
        format!(
            r#"<section class="section-fallback" data-section="{}" role="status"><p>{}</p></section>"#,
            self.section.key(),
            self.message()
        )
    }
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// The three things a mounted section can display.
#[derive(Debug)]
pub enum SectionView<T> {
    Loading,
    Ready(Arc<T>),
    Unavailable(Fallback),
}

impl<T> SectionView<T> {
    /// Projects `state`. Any error wins, even over stale data.
    pub fn from_state(section: SectionKind, state: &QueryState<T>) -> Self {
        if state.error.is_some() {
            return Self::Unavailable(Fallback::new(section));
        }
        match &state.data {
            Some(data) => Self::Ready(Arc::clone(data)),
            None => Self::Loading,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn fallback(&self) -> Option<&Fallback> {
        match self {
            Self::Unavailable(fallback) => Some(fallback),
            _ => None,
        }
    }
}

impl<T> Clone for SectionView<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Loading => Self::Loading,
            Self::Ready(data) => Self::Ready(Arc::clone(data)),
            Self::Unavailable(fallback) => Self::Unavailable(*fallback),
        }
    }
}
