//! Locating text in a parsed document.
//!
//! The source site renames classes now and then, so fields that matter are
//! looked up through a chain of selectors tried in order.

use scraper::{ElementRef, Html, Selector};

/// Something that can find a piece of text in a document.
pub trait Locator {
    /// The first non-empty text this locator resolves to.
    fn find_text(&self, doc: &Html) -> Option<String>;

    /// Human-readable form for log lines.
    fn describe(&self) -> String;
}

/// A single CSS selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Css(pub String);

impl Css {
    pub fn new(selector: impl Into<String>) -> Self {
        Self(selector.into())
    }
}

impl Locator for Css {
    fn find_text(&self, doc: &Html) -> Option<String> {
        select_all(doc.root_element(), &self.0)
            .into_iter()
            .next()
            .map(element_text)
            .filter(|t| !t.is_empty())
    }

    fn describe(&self) -> String {
        self.0.clone()
    }
}

/// Locators tried in order; the first one yielding non-empty text wins.
pub struct FallbackChain {
    locators: Vec<Box<dyn Locator>>,
}

impl FallbackChain {
    pub fn new(locators: Vec<Box<dyn Locator>>) -> Self {
        Self { locators }
    }

    /// Chain of plain CSS selectors.
    pub fn css(selectors: &[&str]) -> Self {
        Self::new(
            selectors
                .iter()
                .map(|s| Box::new(Css::new(*s)) as Box<dyn Locator>)
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.locators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }
}

impl Locator for FallbackChain {
    fn find_text(&self, doc: &Html) -> Option<String> {
        self.locators.iter().find_map(|l| l.find_text(doc))
    }

    fn describe(&self) -> String {
        self.locators
            .iter()
            .map(|l| l.describe())
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Every descendant of `scope` matching `selector`, in document order.
///
/// An unparseable selector matches nothing.
pub fn select_all<'a>(scope: ElementRef<'a>, selector: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(selector) {
        Ok(sel) => scope.select(&sel).collect(),
        Err(e) => {
            log::warn!("Invalid selector '{}': {}", selector, e);
            Vec::new()
        }
    }
}

/// First descendant of `scope` matching `selector`.
pub fn select_first<'a>(scope: ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
    select_all(scope, selector).into_iter().next()
}

/// Rendered text of an element with whitespace runs collapsed.
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "tests/locator_tests.rs"]
mod tests;
