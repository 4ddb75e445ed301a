//! In-process page model
//!
//! Lets the session run without a WebDriver server. The page is a flat list
//! of elements keyed by id. Asynchronous page updates are modelled with
//! mutations scheduled to land after a number of inspections, which is what
//! the wait layer does while polling.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::trace;

use super::{normalize_text, Browser, ElementState};
use crate::error::{StepError, StepResult};

/// Signature bytes of a PNG file
const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

type Mutation = Box<dyn FnOnce(&mut MemoryPage) + Send>;
type ClickHandler = Arc<dyn Fn(&mut MemoryPage) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Input,
    Select,
    Button,
    Block,
}

/// One element on a `MemoryPage`
#[derive(Debug, Clone)]
pub struct MemoryElement {
    kind: Kind,
    text: String,
    value: Option<String>,
    options: Vec<String>,
    selected: usize,
    displayed: bool,
    enabled: bool,
}

impl MemoryElement {
    fn new(kind: Kind) -> Self {
        Self {
            kind,
            text: String::new(),
            value: None,
            options: Vec::new(),
            selected: 0,
            displayed: true,
            enabled: true,
        }
    }

    /// Text input holding `value`
    pub fn input(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::new(Kind::Input)
        }
    }

    /// Dropdown with the given option labels; the first one is selected.
    pub fn select<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut element = Self::new(Kind::Select);
        element.options = options.into_iter().map(Into::into).collect();
        element.sync_select();
        element
    }

    pub fn button(label: impl Into<String>) -> Self {
        Self {
            text: label.into(),
            ..Self::new(Kind::Button)
        }
    }

    /// Non-form element showing `text` (a div, a table, a flash banner)
    pub fn block(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::new(Kind::Block)
        }
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Without a `value` property, like a `<div>`
    pub fn without_value(mut self) -> Self {
        self.value = None;
        self
    }

    fn sync_select(&mut self) {
        self.text = self.options.join("\n");
        self.value = self.options.get(self.selected).cloned();
    }

    fn state(&self) -> ElementState {
        ElementState {
            text: self.text.clone(),
            value: self.value.clone(),
            displayed: self.displayed,
            enabled: self.enabled,
        }
    }
}

/// Page content of a `MemoryBrowser`
#[derive(Default)]
pub struct MemoryPage {
    url: Option<String>,
    title: String,
    elements: Vec<(String, MemoryElement)>,
    scheduled: Vec<(u32, Mutation)>,
    handlers: Vec<(String, ClickHandler)>,
    stale: Vec<(String, u32)>,
    closed: bool,
}

impl MemoryPage {
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Add or replace the element with `id`
    pub fn insert(&mut self, id: impl Into<String>, element: MemoryElement) {
        let id = id.into();
        match self.elements.iter().position(|(existing, _)| *existing == id) {
            Some(index) => self.elements[index].1 = element,
            None => self.elements.push((id, element)),
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.elements.retain(|(existing, _)| existing != id);
    }

    pub fn get(&self, id: &str) -> Option<&MemoryElement> {
        self.elements
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, element)| element)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut MemoryElement> {
        self.elements
            .iter_mut()
            .find(|(existing, _)| existing == id)
            .map(|(_, element)| element)
    }

    /// Current `value` of an element, if it exists and has one
    pub fn value(&self, id: &str) -> Option<String> {
        self.get(id).and_then(|element| element.value.clone())
    }

    /// Replace the rendered text of an element. Unknown ids are ignored.
    pub fn set_text(&mut self, id: &str, text: impl Into<String>) {
        if let Some(element) = self.get_mut(id) {
            element.text = text.into();
        }
    }

    /// Replace the `value` of an element. Unknown ids are ignored.
    pub fn set_value(&mut self, id: &str, value: impl Into<String>) {
        if let Some(element) = self.get_mut(id) {
            element.value = Some(value.into());
        }
    }

    /// Apply `mutation` once `inspections` more element inspections happened
    pub fn schedule<F>(&mut self, inspections: u32, mutation: F)
    where
        F: FnOnce(&mut MemoryPage) + Send + 'static,
    {
        if inspections == 0 {
            mutation(self);
        } else {
            self.scheduled.push((inspections, Box::new(mutation)));
        }
    }

    /// Make the next `inspections` reads of `id` fail as a stale element,
    /// like a node the page re-renders while it is being read
    pub fn go_stale(&mut self, id: impl Into<String>, inspections: u32) {
        let id = id.into();
        self.stale.retain(|(existing, _)| *existing != id);
        if inspections > 0 {
            self.stale.push((id, inspections));
        }
    }

    /// Run `handler` whenever the element with `id` is clicked
    pub fn on_click<F>(&mut self, id: impl Into<String>, handler: F)
    where
        F: Fn(&mut MemoryPage) + Send + Sync + 'static,
    {
        self.handlers.push((id.into(), Arc::new(handler)));
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn tick(&mut self) {
        let mut due = Vec::new();
        let mut pending = Vec::new();
        for (left, mutation) in self.scheduled.drain(..) {
            if left <= 1 {
                due.push(mutation);
            } else {
                pending.push((left - 1, mutation));
            }
        }
        self.scheduled = pending;

        for mutation in due {
            mutation(self);
        }
    }

    /// Count down a pending stale read of `id`; true when this read is stale
    fn take_stale(&mut self, id: &str) -> bool {
        let Some(index) = self.stale.iter().position(|(existing, _)| existing == id) else {
            return false;
        };
        let left = &mut self.stale[index].1;
        *left -= 1;
        if *left == 0 {
            self.stale.swap_remove(index);
        }
        true
    }

    fn body_text(&self) -> String {
        self.elements
            .iter()
            .filter(|(_, element)| element.displayed && !element.text.is_empty())
            .map(|(_, element)| element.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn require(&mut self, id: &str) -> StepResult<&mut MemoryElement> {
        self.get_mut(id)
            .ok_or_else(|| StepError::ElementNotFound(id.to_string()))
    }

    fn require_interactable(&mut self, id: &str) -> StepResult<&mut MemoryElement> {
        let element = self.require(id)?;
        if !element.displayed {
            return Err(StepError::NotInteractable(id.to_string()));
        }
        Ok(element)
    }
}

/// `Browser` over a `MemoryPage`
#[derive(Default)]
pub struct MemoryBrowser {
    page: Mutex<MemoryPage>,
}

impl MemoryBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setup of the page
    pub fn with_page<F>(self, setup: F) -> Self
    where
        F: FnOnce(&mut MemoryPage),
    {
        setup(&mut *self.page.lock());
        self
    }

    /// Read or change the page after construction
    pub fn page<R>(&self, f: impl FnOnce(&mut MemoryPage) -> R) -> R {
        f(&mut *self.page.lock())
    }
}

#[async_trait]
impl Browser for MemoryBrowser {
    async fn goto(&self, url: &str) -> StepResult<()> {
        self.page.lock().url = Some(url.to_string());
        Ok(())
    }

    async fn title(&self) -> StepResult<String> {
        Ok(self.page.lock().title.clone())
    }

    async fn body_text(&self) -> StepResult<String> {
        Ok(self.page.lock().body_text())
    }

    async fn inspect(&self, id: &str) -> StepResult<Option<ElementState>> {
        let mut page = self.page.lock();
        page.tick();
        if page.take_stale(id) {
            trace!(id, "inspect hit a stale element");
            return Err(StepError::StaleElement(id.to_string()));
        }
        let state = page.get(id).map(MemoryElement::state);
        trace!(id, found = state.is_some(), "inspect");
        Ok(state)
    }

    async fn clear(&self, id: &str) -> StepResult<()> {
        let mut page = self.page.lock();
        let element = page.require_interactable(id)?;
        match element.kind {
            Kind::Input => {
                element.value = Some(String::new());
                Ok(())
            }
            _ => Err(StepError::NotInteractable(id.to_string())),
        }
    }

    async fn send_keys(&self, id: &str, text: &str) -> StepResult<()> {
        let mut page = self.page.lock();
        let element = page.require_interactable(id)?;
        if element.kind != Kind::Input || !element.enabled {
            return Err(StepError::NotInteractable(id.to_string()));
        }
        element.value.get_or_insert_with(String::new).push_str(text);
        Ok(())
    }

    async fn click(&self, id: &str) -> StepResult<()> {
        let mut page = self.page.lock();
        let element = page.require_interactable(id)?;
        if !element.enabled {
            return Err(StepError::NotInteractable(id.to_string()));
        }

        let handlers: Vec<ClickHandler> = page
            .handlers
            .iter()
            .filter(|(target, _)| target == id)
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in handlers {
            handler(&mut *page);
        }
        Ok(())
    }

    async fn select_by_text(&self, id: &str, text: &str) -> StepResult<()> {
        let mut page = self.page.lock();
        let element = page.require_interactable(id)?;
        if element.kind != Kind::Select {
            return Err(StepError::NotInteractable(id.to_string()));
        }

        let wanted = normalize_text(text);
        let index = element
            .options
            .iter()
            .position(|label| normalize_text(label) == wanted)
            .ok_or_else(|| StepError::OptionNotFound {
                id: id.to_string(),
                option: text.to_string(),
            })?;
        element.selected = index;
        element.sync_select();
        Ok(())
    }

    async fn selected_text(&self, id: &str) -> StepResult<Option<String>> {
        let mut page = self.page.lock();
        let element = page.require(id)?;
        if element.kind != Kind::Select {
            return Err(StepError::NotInteractable(id.to_string()));
        }
        Ok(element.options.get(element.selected).cloned())
    }

    async fn screenshot(&self) -> StepResult<Vec<u8>> {
        Ok(PNG_SIGNATURE.to_vec())
    }

    async fn close(&self) -> StepResult<()> {
        self.page.lock().closed = true;
        Ok(())
    }
}
