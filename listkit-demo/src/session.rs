//! Scripted bulk-selection session against an in-memory page.

use std::fmt;
use std::sync::Arc;

use listkit::prelude::*;
use log::{debug, info};
use pagedom::{Page, Submission};

use crate::error::DemoError;
use crate::render;

/// What the user does, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub path: String,
    pub per_page: usize,
    pub total: Option<u64>,
    /// Row IDs to tick on the first page.
    pub select: Vec<String>,
    pub select_all: bool,
    /// Paginate to the second page before submitting.
    pub next_page: bool,
    /// Row IDs to tick after paginating.
    pub select_next: Vec<String>,
    /// Bulk action to choose, by value, label or last path segment.
    pub action: Option<String>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            path: "/items/".into(),
            per_page: 25,
            total: None,
            select: Vec::new(),
            select_all: false,
            next_page: false,
            select_next: Vec::new(),
            action: None,
        }
    }
}

/// Indicator state and submission after the script ran.
#[derive(Debug, Clone)]
pub struct Report {
    pub location: String,
    pub mode: SelectionMode,
    pub summary: String,
    pub header: HeaderState,
    pub selected: Vec<String>,
    /// Visible rows with their checkbox state.
    pub rows: Vec<(String, bool)>,
    pub submission: Option<Submission>,
    pub stored: Vec<(String, String)>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "location: {}", self.location)?;
        writeln!(f, "mode:     {:?}", self.mode)?;
        writeln!(f, "summary:  {}", self.summary)?;
        writeln!(f, "header:   {:?}", self.header)?;
        writeln!(f, "selected: [{}]", self.selected.join(", "))?;
        writeln!(f, "rows:")?;
        for (id, checked) in &self.rows {
            writeln!(f, "  [{}] {}", if *checked { "x" } else { " " }, id)?;
        }
        match &self.submission {
            Some(submission) => {
                writeln!(
                    f,
                    "submitted to: {}",
                    submission.action.as_deref().unwrap_or("(no action)")
                )?;
                for (name, value) in &submission.fields {
                    writeln!(f, "  {}={}", name, value)?;
                }
            }
            None => writeln!(f, "not submitted")?,
        }
        for (key, value) in &self.stored {
            writeln!(f, "stored {} = {}", key, value)?;
        }
        Ok(())
    }
}

struct Session<'a> {
    script: &'a Script,
    config: &'a ListConfig,
    dropdown: DropdownConfig,
    page: Page,
    store: Arc<MemoryStore>,
    navigator: Arc<Navigator>,
}

/// Render page number `page` of the list.
fn render_page(
    script: &Script,
    config: &ListConfig,
    dropdown: &DropdownConfig,
    page: usize,
) -> pagedom::Element {
    render::list_page(
        &render::row_ids(page, script.per_page, script.total),
        script.total,
        &render::actions(&script.path),
        config,
        dropdown,
    )
}

impl Session<'_> {
    fn render(&self, page: usize) -> pagedom::Element {
        render_page(self.script, self.config, &self.dropdown, page)
    }

    fn attach(&self) -> Result<(SelectionController, DropdownMount), DemoError> {
        let controller = SelectionController::attach(
            &self.page,
            self.store.clone(),
            self.navigator.clone(),
            self.config.clone(),
        )?;
        let actions = DropdownMount::mount(
            &self.page,
            &self.config.selectors.action_select,
            self.dropdown.clone(),
            None,
        )?;
        self.page.run_pending();
        Ok((controller, actions))
    }

    fn tick(&self, controller: &SelectionController, ids: &[String]) -> Result<(), DemoError> {
        let rows = controller.rows();
        for id in ids {
            let row = rows
                .iter()
                .find(|row| row.id == *id)
                .ok_or_else(|| DemoError::UnknownRow(id.clone()))?;
            self.page.click(&row.checkbox);
        }
        Ok(())
    }

    fn choose(&self, actions: &DropdownMount, wanted: &str) -> Result<(), DemoError> {
        let dropdown = actions
            .get()
            .ok_or_else(|| DemoError::UnknownAction(wanted.to_string()))?;
        let index = dropdown
            .options()
            .iter()
            .position(|option| option.is_selectable() && matches_action(option, wanted))
            .ok_or_else(|| DemoError::UnknownAction(wanted.to_string()))?;
        debug!("Choosing action {} at index {}", wanted, index);
        dropdown.toggle_index(index, true);
        Ok(())
    }
}

fn matches_action(option: &DropdownOption, wanted: &str) -> bool {
    option.value == wanted
        || option.label.eq_ignore_ascii_case(wanted)
        || option.value.trim_end_matches('/').rsplit('/').next() == Some(wanted)
}

/// Run `script` against a freshly rendered list page.
pub fn run(script: &Script, config: &ListConfig) -> Result<Report, DemoError> {
    let dropdown = DropdownConfig::default();
    let page = Page::from_root(render_page(script, config, &dropdown, 1), script.path.clone());
    let session = Session {
        script,
        config,
        dropdown,
        page,
        store: Arc::new(MemoryStore::new()),
        navigator: Arc::new(Navigator::new()),
    };
    info!("Rendered {} on {}", script.path, session.page.location());

    let (mut controller, mut actions) = session.attach()?;
    session.tick(&controller, &script.select)?;
    if script.select_all {
        session.page.click(&config.selectors.select_all_trigger);
    }

    if script.next_page {
        let location = format!("{}?page=2", script.path);
        let next = session.render(2);
        session.navigator.visit(&session.page, &location, Some(next))?;
        controller.detach();
        actions.unmount();
        (controller, actions) = session.attach()?;
        session.tick(&controller, &script.select_next)?;
    }

    if let Some(action) = &script.action {
        session.choose(&actions, action)?;
    }
    let submission = session.page.submit(&config.selectors.action_form);

    let state = controller.state();
    let rows = controller
        .rows()
        .into_iter()
        .map(|row| {
            let checked = session.page.element(&row.checkbox).is_some_and(|el| el.checked);
            (row.id, checked)
        })
        .collect();
    // Storage is written when the page is navigated away from
    session.navigator.before_render(&session.page.location())?;
    let stored = session
        .store
        .keys()
        .into_iter()
        .filter_map(|key| {
            let value = session.store.get(&key).ok().flatten()?;
            Some((key, value))
        })
        .collect();

    Ok(Report {
        location: session.page.location(),
        mode: state.mode,
        summary: controller.summary(),
        header: controller.header_state(),
        selected: state.sorted_ids(),
        rows,
        submission,
        stored,
    })
}
