use chrono::NaiveDate;
use serde::Serialize;

use crate::charts::Chart;
use crate::frame::Frame;

pub const TITLE: &str = "Food Wastage Management Dashboard";

pub const INTRO: &str = "This project helps reduce local food waste by allowing providers to list \
    surplus food items, receivers to claim them, and track listings and claims efficiently.";

/// Entries of the sidebar navigation, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    ViewTables,
    RunQueries,
    Visualizations,
    AddRecord,
    UpdateRecord,
    DeleteRecord,
    About,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::ViewTables,
        Section::RunQueries,
        Section::Visualizations,
        Section::AddRecord,
        Section::UpdateRecord,
        Section::DeleteRecord,
        Section::About,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Section::ViewTables => "View Tables",
            Section::RunQueries => "Run Queries",
            Section::Visualizations => "Visualizations",
            Section::AddRecord => "Add Record",
            Section::UpdateRecord => "Update Record",
            Section::DeleteRecord => "Delete Record",
            Section::About => "About",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Section::ViewTables => "/tables",
            Section::RunQueries => "/queries",
            Section::Visualizations => "/visualizations",
            Section::AddRecord => "/add",
            Section::UpdateRecord => "/update",
            Section::DeleteRecord => "/delete",
            Section::About => "/about",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// One element of a section's body, top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum Widget {
    Subheader { text: String },
    Markdown { lines: Vec<String> },
    Select {
        name: &'static str,
        label: String,
        choices: Vec<Choice>,
        selected: String,
    },
    DateInput {
        name: &'static str,
        label: String,
        value: String,
    },
    Table { frame: Frame },
    Chart { chart: Chart },
    Info { message: String },
    Error { message: String },
}

impl Widget {
    pub fn subheader(text: impl Into<String>) -> Self {
        Widget::Subheader { text: text.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Widget::Info {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Widget::Error {
            message: message.into(),
        }
    }

    pub fn date_input(name: &'static str, label: &str, value: NaiveDate) -> Self {
        Widget::DateInput {
            name,
            label: label.to_string(),
            value: value.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Everything one request renders: the active section and its widgets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub section: Section,
    pub widgets: Vec<Widget>,
}

impl Page {
    pub fn new(section: Section) -> Self {
        Self {
            section,
            widgets: Vec::new(),
        }
    }

    pub fn push(&mut self, widget: Widget) -> &mut Self {
        self.widgets.push(widget);
        self
    }

    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.widgets.iter().filter_map(|widget| match widget {
            Widget::Error { message } => Some(message.as_str()),
            _ => None,
        })
    }

    pub fn table(&self) -> Option<&Frame> {
        self.widgets.iter().find_map(|widget| match widget {
            Widget::Table { frame } => Some(frame),
            _ => None,
        })
    }

    pub fn chart(&self) -> Option<&Chart> {
        self.widgets.iter().find_map(|widget| match widget {
            Widget::Chart { chart } => Some(chart),
            _ => None,
        })
    }
}
