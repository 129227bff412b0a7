//! State owned by the mapper shell

use std::path::PathBuf;

use crate::config::Config;
use crate::mapping::Mapping;
use crate::schema::ConnectionParams;
use crate::sheet::SheetData;
use crate::tui::graph::{LinkState, MappingGraph};
use crate::tui::log::LogBuffer;
use crate::tui::resource::Resource;
use crate::tui::theme::Theme;
use crate::tui::widgets::{ListState, TextInputField};

/// Widget that receives key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    ExcelPath,
    MockToggle,
    MockColumns,
    Server,
    Database,
    Username,
    Password,
    Table,
    Sources,
    Targets,
}

const FOCUS_ORDER: [Focus; 10] = [
    Focus::ExcelPath,
    Focus::MockToggle,
    Focus::MockColumns,
    Focus::Server,
    Focus::Database,
    Focus::Username,
    Focus::Password,
    Focus::Table,
    Focus::Sources,
    Focus::Targets,
];

impl Focus {
    pub fn is_text_input(&self) -> bool {
        !matches!(self, Focus::MockToggle | Focus::Sources | Focus::Targets)
    }

    /// Fields of the table connection form
    pub fn is_table_form(&self) -> bool {
        matches!(
            self,
            Focus::MockToggle
                | Focus::MockColumns
                | Focus::Server
                | Focus::Database
                | Focus::Username
                | Focus::Password
                | Focus::Table
        )
    }

    /// Whether the field is in use for the current mode
    fn is_active(&self, mock_enabled: bool) -> bool {
        match self {
            Focus::MockColumns => mock_enabled,
            Focus::Server | Focus::Database | Focus::Username | Focus::Password => !mock_enabled,
            _ => true,
        }
    }

    /// Next active focus in tab order, wrapping around
    pub fn cycle(self, forward: bool, mock_enabled: bool) -> Focus {
        let len = FOCUS_ORDER.len();
        let mut idx = FOCUS_ORDER.iter().position(|f| *f == self).unwrap_or(0);
        for _ in 0..len {
            idx = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
            if FOCUS_ORDER[idx].is_active(mock_enabled) {
                return FOCUS_ORDER[idx];
            }
        }
        self
    }
}

#[derive(Debug)]
pub struct State {
    pub focus: Focus,
    pub theme: Theme,

    // Step 1: spreadsheet
    pub excel_path: TextInputField,
    /// Last successfully loaded sheet; a failed import keeps it
    pub sheet: Option<SheetData>,
    /// Outcome of the latest import, with the loaded path on success
    pub sheet_load: Resource<String>,

    // Step 2: target table
    pub mock_enabled: bool,
    pub mock_columns: TextInputField,
    pub server: TextInputField,
    pub database: TextInputField,
    pub username: TextInputField,
    pub password: TextInputField,
    pub table: TextInputField,
    pub trust_cert: bool,
    pub target_columns: Vec<String>,
    /// Table name the columns were loaded for
    pub target_table: String,
    pub columns_load: Resource<String>,

    // Step 3: mapping graph
    pub mapping: Mapping,
    pub graph: MappingGraph,
    pub link: LinkState,
    pub source_list: ListState,
    pub target_list: ListState,

    // Step 4: scripts
    pub scripts: Vec<String>,
    pub preview: String,
    pub preview_limit: usize,
    pub default_table: String,
    pub output_path: PathBuf,
    pub writing: bool,

    pub log: LogBuffer,
}

impl State {
    pub fn new(config: &Config) -> Self {
        let mut mock_columns = TextInputField::new();
        mock_columns.set_value(config.mock.columns.clone());
        let mut server = TextInputField::new();
        server.set_value(config.connection.server.clone());
        let mut database = TextInputField::new();
        database.set_value(config.connection.database.clone());
        let mut username = TextInputField::new();
        username.set_value(config.connection.username.clone());
        let mut password = TextInputField::masked();
        if let Some(pw) = Config::env_password() {
            password.set_value(pw);
        }
        let mut table = TextInputField::new();
        table.set_value(config.connection.table.clone());

        Self {
            focus: Focus::default(),
            theme: Theme::default(),
            excel_path: TextInputField::new(),
            sheet: None,
            sheet_load: Resource::NotAsked,
            mock_enabled: config.mock.enabled,
            mock_columns,
            server,
            database,
            username,
            password,
            table,
            trust_cert: config.connection.trust_cert,
            target_columns: Vec::new(),
            target_table: String::new(),
            columns_load: Resource::NotAsked,
            mapping: Mapping::new(),
            graph: MappingGraph::new(),
            link: LinkState::Idle,
            source_list: ListState::with_selection(),
            target_list: ListState::with_selection(),
            scripts: Vec::new(),
            preview: String::new(),
            preview_limit: config.output.preview_limit.max(1),
            default_table: config.output.default_table.clone(),
            output_path: config.output.path.clone(),
            writing: false,
            log: LogBuffer::default(),
        }
    }

    /// Spreadsheet columns, empty before the first import
    pub fn source_columns(&self) -> &[String] {
        self.sheet.as_ref().map(|s| s.columns()).unwrap_or(&[])
    }

    pub fn input_mut(&mut self, focus: Focus) -> Option<&mut TextInputField> {
        match focus {
            Focus::ExcelPath => Some(&mut self.excel_path),
            Focus::MockColumns => Some(&mut self.mock_columns),
            Focus::Server => Some(&mut self.server),
            Focus::Database => Some(&mut self.database),
            Focus::Username => Some(&mut self.username),
            Focus::Password => Some(&mut self.password),
            Focus::Table => Some(&mut self.table),
            Focus::MockToggle | Focus::Sources | Focus::Targets => None,
        }
    }

    pub fn connection_params(&self) -> ConnectionParams {
        ConnectionParams {
            server: self.server.value().trim().to_string(),
            database: self.database.value().trim().to_string(),
            username: self.username.value().trim().to_string(),
            password: self.password.value().to_string(),
            table: self.table.value().trim().to_string(),
            trust_cert: self.trust_cert,
        }
    }

    pub fn selected_source(&self) -> Option<&str> {
        self.source_list
            .selected()
            .and_then(|i| self.graph.sources().get(i))
            .map(|n| n.column.as_str())
    }

    pub fn selected_target(&self) -> Option<&str> {
        self.target_list
            .selected()
            .and_then(|i| self.graph.targets().get(i))
            .map(|n| n.column.as_str())
    }

    /// Rebuild the graph from the column lists and mapping
    ///
    /// A proposed link survives when its source column still exists.
    pub fn refresh_graph(&mut self) {
        let sources = self.source_columns().to_vec();
        self.graph.rebuild(&sources, &self.target_columns, &self.mapping);
        self.source_list.clamp(self.graph.sources().len());
        self.target_list.clamp(self.graph.targets().len());

        if let LinkState::Proposed { source, .. } = &self.link {
            self.link = match self.graph.source_port(source) {
                Some(from) => LinkState::Proposed {
                    from,
                    source: source.clone(),
                },
                None => LinkState::Idle,
            };
        }
    }
}
