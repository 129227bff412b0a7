//! Mapper shell - Main Application
//!
//! Four steps on one screen: import a spreadsheet, load the target table's
//! columns, connect source columns to target columns, and generate INSERT
//! statements. Implements the App trait with Elm-style architecture.

use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;

use crate::config::Config;
use crate::error::AppError;
use crate::schema::{MssqlSchema, SchemaSource, parse_mock_columns};
use crate::script::{self, ScriptError};
use crate::sheet::{SheetData, SheetError, read_sheet};
use crate::tui::command::Command;
use crate::tui::graph::LinkState;
use crate::tui::resource::Resource;
use crate::tui::app::App;

use super::msg::Msg;
use super::state::{Focus, State};
use super::view;

/// Visible rows assumed for paging before the first frame is drawn
const DEFAULT_LIST_HEIGHT: usize = 10;

pub struct MapperApp;

pub struct InitParams {
    pub config: Config,
    /// Spreadsheet to import on startup
    pub excel: Option<PathBuf>,
}

impl App for MapperApp {
    type State = State;
    type Msg = Msg;
    type InitParams = InitParams;

    fn init(params: InitParams) -> (State, Command<Msg>) {
        let mut state = State::new(&params.config);
        let cmd = match params.excel {
            Some(path) => {
                state.excel_path.set_value(path.display().to_string());
                Self::update(&mut state, Msg::ImportSheet)
            }
            None => Command::None,
        };
        (state, cmd)
    }

    fn update(state: &mut State, msg: Msg) -> Command<Msg> {
        match msg {
            // === Navigation ===
            Msg::FocusNext => {
                state.focus = state.focus.cycle(true, state.mock_enabled);
                Command::None
            }
            Msg::FocusPrev => {
                state.focus = state.focus.cycle(false, state.mock_enabled);
                Command::None
            }
            Msg::Input(focus, key) => {
                if let Some(field) = state.input_mut(focus) {
                    field.handle_key(key, None);
                }
                Command::None
            }
            Msg::Quit => Command::Quit,

            // === Step 1: Spreadsheet ===
            Msg::ImportSheet => import_sheet(state),
            Msg::SheetLoaded { path, result } => {
                match result {
                    Ok(data) => {
                        state.log.info(format!(
                            "Loaded Excel columns: {}",
                            column_list(data.columns())
                        ));
                        state.sheet = Some(data);
                        state.sheet_load = Resource::Success(path);
                        // New source columns invalidate every mapping, even identical ones
                        state.mapping.clear();
                        state.refresh_graph();
                    }
                    Err(e) => {
                        state.log.report(&e);
                        state.sheet_load = Resource::Failure(e.to_string());
                    }
                }
                Command::None
            }

            // === Step 2: Target table ===
            Msg::ToggleMock => {
                state.mock_enabled = !state.mock_enabled;
                Command::None
            }
            Msg::ConnectTable => connect_table(state),
            Msg::ColumnsLoaded { table, result } => {
                match result {
                    Ok(columns) => {
                        state.log.info(format!(
                            "Loaded table columns: {}",
                            column_list(&columns)
                        ));
                        apply_target_columns(state, table, columns);
                    }
                    Err(e) => {
                        state.log.report(&e);
                        state.columns_load = Resource::Failure(e.to_string());
                    }
                }
                Command::None
            }

            // === Step 3: Mapping graph ===
            Msg::SourceNavigate(key) => {
                let count = state.graph.sources().len();
                state.source_list.handle_key(key, count, DEFAULT_LIST_HEIGHT);
                Command::None
            }
            Msg::TargetNavigate(key) => {
                let count = state.graph.targets().len();
                state.target_list.handle_key(key, count, DEFAULT_LIST_HEIGHT);
                Command::None
            }
            Msg::BeginLink => {
                let source = state.selected_source().map(str::to_string);
                if let Some(source) = source {
                    if let Some(from) = state.graph.source_port(&source) {
                        state.link = LinkState::Proposed { from, source };
                        state.focus = Focus::Targets;
                    }
                }
                Command::None
            }
            Msg::CommitLink => {
                let LinkState::Proposed { from, .. } = state.link.clone() else {
                    return Command::None;
                };
                let to = state
                    .selected_target()
                    .and_then(|target| state.graph.target_port(target));
                match to {
                    Some(to) => Self::update(state, Msg::LinkCreated { from, to }),
                    None => Command::None,
                }
            }
            Msg::CancelLink => {
                state.link = LinkState::Idle;
                Command::None
            }
            Msg::LinkCreated { from, to } => {
                state.link = LinkState::Idle;
                let Some((source, target)) = state.graph.resolve_link(from, to) else {
                    log::debug!("Ignoring connection between stale or mismatched ports");
                    return Command::None;
                };
                if let Some(previous) = state.mapping.set(target.clone(), source.clone()) {
                    if previous != source {
                        state
                            .log
                            .warn(format!("Replaced mapping: {} -> {}", previous, target));
                    }
                }
                state
                    .log
                    .info(format!("Created mapping: {} -> {}", source, target));
                state.refresh_graph();
                Command::None
            }
            Msg::DeleteSelectedLink => {
                let edge = state
                    .selected_target()
                    .and_then(|target| state.graph.edge_into(target))
                    .map(|edge| edge.id);
                match edge {
                    Some(id) => Self::update(state, Msg::LinkDeleted(id)),
                    None => Command::None,
                }
            }
            Msg::LinkDeleted(id) => {
                let Some((source, target)) = state.graph.resolve_edge(id) else {
                    log::debug!("Ignoring deletion of stale edge");
                    return Command::None;
                };
                if state.mapping.source_for(&target) == Some(source.as_str()) {
                    state.mapping.remove(&target);
                }
                state
                    .log
                    .info(format!("Deleted mapping: {} -> {}", source, target));
                state.refresh_graph();
                Command::None
            }
            Msg::AutoMap => {
                let sources = state.source_columns().to_vec();
                let count = state
                    .mapping
                    .auto_map(state.target_columns.as_slice(), sources.as_slice());
                log::debug!("Auto-map created {} entries", count);
                state
                    .log
                    .info("Auto-mapped matching columns (case-insensitive).");
                state.refresh_graph();
                Command::None
            }
            Msg::ClearMappings => {
                state.mapping.clear();
                state.refresh_graph();
                state.log.info("All mappings cleared.");
                Command::None
            }

            // === Step 4: Scripts ===
            Msg::Generate => generate(state),
            Msg::WriteScripts => write_scripts(state),
            Msg::ScriptsWritten(result) => {
                state.writing = false;
                match result {
                    Ok((path, count)) => state.log.info(format!(
                        "Wrote {} SQL insert statements to {}",
                        count,
                        path.display()
                    )),
                    Err(e) => state.log.error(e),
                }
                Command::None
            }
        }
    }

    fn view(frame: &mut Frame, state: &mut State) {
        view::render(frame, state);
    }

    fn on_key(state: &State, key: KeyEvent) -> Option<Msg> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Global bindings
        match key.code {
            KeyCode::Char('c') if ctrl => return Some(Msg::Quit),
            KeyCode::Char('l') if ctrl => return Some(Msg::ConnectTable),
            KeyCode::Char('g') if ctrl => return Some(Msg::Generate),
            KeyCode::Char('w') if ctrl => return Some(Msg::WriteScripts),
            KeyCode::Tab => return Some(Msg::FocusNext),
            KeyCode::BackTab => return Some(Msg::FocusPrev),
            KeyCode::Esc if matches!(state.link, LinkState::Proposed { .. }) => {
                return Some(Msg::CancelLink);
            }
            _ => {}
        }

        let focus = state.focus;
        if focus.is_text_input() {
            return match key.code {
                KeyCode::Enter if focus == Focus::ExcelPath => Some(Msg::ImportSheet),
                KeyCode::Enter => Some(Msg::ConnectTable),
                _ if ctrl => None,
                code => Some(Msg::Input(focus, code)),
            };
        }

        match (focus, key.code) {
            (Focus::MockToggle, KeyCode::Char(' ')) => Some(Msg::ToggleMock),
            (Focus::MockToggle, KeyCode::Enter) => Some(Msg::ConnectTable),

            (Focus::Sources, KeyCode::Char(' ') | KeyCode::Enter) => Some(Msg::BeginLink),
            (Focus::Sources, code) if is_navigation(code) => Some(Msg::SourceNavigate(code)),
            (Focus::Sources, KeyCode::Right) => Some(Msg::FocusNext),

            (Focus::Targets, KeyCode::Char(' ') | KeyCode::Enter) => Some(Msg::CommitLink),
            (Focus::Targets, KeyCode::Char('d') | KeyCode::Delete) => {
                Some(Msg::DeleteSelectedLink)
            }
            (Focus::Targets, code) if is_navigation(code) => Some(Msg::TargetNavigate(code)),
            (Focus::Targets, KeyCode::Left) => Some(Msg::FocusPrev),

            (_, KeyCode::Char('a')) => Some(Msg::AutoMap),
            (_, KeyCode::Char('c')) => Some(Msg::ClearMappings),
            (_, KeyCode::Char('g')) => Some(Msg::Generate),
            (_, KeyCode::Char('w')) => Some(Msg::WriteScripts),
            (_, KeyCode::Char('q')) => Some(Msg::Quit),
            _ => None,
        }
    }
}

fn is_navigation(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Up | KeyCode::Down | KeyCode::PageUp | KeyCode::PageDown | KeyCode::Home | KeyCode::End
    )
}

/// `[a, b, c]`
fn column_list(columns: &[String]) -> String {
    format!("[{}]", columns.join(", "))
}

fn import_sheet(state: &mut State) -> Command<Msg> {
    if state.sheet_load.is_loading() {
        return Command::None;
    }

    let path = state.excel_path.value().trim().to_string();
    if path.is_empty() || !Path::new(&path).exists() {
        state.log.error("Invalid Excel file path.");
        return Command::None;
    }

    state.sheet_load = Resource::Loading;
    let job_path = path.clone();
    Command::perform(load_sheet(job_path), move |result| Msg::SheetLoaded {
        path,
        result,
    })
}

/// Read the spreadsheet on the blocking pool
async fn load_sheet(path: String) -> Result<SheetData, AppError> {
    let job_path = path.clone();
    match tokio::task::spawn_blocking(move || read_sheet(&job_path)).await {
        Ok(result) => result.map_err(AppError::from),
        Err(e) => Err(AppError::from(SheetError::Open {
            path,
            message: e.to_string(),
        })),
    }
}

fn connect_table(state: &mut State) -> Command<Msg> {
    if state.columns_load.is_loading() {
        return Command::None;
    }

    if state.mock_enabled {
        match parse_mock_columns(state.mock_columns.value()) {
            Ok(columns) => {
                state.log.info(format!(
                    "Loaded mock table columns: {}",
                    column_list(&columns)
                ));
                let table = state.table.value().trim().to_string();
                apply_target_columns(state, table, columns);
            }
            Err(e) => {
                let err = AppError::from(e);
                state.log.report(&err);
                state.columns_load = Resource::Failure(err.to_string());
            }
        }
        return Command::None;
    }

    let params = state.connection_params();
    if let Err(e) = params.address().and_then(|_| params.validate()) {
        let err = AppError::from(e);
        state.log.report(&err);
        state.columns_load = Resource::Failure(err.to_string());
        return Command::None;
    }

    let table = params.table.clone();
    let source: Box<dyn SchemaSource> = Box::new(MssqlSchema::new(params));
    state.log.info(format!("Fetching columns of {}", source.describe()));
    state.columns_load = Resource::Loading;

    Command::perform(
        async move { source.table_columns().await },
        move |result| Msg::ColumnsLoaded {
            table,
            result: result.map_err(AppError::from),
        },
    )
}

fn apply_target_columns(state: &mut State, table: String, columns: Vec<String>) {
    state.columns_load = Resource::Success(table.clone());
    state.target_columns = columns;
    state.target_table = table;
    state.mapping.clear();
    state.refresh_graph();
}

fn generate(state: &mut State) -> Command<Msg> {
    if let Err(e) = script::ensure_ready(&state.target_columns, &state.mapping, state.sheet.as_ref()) {
        state.log.report(&AppError::from(e));
        return Command::None;
    }
    let Some(data) = state.sheet.as_ref() else {
        state.log.report(&AppError::from(ScriptError::NoRows));
        return Command::None;
    };

    let table = script::table_name_or(&state.target_table, &state.default_table);
    let scripts =
        script::generate_insert_scripts(table, &state.target_columns, &state.mapping, data);
    state.preview = script::preview(&scripts, state.preview_limit);
    state
        .log
        .info(format!("Generated {} SQL insert statements.", scripts.len()));
    state.scripts = scripts;
    Command::None
}

fn write_scripts(state: &mut State) -> Command<Msg> {
    if state.writing {
        return Command::None;
    }
    if state.scripts.is_empty() {
        state.log.warn("No SQL statements to write. Generate them first.");
        return Command::None;
    }

    state.writing = true;
    let path = state.output_path.clone();
    let scripts = state.scripts.clone();
    Command::perform(
        async move {
            let count = scripts.len();
            let job_path = path.clone();
            match tokio::task::spawn_blocking(move || script::write_scripts(&job_path, &scripts))
                .await
            {
                Ok(Ok(())) => Ok((path, count)),
                Ok(Err(e)) => Err(format!("{:#}", e)),
                Err(e) => Err(format!("Failed to write script file: {}", e)),
            }
        },
        Msg::ScriptsWritten,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::CellValue;

    fn state() -> State {
        State::new(&Config::default())
    }

    fn people() -> SheetData {
        SheetData::new(
            "Sheet1",
            vec!["Name".into(), "Age".into()],
            vec![vec![CellValue::String("O'Brien".into()), CellValue::Int(30)]],
        )
    }

    fn load_people(state: &mut State) {
        MapperApp::update(
            state,
            Msg::SheetLoaded {
                path: "people.xlsx".into(),
                result: Ok(people()),
            },
        );
    }

    fn load_targets(state: &mut State, columns: &[&str]) {
        MapperApp::update(
            state,
            Msg::ColumnsLoaded {
                table: "T".into(),
                result: Ok(columns.iter().map(|c| c.to_string()).collect()),
            },
        );
    }

    fn last_log(state: &State) -> String {
        state.log.last().map(|e| e.to_string()).unwrap_or_default()
    }

    #[test]
    fn test_scenario_auto_map_and_generate() {
        let mut state = state();
        load_people(&mut state);
        load_targets(&mut state, &["name", "age", "id"]);
        assert_eq!(last_log(&state), "[INFO] Loaded table columns: [name, age, id]");

        MapperApp::update(&mut state, Msg::AutoMap);
        assert_eq!(state.mapping.to_string(), "{age: Age, name: Name}");
        assert_eq!(state.graph.edges().len(), 2);

        MapperApp::update(&mut state, Msg::Generate);
        assert_eq!(
            state.scripts,
            vec!["INSERT INTO T (name, age, id) VALUES ('O''Brien', 30, NULL)"]
        );
        assert_eq!(state.preview, state.scripts[0]);
        assert_eq!(last_log(&state), "[INFO] Generated 1 SQL insert statements.");
    }

    #[test]
    fn test_link_created_and_deleted() {
        let mut state = state();
        load_people(&mut state);
        load_targets(&mut state, &["id", "full_name"]);

        let from = state.graph.source_port("Name").unwrap();
        let to = state.graph.target_port("full_name").unwrap();
        MapperApp::update(&mut state, Msg::LinkCreated { from, to });
        assert_eq!(state.mapping.source_for("full_name"), Some("Name"));
        assert_eq!(last_log(&state), "[INFO] Created mapping: Name -> full_name");

        let edge = state.graph.edge_into("full_name").unwrap().id;
        MapperApp::update(&mut state, Msg::LinkDeleted(edge));
        assert!(state.mapping.is_empty());
        assert!(state.graph.edges().is_empty());
        assert_eq!(last_log(&state), "[INFO] Deleted mapping: Name -> full_name");
    }

    #[test]
    fn test_link_from_stale_ports_is_ignored() {
        let mut state = state();
        load_people(&mut state);
        load_targets(&mut state, &["name"]);

        let from = state.graph.source_port("Name").unwrap();
        let to = state.graph.target_port("name").unwrap();
        MapperApp::update(&mut state, Msg::ClearMappings);

        let logged = state.log.len();
        MapperApp::update(&mut state, Msg::LinkCreated { from, to });
        assert!(state.mapping.is_empty());
        assert_eq!(state.log.len(), logged);
    }

    #[test]
    fn test_conflicting_link_replaces_source() {
        let mut state = state();
        load_people(&mut state);
        load_targets(&mut state, &["name"]);

        state.mapping.set("name", "Age");
        state.refresh_graph();

        let from = state.graph.source_port("Name").unwrap();
        let to = state.graph.target_port("name").unwrap();
        MapperApp::update(&mut state, Msg::LinkCreated { from, to });

        assert_eq!(state.mapping.source_for("name"), Some("Name"));
        assert_eq!(state.graph.edges().len(), 1);
        let warned = state
            .log
            .entries()
            .any(|e| e.message == "Replaced mapping: Age -> name");
        assert!(warned);
    }

    #[test]
    fn test_keyboard_link_flow() {
        let mut state = state();
        load_people(&mut state);
        load_targets(&mut state, &["id", "name"]);

        state.focus = Focus::Sources;
        MapperApp::update(&mut state, Msg::BeginLink);
        assert!(matches!(&state.link, LinkState::Proposed { source, .. } if source == "Name"));
        assert_eq!(state.focus, Focus::Targets);

        MapperApp::update(&mut state, Msg::TargetNavigate(KeyCode::Down));
        MapperApp::update(&mut state, Msg::CommitLink);
        assert_eq!(state.mapping.source_for("name"), Some("Name"));
        assert_eq!(state.link, LinkState::Idle);

        MapperApp::update(&mut state, Msg::DeleteSelectedLink);
        assert!(!state.mapping.contains("name"));
    }

    #[test]
    fn test_cancel_link_leaves_mapping() {
        let mut state = state();
        load_people(&mut state);
        load_targets(&mut state, &["name"]);

        MapperApp::update(&mut state, Msg::BeginLink);
        MapperApp::update(&mut state, Msg::CancelLink);
        assert_eq!(state.link, LinkState::Idle);
        MapperApp::update(&mut state, Msg::CommitLink);
        assert!(state.mapping.is_empty());
    }

    #[test]
    fn test_reload_clears_mapping() {
        let mut state = state();
        load_people(&mut state);
        load_targets(&mut state, &["name", "age"]);
        MapperApp::update(&mut state, Msg::AutoMap);
        assert_eq!(state.mapping.len(), 2);

        load_people(&mut state);
        assert!(state.mapping.is_empty());
        assert!(state.graph.edges().is_empty());

        MapperApp::update(&mut state, Msg::AutoMap);
        load_targets(&mut state, &["name", "age"]);
        assert!(state.mapping.is_empty());
    }

    #[test]
    fn test_failed_import_keeps_previous_sheet() {
        let mut state = state();
        load_people(&mut state);
        load_targets(&mut state, &["name"]);
        MapperApp::update(&mut state, Msg::AutoMap);

        MapperApp::update(
            &mut state,
            Msg::SheetLoaded {
                path: "broken.xlsx".into(),
                result: Err(AppError::from(SheetError::NoSheets)),
            },
        );
        assert!(state.sheet.is_some());
        assert_eq!(state.mapping.len(), 1);
        assert!(matches!(state.sheet_load, Resource::Failure(_)));
        assert_eq!(last_log(&state), "[ERROR] Excel file has no sheets");
    }

    #[test]
    fn test_generate_without_mapping() {
        let mut state = state();
        load_people(&mut state);
        load_targets(&mut state, &["name"]);
        state.scripts = vec!["previous".to_string()];

        MapperApp::update(&mut state, Msg::Generate);
        assert_eq!(state.scripts, vec!["previous"]);
        assert_eq!(last_log(&state), "[WARN] Missing mapping or Excel data.");
    }

    #[test]
    fn test_invalid_path_is_rejected() {
        let mut state = state();
        state.excel_path.set_value("/definitely/not/here.xlsx");
        let cmd = MapperApp::update(&mut state, Msg::ImportSheet);
        assert!(matches!(cmd, Command::None));
        assert_eq!(state.sheet_load, Resource::NotAsked);
        assert_eq!(last_log(&state), "[ERROR] Invalid Excel file path.");
    }

    #[test]
    fn test_mock_columns() {
        let mut state = state();
        state.mock_enabled = true;
        MapperApp::update(&mut state, Msg::ConnectTable);
        assert_eq!(state.target_columns, vec!["id", "name", "age"]);
        assert_eq!(
            last_log(&state),
            "[INFO] Loaded mock table columns: [id, name, age]"
        );

        state.mock_columns.set_value(" , ");
        MapperApp::update(&mut state, Msg::ConnectTable);
        assert_eq!(state.target_columns, vec!["id", "name", "age"]);
        assert_eq!(last_log(&state), "[ERROR] Mock column list is empty");
    }

    #[test]
    fn test_mock_table_name_falls_back() {
        let mut state = state();
        state.mock_enabled = true;
        state.mock_columns.set_value("name");
        load_people(&mut state);
        MapperApp::update(&mut state, Msg::ConnectTable);
        MapperApp::update(&mut state, Msg::AutoMap);
        MapperApp::update(&mut state, Msg::Generate);
        assert_eq!(
            state.scripts,
            vec!["INSERT INTO TargetTable (name) VALUES ('O''Brien')"]
        );
    }

    #[test]
    fn test_live_connect_requires_table() {
        let mut state = state();
        state.server.set_value("localhost,1433");
        state.username.set_value("sa");
        let cmd = MapperApp::update(&mut state, Msg::ConnectTable);
        assert!(matches!(cmd, Command::None));
        assert_eq!(last_log(&state), "[ERROR] Missing connection parameter: table");
    }

    #[test]
    fn test_connect_ignored_while_loading() {
        let mut state = state();
        state.columns_load = Resource::Loading;
        state.mock_enabled = true;
        MapperApp::update(&mut state, Msg::ConnectTable);
        assert!(state.target_columns.is_empty());
    }

    #[test]
    fn test_write_without_scripts() {
        let mut state = state();
        let cmd = MapperApp::update(&mut state, Msg::WriteScripts);
        assert!(matches!(cmd, Command::None));
        assert_eq!(state.log.last().unwrap().level, crate::tui::log::LogLevel::Warn);
    }

    #[tokio::test]
    async fn test_import_runs_in_background() {
        let path = std::env::temp_dir().join(format!("sheetmap-{}.xlsx", uuid::Uuid::new_v4()));
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Name").unwrap();
        sheet.write_string(1, 0, "Ada").unwrap();
        workbook.save(&path).unwrap();

        let mut state = state();
        state.excel_path.set_value(path.display().to_string());
        let cmd = MapperApp::update(&mut state, Msg::ImportSheet);
        assert!(state.sheet_load.is_loading());

        let Command::Perform(job) = cmd else {
            panic!("expected a background job");
        };
        MapperApp::update(&mut state, job.await);

        assert_eq!(state.source_columns(), ["Name".to_string()]);
        assert_eq!(last_log(&state), "[INFO] Loaded Excel columns: [Name]");
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_on_key_text_input_vs_shortcuts() {
        let mut state = state();
        let key = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);

        assert!(matches!(
            MapperApp::on_key(&state, key('q')),
            Some(Msg::Input(Focus::ExcelPath, KeyCode::Char('q')))
        ));

        state.focus = Focus::Sources;
        assert!(matches!(MapperApp::on_key(&state, key('q')), Some(Msg::Quit)));
        assert!(matches!(MapperApp::on_key(&state, key('a')), Some(Msg::AutoMap)));
        assert!(matches!(
            MapperApp::on_key(&state, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Msg::Quit)
        ));
    }
}
