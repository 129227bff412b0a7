//! Messages handled by the mapper shell

use std::path::PathBuf;

use crossterm::event::KeyCode;

use crate::error::AppError;
use crate::sheet::SheetData;
use crate::tui::graph::{EdgeId, PortId};

use super::state::Focus;

#[derive(Debug)]
pub enum Msg {
    // === Navigation ===
    FocusNext,
    FocusPrev,
    /// Editing key for a text field
    Input(Focus, KeyCode),
    Quit,

    // === Step 1: Spreadsheet ===
    ImportSheet,
    SheetLoaded {
        path: String,
        result: Result<SheetData, AppError>,
    },

    // === Step 2: Target table ===
    ToggleMock,
    ConnectTable,
    ColumnsLoaded {
        table: String,
        result: Result<Vec<String>, AppError>,
    },

    // === Step 3: Mapping graph ===
    SourceNavigate(KeyCode),
    TargetNavigate(KeyCode),
    /// Start a connection from the selected source
    BeginLink,
    /// Drop the proposed connection on the selected target
    CommitLink,
    CancelLink,
    /// A connection was dropped between two ports
    LinkCreated { from: PortId, to: PortId },
    /// Delete the edge into the selected target
    DeleteSelectedLink,
    LinkDeleted(EdgeId),
    AutoMap,
    ClearMappings,

    // === Step 4: Scripts ===
    Generate,
    WriteScripts,
    ScriptsWritten(Result<(PathBuf, usize), String>),
}
