use crossterm::event::KeyEvent;
use ratatui::Frame;

use super::command::Command;

/// Elm-style application driven by [`run`](super::runtime::run)
pub trait App {
    type State;
    type Msg: Send + 'static;
    type InitParams;

    fn init(params: Self::InitParams) -> (Self::State, Command<Self::Msg>);

    fn update(state: &mut Self::State, msg: Self::Msg) -> Command<Self::Msg>;

    fn view(frame: &mut Frame, state: &mut Self::State);

    /// Translate a key press into a message
    fn on_key(state: &Self::State, key: KeyEvent) -> Option<Self::Msg>;
}
