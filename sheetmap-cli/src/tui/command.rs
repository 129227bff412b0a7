use std::future::Future;
use std::pin::Pin;

/// Effect requested by `App::update`, executed by the runtime
pub enum Command<Msg> {
    None,
    /// Leave the event loop
    Quit,
    /// Run a job off the UI thread and feed its result back as a message
    Perform(Pin<Box<dyn Future<Output = Msg> + Send + 'static>>),
}

impl<Msg: Send + 'static> Command<Msg> {
    /// Run `future` and map its output to a message
    pub fn perform<F, T, M>(future: F, map: M) -> Self
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
        M: FnOnce(T) -> Msg + Send + 'static,
    {
        Command::Perform(Box::pin(async move { map(future.await) }))
    }
}

impl<Msg> std::fmt::Debug for Command<Msg> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::None => write!(f, "Command::None"),
            Command::Quit => write!(f, "Command::Quit"),
            Command::Perform(_) => write!(f, "Command::Perform(..)"),
        }
    }
}
