/// Outcome of the most recent background load
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Resource<T> {
    #[default]
    NotAsked,
    Loading,
    Success(T),
    Failure(String),
}

impl<T> Resource<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }
}
