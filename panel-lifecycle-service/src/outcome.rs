use panel_lifecycle_api::domain::LifecycleEvent;

/// Result of a service operation together with the notifications it wants
/// published once the surrounding unit of work has committed.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub value: T,
    pub events: Vec<LifecycleEvent>,
}

impl<T> Outcome<T> {
    pub fn new(value: T, events: Vec<LifecycleEvent>) -> Self {
        Self { value, events }
    }

    pub fn quiet(value: T) -> Self {
        Self {
            value,
            events: Vec::new(),
        }
    }
}
