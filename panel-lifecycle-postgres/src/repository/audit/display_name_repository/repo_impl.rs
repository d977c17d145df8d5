use postgres_unit_of_work::Executor;

/// Reads the columns audit views need to name projects, boxes, panels and
/// users.
pub struct DisplayNameRepositoryImpl {
    pub executor: Executor,
}

impl DisplayNameRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}
