use std::sync::Arc;

use sheetkit_proc::SheetProcessor;

#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<SheetProcessor>,
}

impl AppState {
    pub fn new(processor: SheetProcessor) -> Self {
        Self {
            processor: Arc::new(processor),
        }
    }
}
