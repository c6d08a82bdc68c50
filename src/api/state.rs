use std::sync::Arc;

use crate::services::collector::Collector;

pub type AppState = Arc<Collector>;
