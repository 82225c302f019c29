use crate::ports::PortResolver;
use crate::routing::SeaRouter;
use std::sync::Arc;

pub struct AppState {
    pub resolver: Arc<PortResolver>,
    pub router: Arc<dyn SeaRouter>,
}
