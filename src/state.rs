use crate::config::AppConfig;
use crate::services::desk::BookingDesk;

pub struct AppState {
    pub config: AppConfig,
    pub desk: BookingDesk,
}
