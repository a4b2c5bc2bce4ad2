use std::env;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    File,
    Sqlite,
}

impl StorageBackend {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" => Some(StorageBackend::Memory),
            "file" => Some(StorageBackend::File),
            "sqlite" => Some(StorageBackend::Sqlite),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CalendarConfig {
    pub enabled: bool,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    /// Pre-issued access token, used when no refresh token is configured.
    pub access_token: String,
    pub api_base: String,
    pub salon_calendar_id: String,
    pub hotel_calendar_id: String,
    pub timezone: String,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub bind_addr: String,
    pub storage_backend: StorageBackend,
    pub storage_path: String,
    pub catalog_path: Option<String>,
    pub business_name: String,
    pub enforce_availability: bool,
    pub export_dir: Option<String>,
    pub calendar: CalendarConfig,
}

fn flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    pub fn from_env() -> Self {
        let storage_backend = env::var("STORAGE_BACKEND")
            .ok()
            .and_then(|v| {
                let parsed = StorageBackend::parse(&v);
                if parsed.is_none() {
                    tracing::warn!("unknown STORAGE_BACKEND {v:?}, using sqlite");
                }
                parsed
            })
            .unwrap_or(StorageBackend::Sqlite);

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string()),
            storage_backend,
            storage_path: env::var("STORAGE_PATH").unwrap_or_else(|_| match storage_backend {
                StorageBackend::File => "data".to_string(),
                _ => "bookings.db".to_string(),
            }),
            catalog_path: optional("CATALOG_PATH"),
            business_name: env::var("BUSINESS_NAME").unwrap_or_else(|_| "Booking".to_string()),
            enforce_availability: flag("ENFORCE_AVAILABILITY", true),
            export_dir: optional("EXPORT_DIR"),
            calendar: CalendarConfig {
                enabled: flag("CALENDAR_ENABLED", false),
                client_id: env::var("GOOGLE_CLIENT_ID").unwrap_or_default(),
                client_secret: env::var("GOOGLE_CLIENT_SECRET").unwrap_or_default(),
                refresh_token: env::var("GOOGLE_REFRESH_TOKEN").unwrap_or_default(),
                access_token: env::var("GOOGLE_ACCESS_TOKEN").unwrap_or_default(),
                api_base: env::var("CALENDAR_API_BASE")
                    .unwrap_or_else(|_| "https://www.googleapis.com/calendar/v3".to_string()),
                salon_calendar_id: env::var("SALON_CALENDAR_ID")
                    .unwrap_or_else(|_| "primary".to_string()),
                hotel_calendar_id: env::var("HOTEL_CALENDAR_ID")
                    .unwrap_or_else(|_| "primary".to_string()),
                timezone: env::var("CALENDAR_TIMEZONE")
                    .unwrap_or_else(|_| "Asia/Kolkata".to_string()),
            },
        }
    }
}
