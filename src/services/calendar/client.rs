use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use super::{CalendarError, CalendarEvent};

pub const GOOGLE_CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEvent {
    pub id: String,
    #[serde(default)]
    pub html_link: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[async_trait]
pub trait CalendarClient: Send + Sync {
    async fn insert_event(
        &self,
        calendar_id: &str,
        access_token: &str,
        event: &CalendarEvent,
    ) -> Result<CreatedEvent, CalendarError>;
}

pub struct GoogleCalendarClient {
    base_url: String,
    client: reqwest::Client,
}

impl GoogleCalendarClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn events_url(&self, calendar_id: &str) -> Result<Url, CalendarError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CalendarError::Config(format!("bad calendar API base {:?}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| CalendarError::Config(format!("calendar API base {:?} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .extend(["calendars", calendar_id, "events"]);
        Ok(url)
    }
}

impl Default for GoogleCalendarClient {
    fn default() -> Self {
        Self::new(GOOGLE_CALENDAR_API.to_string())
    }
}

#[async_trait]
impl CalendarClient for GoogleCalendarClient {
    async fn insert_event(
        &self,
        calendar_id: &str,
        access_token: &str,
        event: &CalendarEvent,
    ) -> Result<CreatedEvent, CalendarError> {
        let url = self.events_url(calendar_id)?;

        let resp = self
            .client
            .post(url)
            .bearer_auth(access_token)
            .json(event)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CalendarError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.json::<CreatedEvent>().await?)
    }
}
