use super::StoreState;
use crate::client::ApiClient;
use chrono::{DateTime, Datelike, Months, NaiveDate, SecondsFormat, Utc};
use std::sync::Arc;
use tigger_models::{CalendarEvents, CalendarQuery, CalendarWindow};
use tokio::sync::RwLock;

/// Layout the calendar is drawn in. UI state only: fetching always covers the whole month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CalendarView {
    #[default]
    Month,
    Week,
}

pub struct CalendarStore {
    client: Arc<ApiClient>,
    state: RwLock<StoreState<CalendarEvents>>,
    current_date: RwLock<NaiveDate>,
    view: RwLock<CalendarView>,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

impl CalendarStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            state: RwLock::new(StoreState::default()),
            current_date: RwLock::new(today()),
            view: RwLock::new(CalendarView::default()),
        }
    }

    pub async fn snapshot(&self) -> StoreState<CalendarEvents> {
        self.state.read().await.clone()
    }

    pub async fn current_date(&self) -> NaiveDate {
        *self.current_date.read().await
    }

    pub async fn set_current_date(&self, date: NaiveDate) {
        *self.current_date.write().await = date;
    }

    pub async fn view(&self) -> CalendarView {
        *self.view.read().await
    }

    pub async fn set_view(&self, view: CalendarView) {
        *self.view.write().await = view;
    }

    /// Jump to the first day of the following month
    pub async fn next_month(&self) {
        let mut current = self.current_date.write().await;
        let first = first_of_month(*current);
        *current = first.checked_add_months(Months::new(1)).unwrap_or(first);
    }

    /// Jump to the first day of the previous month
    pub async fn prev_month(&self) {
        let mut current = self.current_date.write().await;
        let first = first_of_month(*current);
        *current = first.checked_sub_months(Months::new(1)).unwrap_or(first);
    }

    pub async fn go_to_today(&self) {
        *self.current_date.write().await = today();
    }

    /// First through last instant of the month being shown
    pub async fn month_window(&self) -> CalendarWindow {
        CalendarWindow::month_of(self.current_date().await)
    }

    /// Fetch events in `[start, end]`. Missing bounds let the server use the current month.
    pub async fn fetch_events(&self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) {
        let query = CalendarQuery {
            start_date: start.map(|d| d.to_rfc3339_opts(SecondsFormat::Millis, true)),
            end_date: end.map(|d| d.to_rfc3339_opts(SecondsFormat::Millis, true)),
        };

        self.state.write().await.start();
        let result = self.client.calendar_events(&query).await;
        self.state.write().await.settle(result);
    }

    pub async fn init(&self) {
        if self.state.read().await.initialized {
            return;
        }
        self.refresh().await;
    }

    /// Reload events for the month being shown
    pub async fn refresh(&self) {
        let window = self.month_window().await;
        self.fetch_events(Some(window.start), Some(window.end)).await;
    }
}
