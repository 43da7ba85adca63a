use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use nil_deals::workflows::deals::{
    Appeal, AppealId, DealId, DealRecord, DealRepository, InfoRequest, NotificationError,
    NotificationEvent, NotificationPublisher, RepositoryError, VisualCategory,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Stand-in for the hosted database service. A poisoned lock reports
/// `Unavailable` instead of panicking in a request handler.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDealRepository {
    deals: Arc<Mutex<HashMap<DealId, DealRecord>>>,
    requests: Arc<Mutex<Vec<InfoRequest>>>,
    appeals: Arc<Mutex<HashMap<AppealId, Appeal>>>,
}

impl InMemoryDealRepository {
    fn deals(&self) -> Result<MutexGuard<'_, HashMap<DealId, DealRecord>>, RepositoryError> {
        self.deals
            .lock()
            .map_err(|_| RepositoryError::Unavailable("deal store lock poisoned".to_string()))
    }

    fn requests(&self) -> Result<MutexGuard<'_, Vec<InfoRequest>>, RepositoryError> {
        self.requests
            .lock()
            .map_err(|_| RepositoryError::Unavailable("request store lock poisoned".to_string()))
    }

    fn appeals(&self) -> Result<MutexGuard<'_, HashMap<AppealId, Appeal>>, RepositoryError> {
        self.appeals
            .lock()
            .map_err(|_| RepositoryError::Unavailable("appeal store lock poisoned".to_string()))
    }
}

impl DealRepository for InMemoryDealRepository {
    fn insert_deal(&self, record: DealRecord) -> Result<DealRecord, RepositoryError> {
        let mut guard = self.deals()?;
        if guard.contains_key(&record.deal_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.deal_id.clone(), record.clone());
        Ok(record)
    }

    fn update_deal(&self, record: DealRecord) -> Result<(), RepositoryError> {
        let mut guard = self.deals()?;
        if guard.contains_key(&record.deal_id) {
            guard.insert(record.deal_id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_deal(&self, id: &DealId) -> Result<Option<DealRecord>, RepositoryError> {
        Ok(self.deals()?.get(id).cloned())
    }

    fn list_deals(&self) -> Result<Vec<DealRecord>, RepositoryError> {
        Ok(self.deals()?.values().cloned().collect())
    }

    fn insert_info_request(&self, request: InfoRequest) -> Result<(), RepositoryError> {
        self.requests()?.push(request);
        Ok(())
    }

    fn update_info_request(&self, request: InfoRequest) -> Result<(), RepositoryError> {
        let mut guard = self.requests()?;
        match guard
            .iter_mut()
            .find(|candidate| candidate.request_id == request.request_id)
        {
            Some(slot) => {
                *slot = request;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn info_requests_for(&self, deal_id: &DealId) -> Result<Vec<InfoRequest>, RepositoryError> {
        Ok(self
            .requests()?
            .iter()
            .filter(|request| &request.deal_id == deal_id)
            .cloned()
            .collect())
    }

    fn insert_appeal(&self, appeal: Appeal) -> Result<(), RepositoryError> {
        let mut guard = self.appeals()?;
        if guard.contains_key(&appeal.appeal_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(appeal.appeal_id.clone(), appeal);
        Ok(())
    }

    fn update_appeal(&self, appeal: Appeal) -> Result<(), RepositoryError> {
        self.appeals()?.insert(appeal.appeal_id.clone(), appeal);
        Ok(())
    }

    fn fetch_appeal(&self, id: &AppealId) -> Result<Option<Appeal>, RepositoryError> {
        Ok(self.appeals()?.get(id).cloned())
    }
}

/// Records events instead of sending mail; delivery belongs to an external
/// collaborator.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationPublisher {
    events: Arc<Mutex<Vec<NotificationEvent>>>,
}

impl InMemoryNotificationPublisher {
    pub(crate) fn events(&self) -> Vec<NotificationEvent> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl NotificationPublisher for InMemoryNotificationPublisher {
    fn publish(&self, event: NotificationEvent) -> Result<(), NotificationError> {
        let mut guard = self
            .events
            .lock()
            .map_err(|_| NotificationError::Transport("event log lock poisoned".to_string()))?;
        guard.push(event);
        Ok(())
    }
}

/// Concrete style tokens the web dashboards attach to a badge. Kept out of
/// the library so the pure resolver stays presentation-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct BadgeStyle {
    pub(crate) bg_class: &'static str,
    pub(crate) text_class: &'static str,
}

pub(crate) fn badge_style(category: VisualCategory) -> BadgeStyle {
    match category {
        VisualCategory::Positive => BadgeStyle {
            bg_class: "bg-green-100",
            text_class: "text-green-700",
        },
        VisualCategory::Warning => BadgeStyle {
            bg_class: "bg-yellow-100",
            text_class: "text-yellow-700",
        },
        VisualCategory::Negative => BadgeStyle {
            bg_class: "bg-red-100",
            text_class: "text-red-700",
        },
        VisualCategory::Neutral => BadgeStyle {
            bg_class: "bg-gray-100",
            text_class: "text-gray-700",
        },
        VisualCategory::Appeal => BadgeStyle {
            bg_class: "bg-blue-100",
            text_class: "text-blue-700",
        },
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
