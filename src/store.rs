use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use utoipa::ToSchema;

/// Именованные коллекции хранилища, на которые можно подписаться.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Apartments,
    Identifications,
    Visitors,
    Materials,
    Notices,
    Rentals,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Apartments,
        Collection::Identifications,
        Collection::Visitors,
        Collection::Materials,
        Collection::Notices,
        Collection::Rentals,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Apartments => "apartments",
            Collection::Identifications => "identifications",
            Collection::Visitors => "visitors",
            Collection::Materials => "materials",
            Collection::Notices => "notices",
            Collection::Rentals => "rentals",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Collection::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangeEvent {
    pub collection: &'static str,
    pub at: DateTime<Utc>,
}

/// Канал изменений по коллекциям. Каждая успешная мутация шлёт событие,
/// подписчики перечитывают снимок коллекции. Отписка — сброс получателя.
#[derive(Clone)]
pub struct ChangeFeed {
    senders: HashMap<Collection, broadcast::Sender<ChangeEvent>>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let senders = Collection::ALL
            .into_iter()
            .map(|c| (c, broadcast::channel(capacity).0))
            .collect();
        Self { senders }
    }

    pub fn subscribe(&self, collection: Collection) -> broadcast::Receiver<ChangeEvent> {
        self.senders[&collection].subscribe()
    }

    /// Без получателей send возвращает ошибку — это нормально.
    pub fn notify(&self, collection: Collection) {
        let event = ChangeEvent {
            collection: collection.as_str(),
            at: Utc::now(),
        };
        let _ = self.senders[&collection].send(event);
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Длительность показа уведомления на клиенте.
pub const TOAST_AUTO_DISMISS_MS: u64 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ToastSeverity {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Toast {
    pub message: String,
    pub severity: ToastSeverity,
    pub auto_dismiss_ms: u64,
}

/// Общий для процесса транслятор уведомлений об успехе/ошибке операций.
#[derive(Clone)]
pub struct ToastRelay {
    tx: broadcast::Sender<Toast>,
}

impl ToastRelay {
    pub fn new(capacity: usize) -> Self {
        Self {
            tx: broadcast::channel(capacity).0,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.tx.subscribe()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.publish(message.into(), ToastSeverity::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.publish(message.into(), ToastSeverity::Error);
    }

    /// Публикует уведомление по результату операции и возвращает его как есть.
    pub fn report<T, E>(&self, result: Result<T, E>, ok: &str, err: &str) -> Result<T, E> {
        match &result {
            Ok(_) => self.success(ok),
            Err(_) => self.error(err),
        }
        result
    }

    fn publish(&self, message: String, severity: ToastSeverity) {
        let _ = self.tx.send(Toast {
            message,
            severity,
            auto_dismiss_ms: TOAST_AUTO_DISMISS_MS,
        });
    }
}

impl Default for ToastRelay {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_parse() {
        assert_eq!(Collection::parse("apartments"), Some(Collection::Apartments));
        assert_eq!(Collection::parse("rentals"), Some(Collection::Rentals));
        assert_eq!(Collection::parse("unknown"), None);
        for c in Collection::ALL {
            assert_eq!(Collection::parse(c.as_str()), Some(c));
        }
    }

    #[tokio::test]
    async fn test_feed_delivers_to_subscriber() {
        let feed = ChangeFeed::new(8);
        let mut rx = feed.subscribe(Collection::Apartments);
        feed.notify(Collection::Apartments);
        let event = rx.recv().await.unwrap();
        assert_eq!(event.collection, "apartments");
    }

    #[tokio::test]
    async fn test_feed_is_per_collection() {
        let feed = ChangeFeed::new(8);
        let mut rx = feed.subscribe(Collection::Visitors);
        feed.notify(Collection::Materials);
        assert!(rx.try_recv().is_err());
        feed.notify(Collection::Visitors);
        assert_eq!(rx.recv().await.unwrap().collection, "visitors");
    }

    #[test]
    fn test_notify_without_subscribers_is_noop() {
        let feed = ChangeFeed::new(8);
        feed.notify(Collection::Notices);
    }

    #[tokio::test]
    async fn test_toast_relay_report() {
        let relay = ToastRelay::new(8);
        let mut rx = relay.subscribe();

        let ok: Result<(), ()> = relay.report(Ok(()), "готово", "ошибка");
        assert!(ok.is_ok());
        let toast = rx.recv().await.unwrap();
        assert_eq!(toast.severity, ToastSeverity::Success);
        assert_eq!(toast.message, "готово");
        assert_eq!(toast.auto_dismiss_ms, TOAST_AUTO_DISMISS_MS);

        let err: Result<(), ()> = relay.report(Err(()), "готово", "ошибка");
        assert!(err.is_err());
        assert_eq!(rx.recv().await.unwrap().severity, ToastSeverity::Error);
    }
}
