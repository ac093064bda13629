use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures::stream::{self, Stream, StreamExt};
use sqlx::PgPool;
use tokio_stream::wrappers::BroadcastStream;

use crate::error::{AppError, AppResult};
use crate::middleware::{AdminUser, AppState};
use crate::models::VisitorResponse;
use crate::store::Collection;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/subscriptions/:collection", get(subscribe_collection))
        .route("/toasts", get(subscribe_toasts))
}

/// Текущий снимок коллекции целиком. Подписчики не получают дельт:
/// после каждого изменения им заново уходит весь набор.
async fn snapshot(pool: &PgPool, collection: Collection) -> AppResult<serde_json::Value> {
    let value = match collection {
        Collection::Apartments => serde_json::to_value(super::apartments::fetch_all(pool).await?),
        Collection::Identifications => {
            serde_json::to_value(super::identifications::fetch_all(pool).await?)
        }
        Collection::Visitors => {
            let items: Vec<VisitorResponse> = super::visitors::fetch_all(pool)
                .await?
                .into_iter()
                .map(VisitorResponse::from)
                .collect();
            serde_json::to_value(items)
        }
        Collection::Materials => serde_json::to_value(super::materials::fetch_all(pool).await?),
        Collection::Notices => serde_json::to_value(super::notices::fetch_all(pool).await?),
        Collection::Rentals => serde_json::to_value(super::reports::fetch_all(pool).await?),
    };
    value.map_err(|e| AppError::Internal(e.to_string()))
}

const SNAPSHOT_ERROR_MESSAGE: &str = "Не удалось получить снимок коллекции";

// Текст ошибки в поток не уходит, клиент получает общее сообщение
fn snapshot_payload(result: AppResult<serde_json::Value>) -> Result<String, &'static str> {
    match result {
        Ok(value) => Ok(value.to_string()),
        Err(e) => {
            tracing::error!("Snapshot error: {:?}", e);
            Err(SNAPSHOT_ERROR_MESSAGE)
        }
    }
}

fn snapshot_event(result: AppResult<serde_json::Value>) -> Event {
    match snapshot_payload(result) {
        Ok(data) => Event::default().event("snapshot").data(data),
        Err(message) => Event::default().event("error").data(message),
    }
}

/// Живая подписка на коллекцию: сразу отдаёт снимок, дальше — снимок
/// после каждой мутации. Разрыв соединения снимает подписку.
pub async fn subscribe_collection(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(name): Path<String>,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let collection = Collection::parse(&name)
        .ok_or_else(|| AppError::NotFound(format!("Коллекция не найдена: {}", name)))?;

    let initial = snapshot_event(snapshot(&state.pool, collection).await);

    let pool = state.pool.clone();
    let changes = BroadcastStream::new(state.feed.subscribe(collection))
        // отставший получатель просто ждёт следующего снимка
        .filter_map(|event| async move { event.ok() })
        .then(move |_| {
            let pool = pool.clone();
            async move { snapshot_event(snapshot(&pool, collection).await) }
        });

    let stream = stream::once(async move { initial })
        .chain(changes)
        .map(Ok::<_, Infallible>);

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Поток уведомлений об исходе операций.
pub async fn subscribe_toasts(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.toasts.subscribe())
        .filter_map(|toast| async move { toast.ok() })
        .map(|toast| {
            let data = serde_json::to_string(&toast).unwrap_or_default();
            Ok(Event::default().event("toast").data(data))
        });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_payload_passes_data_through() {
        let payload = snapshot_payload(Ok(json!([{"id": 1}])));
        assert_eq!(payload.unwrap(), r#"[{"id":1}]"#);
    }

    // Сырой текст ошибки БД клиентам не показывается
    #[test]
    fn test_snapshot_payload_hides_error_details() {
        let err = AppError::Database(sqlx::Error::PoolClosed);
        let payload = snapshot_payload(Err(err)).unwrap_err();
        assert_eq!(payload, SNAPSHOT_ERROR_MESSAGE);
        assert!(!payload.contains("pool"));
    }
}
