use std::time::Duration;

use anyhow::Result;
use contracts::report::NormalizedReport;

/// Внешнее ключ-значение хранилище сессий бота.
///
/// Движок сам по себе без состояния; нормализованный отчёт и выбор
/// пользователя между шагами диалога живут во внешнем хранилище,
/// которое внедряет вызывающая сторона. Политика истечения — на
/// совести хранилища, движок только передаёт TTL.
pub trait SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
}

/// Ключ датасета пользователя: `ozon:sess:{user}:csv`
pub fn report_key(user_id: i64) -> String {
    format!("ozon:sess:{}:csv", user_id)
}

/// Ключ выбранных дат пользователя: `ozon:sess:{user}:dates`
pub fn dates_key(user_id: i64) -> String {
    format!("ozon:sess:{}:dates", user_id)
}

/// Сохраняет нормализованный отчёт как JSON-блоб под ключом датасета
pub fn save_report(
    store: &dyn SessionStore,
    user_id: i64,
    report: &NormalizedReport,
    ttl: Duration,
) -> Result<()> {
    let payload = serde_json::to_string(report)?;
    store.set(&report_key(user_id), &payload, ttl)
}

/// Читает сохранённый отчёт; `None`, если сессия истекла или её не было
pub fn load_report(store: &dyn SessionStore, user_id: i64) -> Result<Option<NormalizedReport>> {
    match store.get(&report_key(user_id))? {
        Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
        None => Ok(None),
    }
}

/// Сохраняет выбранные пользователем даты
pub fn save_selected_dates(
    store: &dyn SessionStore,
    user_id: i64,
    dates: &[String],
    ttl: Duration,
) -> Result<()> {
    let payload = serde_json::to_string(dates)?;
    store.set(&dates_key(user_id), &payload, ttl)
}

/// Читает выбранные даты; `None`, если выбор ещё не делался
pub fn load_selected_dates(store: &dyn SessionStore, user_id: i64) -> Result<Option<Vec<String>>> {
    match store.get(&dates_key(user_id))? {
        Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
        None => Ok(None),
    }
}

/// Сбрасывает сессию пользователя целиком
pub fn clear_session(store: &dyn SessionStore, user_id: i64) -> Result<()> {
    store.delete(&report_key(user_id))?;
    store.delete(&dates_key(user_id))
}
