use chrono::{Duration, NaiveDateTime};

/// Все даты бота живут в московском времени; выгрузки Ozon
/// содержат время в UTC.
const MSK_UTC_OFFSET_HOURS: i64 = 3;

/// Разбирает дату создания заказа из выгрузки (UTC) и сдвигает в МСК.
///
/// Распознаёт два формата, встречающихся в отчётах:
/// FBO — `DD.MM.YYYY H:MM[:SS]` (час может быть одной цифрой),
/// FBS — `YYYY-MM-DD HH:MM:SS`. Остальное уходит в общий
/// RFC 3339-фолбэк. Нераспознанный текст — `None`.
pub(crate) fn parse_as_msk(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    parse_utc(trimmed).map(|utc| utc + Duration::hours(MSK_UTC_OFFSET_HOURS))
}

fn parse_utc(s: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%d.%m.%Y %H:%M:%S",
        "%d.%m.%Y %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ];
    for format in FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(s, format) {
            return Some(parsed);
        }
    }
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.naive_utc())
}

/// Календарная дата МСК в формате `YYYY-MM-DD`
pub(crate) fn local_date(raw: &str) -> Option<String> {
    parse_as_msk(raw).map(|dt| dt.format("%Y-%m-%d").to_string())
}

/// Дата МСК и время суток `HH:MM`
pub(crate) fn local_date_time(raw: &str) -> Option<(String, String)> {
    parse_as_msk(raw).map(|dt| {
        (
            dt.format("%Y-%m-%d").to_string(),
            dt.format("%H:%M").to_string(),
        )
    })
}
