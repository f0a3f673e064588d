use std::collections::BTreeMap;

use contracts::report::OrderRecord;
use contracts::statistics::{PeriodStatistics, SkuStatistics};

use crate::report::timestamp;

/// Статусы, при которых заказ идёт в выручку
const REVENUE_STATUSES: [&str; 4] = [
    "доставлен",
    "доставляется",
    "ожидает сборки",
    "ожидает отгрузки",
];

/// Статусы отмен и возвратов (обе орфографии «отменён»)
const CANCEL_STATUSES: [&str; 3] = ["отменён", "отменен", "возврат"];

/// Текст статусов в выгрузках гуляет, поэтому проверка — вхождение
/// подстроки по нижнему регистру, а не точное равенство.
fn is_cancellation(status: &str) -> bool {
    CANCEL_STATUSES.iter().any(|s| status.contains(s))
}

fn is_revenue_eligible(status: &str) -> bool {
    REVENUE_STATUSES.iter().any(|s| status.contains(s))
}

pub(crate) const NO_DATA_MESSAGE: &str = "Нет данных за указанный период";

#[derive(Default)]
struct SkuAccumulator {
    total_orders: i64,
    cancellations: i64,
    total_revenue: f64,
    weighted_price_sum: f64,
    weighted_quantity_sum: i64,
}

/// Считает статистику заказов за окно «дата + интервал времени» (МСК).
///
/// В выборку попадают записи, чья календарная дата МСК равна `date`,
/// а время суток лежит в границах `[start_time, end_time]`
/// включительно. Записи с нечитаемой датой создания не участвуют.
/// Пустая выборка — не ошибка: возвращаются нулевые итоги и текстовая
/// пометка об отсутствии данных.
pub fn compute_statistics(
    records: &[OrderRecord],
    date: &str,
    start_time: &str,
    end_time: &str,
) -> PeriodStatistics {
    let mut buckets: BTreeMap<&str, SkuAccumulator> = BTreeMap::new();
    let mut matched = 0usize;

    for record in records {
        let Some((record_date, record_time)) = timestamp::local_date_time(&record.created_at)
        else {
            continue;
        };
        // HH:MM с ведущими нулями сравниваются корректно как строки
        if record_date != date
            || record_time.as_str() < start_time
            || record_time.as_str() > end_time
        {
            continue;
        }
        matched += 1;

        let status = record.status.to_lowercase();
        let bucket = buckets.entry(record.sku.as_str()).or_default();

        bucket.total_orders += record.quantity;

        if is_cancellation(&status) {
            bucket.cancellations += record.quantity;
        }

        if is_revenue_eligible(&status) {
            let line_total = record.price * record.quantity as f64;
            bucket.total_revenue += line_total;
            bucket.weighted_price_sum += line_total;
            bucket.weighted_quantity_sum += record.quantity;
        }
    }

    if matched == 0 {
        return PeriodStatistics {
            date: date.to_string(),
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            total_orders: 0,
            total_cancellations: 0,
            total_revenue: 0.0,
            sku_stats: BTreeMap::new(),
            message: Some(NO_DATA_MESSAGE.to_string()),
        };
    }

    let mut total_orders = 0;
    let mut total_cancellations = 0;
    let mut total_revenue = 0.0;
    let mut sku_stats = BTreeMap::new();

    for (sku, acc) in buckets {
        total_orders += acc.total_orders;
        total_cancellations += acc.cancellations;
        total_revenue += acc.total_revenue;

        let avg_price = if acc.weighted_quantity_sum > 0 {
            acc.weighted_price_sum / acc.weighted_quantity_sum as f64
        } else {
            0.0
        };

        sku_stats.insert(
            sku.to_string(),
            SkuStatistics {
                total_orders: acc.total_orders,
                cancellations: acc.cancellations,
                total_revenue: acc.total_revenue,
                avg_price,
            },
        );
    }

    PeriodStatistics {
        date: date.to_string(),
        start_time: start_time.to_string(),
        end_time: end_time.to_string(),
        total_orders,
        total_cancellations,
        total_revenue,
        sku_stats,
        message: None,
    }
}
