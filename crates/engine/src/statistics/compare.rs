use std::collections::{BTreeMap, BTreeSet};

use contracts::statistics::{
    PeriodComparison, PeriodComparisonEntry, PeriodStatistics, SkuComparison,
};
use thiserror::Error;

/// Терминальные ошибки сравнения периодов
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("need at least 2 periods to compare")]
    InsufficientPeriods,
}

/// Процент изменения с принятыми в боте соглашениями о нуле:
/// рост с нуля считается за 100%, ноль к нулю — 0%.
fn percent_change(previous: f64, current: f64) -> f64 {
    if previous > 0.0 {
        let raw = (current - previous) / previous * 100.0;
        (raw * 100.0).round() / 100.0
    } else if current > 0.0 {
        100.0
    } else {
        0.0
    }
}

/// Сравнивает последовательность периодов попарно.
///
/// Каждая соседняя пара (предыдущий, текущий) даёт одну запись
/// сравнения: дельты по каждому артикулу (артикул, отсутствующий
/// в одном из периодов, получает нулевую статистику) и агрегатные
/// дельты. Порядок периодов — порядок на входе.
pub fn compare_statistics(periods: &[PeriodStatistics]) -> Result<PeriodComparison, StatsError> {
    if periods.len() < 2 {
        return Err(StatsError::InsufficientPeriods);
    }

    let mut comparisons = Vec::with_capacity(periods.len() - 1);

    for pair in periods.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);

        let skus: BTreeSet<&String> = previous
            .sku_stats
            .keys()
            .chain(current.sku_stats.keys())
            .collect();

        let mut sku_comparison = BTreeMap::new();
        for sku in skus {
            let cur = current.sku_stats.get(sku).cloned().unwrap_or_default();
            let prev = previous.sku_stats.get(sku).cloned().unwrap_or_default();

            sku_comparison.insert(
                sku.clone(),
                SkuComparison {
                    orders_diff: cur.total_orders - prev.total_orders,
                    orders_percent: percent_change(
                        prev.total_orders as f64,
                        cur.total_orders as f64,
                    ),
                    revenue_diff: cur.total_revenue - prev.total_revenue,
                    revenue_percent: percent_change(prev.total_revenue, cur.total_revenue),
                    current: cur,
                    previous: prev,
                },
            );
        }

        comparisons.push(PeriodComparisonEntry {
            previous_date: previous.date.clone(),
            current_date: current.date.clone(),
            sku_comparison,
            total_orders_diff: current.total_orders - previous.total_orders,
            total_orders_percent: percent_change(
                previous.total_orders as f64,
                current.total_orders as f64,
            ),
            total_revenue_diff: current.total_revenue - previous.total_revenue,
            total_revenue_percent: percent_change(previous.total_revenue, current.total_revenue),
        });
    }

    Ok(PeriodComparison { comparisons })
}
