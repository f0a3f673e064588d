use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Агрегаты по одному артикулу за период
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkuStatistics {
    /// Заказано штук (во всех статусах)
    pub total_orders: i64,
    /// Отменено или возвращено штук
    pub cancellations: i64,
    /// Выручка по статусам, идущим к выкупу
    pub total_revenue: f64,
    /// Средняя цена, взвешенная по количеству
    pub avg_price: f64,
}

/// Статистика за одно окно «дата + интервал времени»
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodStatistics {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub total_orders: i64,
    pub total_cancellations: i64,
    pub total_revenue: f64,
    pub sku_stats: BTreeMap<String, SkuStatistics>,
    /// Заполняется, когда в окно не попало ни одной записи
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Дельта по одному артикулу между двумя соседними периодами
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuComparison {
    pub orders_diff: i64,
    pub orders_percent: f64,
    pub revenue_diff: f64,
    pub revenue_percent: f64,
    pub current: SkuStatistics,
    pub previous: SkuStatistics,
}

/// Сравнение одной соседней пары периодов
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodComparisonEntry {
    pub previous_date: String,
    pub current_date: String,
    pub sku_comparison: BTreeMap<String, SkuComparison>,
    pub total_orders_diff: i64,
    pub total_orders_percent: f64,
    pub total_revenue_diff: f64,
    pub total_revenue_percent: f64,
}

/// Результат сравнения последовательности периодов:
/// n периодов дают n − 1 попарных сравнений
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodComparison {
    pub comparisons: Vec<PeriodComparisonEntry>,
}
