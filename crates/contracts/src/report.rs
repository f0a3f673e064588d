use serde::{Deserialize, Serialize};
use std::fmt;

/// Схема отчёта о заказах Ozon
///
/// FBO — отгрузка со склада Ozon, FBS — отгрузка со склада продавца.
/// Выгрузки двух схем имеют разный набор и порядок колонок.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportSchema {
    #[serde(rename = "FBO")]
    Fbo,
    #[serde(rename = "FBS")]
    Fbs,
}

impl fmt::Display for ReportSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportSchema::Fbo => write!(f, "FBO"),
            ReportSchema::Fbs => write!(f, "FBS"),
        }
    }
}

/// Нормализованная строка отчёта — одна позиция заказа
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub sku: String,
    pub quantity: i64,
    pub price: f64,
    /// Сырой текст даты создания из выгрузки; может быть некорректным
    /// и разбирается заново при расчёте статистики
    pub created_at: String,
    /// Статус заказа, приведённый к нижнему регистру
    pub status: String,
}

/// Результат нормализации одного отчёта
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedReport {
    pub schema: ReportSchema,
    pub records: Vec<OrderRecord>,
    /// Уникальные календарные даты (МСК) в формате YYYY-MM-DD,
    /// строго по возрастанию
    pub available_dates: Vec<String>,
    pub total_records: usize,
}
