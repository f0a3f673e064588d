use contracts::statistics::{PeriodComparisonEntry, PeriodStatistics};

use crate::statistics::NO_DATA_MESSAGE;

/// Рендерит статистику периода в Markdown-текст сообщения бота.
///
/// Блоки артикулов идут в алфавитном порядке, в конце — агрегатные
/// итоги. Если передано сравнение с предыдущим периодом, к артикулам
/// и итогам добавляются строки изменения со стрелкой тренда.
pub fn format_statistics_text(
    stats: &PeriodStatistics,
    comparison: Option<&PeriodComparisonEntry>,
) -> String {
    let mut message = String::from("📊 **Статистика заказов**\n\n");
    message.push_str(&format!("📅 Дата: {}\n", stats.date));
    message.push_str(&format!(
        "⏰ Время: {} - {}\n\n",
        stats.start_time, stats.end_time
    ));

    if stats.total_orders == 0 {
        message.push_str(stats.message.as_deref().unwrap_or(NO_DATA_MESSAGE));
        return message;
    }

    // BTreeMap уже отсортирован по артикулу
    for (sku, sku_stats) in &stats.sku_stats {
        message.push_str(&format!("**{}**\n", sku));
        message.push_str(&format!("  • Заказов: {}\n", sku_stats.total_orders));
        message.push_str(&format!("  • Отмен: {}\n", sku_stats.cancellations));
        message.push_str(&format!("  • Средняя цена: {:.2} ₽\n", sku_stats.avg_price));
        message.push_str(&format!("  • Сумма: {:.2} ₽\n", sku_stats.total_revenue));

        if let Some(delta) = comparison.and_then(|c| c.sku_comparison.get(sku)) {
            message.push_str(&format!(
                "  {} Изменение: {} ({}%)\n",
                trend_icon(delta.orders_diff as f64),
                signed_int(delta.orders_diff),
                signed_float(delta.orders_percent),
            ));
        }

        message.push('\n');
    }

    message.push_str("**ИТОГО:**\n");
    message.push_str(&format!("  • Всего заказов: {}\n", stats.total_orders));
    message.push_str(&format!("  • Всего отмен: {}\n", stats.total_cancellations));
    message.push_str(&format!("  • Общая сумма: {:.2} ₽\n", stats.total_revenue));

    if let Some(comp) = comparison {
        message.push_str(&format!(
            "  {} Изменение заказов: {} ({}%)\n",
            trend_icon(comp.total_orders_diff as f64),
            signed_int(comp.total_orders_diff),
            signed_float(comp.total_orders_percent),
        ));
    }

    message
}

fn trend_icon(diff: f64) -> &'static str {
    if diff > 0.0 {
        "📈"
    } else if diff < 0.0 {
        "📉"
    } else {
        "➡️"
    }
}

fn signed_int(value: i64) -> String {
    if value > 0 {
        format!("+{}", value)
    } else {
        value.to_string()
    }
}

fn signed_float(value: f64) -> String {
    if value > 0.0 {
        format!("+{}", value)
    } else {
        value.to_string()
    }
}
