use contracts::report::{NormalizedReport, OrderRecord};

use super::schema;
use super::timestamp;
use super::{ParseOptions, ReportError};

/// Разбирает сырую выгрузку заказов и приводит её к единой структуре.
///
/// Определяет схему (FBO/FBS) по заголовку, извлекает поля по таблице
/// соответствия, собирает отсортированный список дат (МСК). Битые
/// строки не валят разбор целиком: строка без номера заказа или
/// артикула отбрасывается, нечисловые количество и цена получают
/// значения по умолчанию, нечитаемая дата исключает запись только
/// из списка дат.
pub fn normalize_report(
    text: &str,
    options: &ParseOptions,
) -> Result<NormalizedReport, ReportError> {
    // Выгрузки из кабинета иногда приходят с UTF-8 BOM
    let text = text.trim_start_matches('\u{FEFF}');

    if text.lines().filter(|line| !line.trim().is_empty()).count() < 2 {
        return Err(ReportError::EmptyInput);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter_byte())
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = match reader.headers() {
        Ok(h) => h.clone(),
        Err(e) => {
            tracing::warn!("Failed to read report headers: {}", e);
            return Err(ReportError::UnrecognizedSchema);
        }
    };

    let descriptor = schema::detect(&headers).ok_or(ReportError::UnrecognizedSchema)?;
    let fields = descriptor.resolve(&headers);

    let mut records = Vec::new();

    for (idx, row) in reader.records().enumerate() {
        // строка 1 — заголовок
        let line = idx + 2;
        let row = match row {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Skipping malformed CSV record at line {}: {}", line, e);
                continue;
            }
        };
        if row.iter().all(|field| field.is_empty()) {
            continue;
        }

        let order_id = fields.order_id.pick(&row).trim();
        let sku = fields.sku.pick(&row).trim();
        if order_id.is_empty() || sku.is_empty() {
            tracing::warn!("Dropping line {}: missing order id or sku", line);
            continue;
        }

        let quantity_raw = fields.quantity.pick(&row).trim();
        let quantity = if quantity_raw.is_empty() {
            1
        } else {
            match quantity_raw.parse::<i64>() {
                Ok(q) if q >= 0 => q,
                _ => {
                    tracing::warn!(
                        "Line {}: unparseable quantity {:?}, defaulting to 1",
                        line,
                        quantity_raw
                    );
                    1
                }
            }
        };

        let price_raw = fields.price.pick(&row).trim();
        let price = if price_raw.is_empty() {
            0.0
        } else {
            match parse_decimal(price_raw) {
                Some(p) if p >= 0.0 => p,
                _ => {
                    tracing::warn!(
                        "Line {}: unparseable price {:?}, defaulting to 0",
                        line,
                        price_raw
                    );
                    0.0
                }
            }
        };

        records.push(OrderRecord {
            order_id: order_id.to_string(),
            sku: sku.to_string(),
            quantity,
            price,
            created_at: fields.created_at.pick(&row).trim().to_string(),
            status: fields.status.pick(&row).trim().to_lowercase(),
        });
    }

    let mut available_dates: Vec<String> = records
        .iter()
        .filter_map(|record| timestamp::local_date(&record.created_at))
        .collect();
    available_dates.sort();
    available_dates.dedup();

    if available_dates.is_empty() {
        return Err(ReportError::NoDatesFound);
    }

    tracing::info!(
        "Normalized {} report: {} records, {} distinct dates",
        descriptor.schema,
        records.len(),
        available_dates.len()
    );

    Ok(NormalizedReport {
        schema: descriptor.schema,
        total_records: records.len(),
        records,
        available_dates,
    })
}

/// Числа в выгрузках встречаются и с запятой в роли десятичного
/// разделителя
fn parse_decimal(s: &str) -> Option<f64> {
    s.replace(',', ".").parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::report::ReportSchema;

    const FBO_HEADER: &str =
        "Номер заказа,Отправление,Принят в обработку,Дата отгрузки,Склад,Регион,Артикул,\
         Наименование,Количество,Объем,Вес,Скидка,Базовая цена,Цена,Валюта,Дата создания,Статус";

    fn fbo_row(
        order_id: &str,
        sku: &str,
        quantity: &str,
        price: &str,
        created_at: &str,
        status: &str,
    ) -> String {
        format!(
            "{},x,x,x,x,x,{},x,{},x,x,x,x,{},RUB,{},{}",
            order_id, sku, quantity, price, created_at, status
        )
    }

    const FBS_HEADER: &str = "№ заказа,Артикул продавца,Кол-во,Цена,Дата создания,Статус";

    fn fbs_row(
        order_id: &str,
        sku: &str,
        quantity: &str,
        price: &str,
        created_at: &str,
        status: &str,
    ) -> String {
        format!(
            "{},{},{},{},{},{}",
            order_id, sku, quantity, price, created_at, status
        )
    }

    fn parse(text: &str) -> Result<NormalizedReport, ReportError> {
        normalize_report(text, &ParseOptions::default())
    }

    #[test]
    fn parses_fbo_report() {
        let text = format!(
            "{}\n{}\n{}\n",
            FBO_HEADER,
            fbo_row("A-1", "SKU-1", "2", "100.50", "01.10.2025 7:26", "Доставлен"),
            fbo_row("A-2", "SKU-2", "1", "250", "01.10.2025 17:30", "Отменён"),
        );
        let report = parse(&text).unwrap();

        assert_eq!(report.schema, ReportSchema::Fbo);
        assert_eq!(report.total_records, 2);
        assert_eq!(report.total_records, report.records.len());
        assert_eq!(report.available_dates, vec!["2025-10-01"]);

        let first = &report.records[0];
        assert_eq!(first.order_id, "A-1");
        assert_eq!(first.sku, "SKU-1");
        assert_eq!(first.quantity, 2);
        assert_eq!(first.price, 100.50);
        assert_eq!(first.status, "доставлен");
    }

    #[test]
    fn parses_fbs_report_with_date_rollover() {
        let text = format!(
            "{}\n{}\n{}\n",
            FBS_HEADER,
            fbs_row("B-1", "SKU-1", "1", "99.90", "2025-09-28 23:06:41", "Доставляется"),
            fbs_row("B-2", "SKU-2", "3", "10", "2025-09-28 10:20:17", "Ожидает сборки"),
        );
        let report = parse(&text).unwrap();

        assert_eq!(report.schema, ReportSchema::Fbs);
        // 23:06 UTC уходит за полночь по МСК
        assert_eq!(report.available_dates, vec!["2025-09-28", "2025-09-29"]);
    }

    #[test]
    fn available_dates_sorted_and_deduplicated() {
        let text = format!(
            "{}\n{}\n{}\n{}\n",
            FBS_HEADER,
            fbs_row("B-3", "SKU-1", "1", "5", "2025-09-29 10:00:00", "Доставлен"),
            fbs_row("B-1", "SKU-1", "1", "5", "2025-09-27 10:00:00", "Доставлен"),
            fbs_row("B-2", "SKU-1", "1", "5", "2025-09-27 12:00:00", "Доставлен"),
        );
        let report = parse(&text).unwrap();
        assert_eq!(report.available_dates, vec!["2025-09-27", "2025-09-29"]);
        assert!(report.available_dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn empty_input_is_terminal() {
        assert!(matches!(parse(""), Err(ReportError::EmptyInput)));
        assert!(matches!(parse("   \n  \n"), Err(ReportError::EmptyInput)));
        assert!(matches!(parse(FBO_HEADER), Err(ReportError::EmptyInput)));
    }

    #[test]
    fn unknown_header_is_terminal() {
        let text = "id,product,amount\n1,widget,3\n";
        assert!(matches!(parse(text), Err(ReportError::UnrecognizedSchema)));
    }

    #[test]
    fn all_dates_malformed_is_terminal() {
        let text = format!(
            "{}\n{}\n",
            FBS_HEADER,
            fbs_row("B-1", "SKU-1", "1", "5", "не дата", "Доставлен"),
        );
        assert!(matches!(parse(&text), Err(ReportError::NoDatesFound)));
    }

    #[test]
    fn row_without_sku_is_dropped() {
        let text = format!(
            "{}\n{}\n{}\n",
            FBS_HEADER,
            fbs_row("B-1", "", "1", "5", "2025-09-27 10:00:00", "Доставлен"),
            fbs_row("B-2", "SKU-2", "1", "5", "2025-09-27 11:00:00", "Доставлен"),
        );
        let report = parse(&text).unwrap();
        assert_eq!(report.total_records, 1);
        assert_eq!(report.records[0].order_id, "B-2");
    }

    #[test]
    fn unparseable_numbers_get_defaults() {
        let text = format!(
            "{}\n{}\n",
            FBS_HEADER,
            fbs_row("B-1", "SKU-1", "много", "дорого", "2025-09-27 10:00:00", "Доставлен"),
        );
        let report = parse(&text).unwrap();
        assert_eq!(report.records[0].quantity, 1);
        assert_eq!(report.records[0].price, 0.0);
    }

    #[test]
    fn decimal_comma_price_is_accepted() {
        let text = format!(
            "{}\n{}\n",
            FBS_HEADER,
            fbs_row("B-1", "SKU-1", "1", "\"1234,56\"", "2025-09-27 10:00:00", "Доставлен"),
        );
        let report = parse(&text).unwrap();
        assert_eq!(report.records[0].price, 1234.56);
    }

    #[test]
    fn malformed_timestamp_keeps_record_but_not_date() {
        let text = format!(
            "{}\n{}\n{}\n",
            FBS_HEADER,
            fbs_row("B-1", "SKU-1", "1", "5", "завтра", "Доставлен"),
            fbs_row("B-2", "SKU-2", "1", "5", "2025-09-27 10:00:00", "Доставлен"),
        );
        let report = parse(&text).unwrap();
        assert_eq!(report.total_records, 2);
        assert_eq!(report.available_dates, vec!["2025-09-27"]);
    }

    #[test]
    fn quoted_field_with_embedded_delimiter_and_quotes() {
        let text = format!(
            "{}\n\"B-1\",\"SKU, большой\",1,5,2025-09-27 10:00:00,\"Доставлен, \"\"вручён\"\"\"\n",
            FBS_HEADER,
        );
        let report = parse(&text).unwrap();
        assert_eq!(report.records[0].sku, "SKU, большой");
        assert_eq!(report.records[0].status, "доставлен, \"вручён\"");
    }

    #[test]
    fn semicolon_delimited_export() {
        let text = format!(
            "{}\n{}\n",
            FBS_HEADER.replace(',', ";"),
            "B-1;SKU-1;2;99,90;2025-09-27 10:00:00;Доставлен",
        );
        let options = ParseOptions { delimiter: ';' };
        let report = normalize_report(&text, &options).unwrap();
        assert_eq!(report.records[0].quantity, 2);
        assert_eq!(report.records[0].price, 99.90);
    }

    #[test]
    fn bom_is_stripped() {
        let text = format!(
            "\u{FEFF}{}\n{}\n",
            FBS_HEADER,
            fbs_row("B-1", "SKU-1", "1", "5", "2025-09-27 10:00:00", "Доставлен"),
        );
        let report = parse(&text).unwrap();
        assert_eq!(report.schema, ReportSchema::Fbs);
    }

    #[test]
    fn blank_lines_between_rows_are_skipped() {
        let text = format!(
            "{}\n\n{}\n\n",
            FBS_HEADER,
            fbs_row("B-1", "SKU-1", "1", "5", "2025-09-27 10:00:00", "Доставлен"),
        );
        let report = parse(&text).unwrap();
        assert_eq!(report.total_records, 1);
    }
}
