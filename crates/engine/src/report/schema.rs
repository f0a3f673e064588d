use contracts::report::ReportSchema;

/// Одно нормализуемое поле: имена колонок-кандидатов (в нижнем
/// регистре) и позиционный запасной индекс, если поиск по имени
/// не дал непустого значения.
pub(crate) struct FieldMapping {
    pub names: &'static [&'static str],
    pub fallback: usize,
}

/// Таблица соответствия колонок выгрузки полям [`OrderRecord`]
/// для одной схемы отчёта.
///
/// [`OrderRecord`]: contracts::report::OrderRecord
pub(crate) struct SchemaDescriptor {
    pub schema: ReportSchema,
    pub order_id: FieldMapping,
    pub sku: FieldMapping,
    pub quantity: FieldMapping,
    pub price: FieldMapping,
    pub created_at: FieldMapping,
    pub status: FieldMapping,
}

static FBO: SchemaDescriptor = SchemaDescriptor {
    schema: ReportSchema::Fbo,
    order_id: FieldMapping { names: &["номер заказа"], fallback: 0 },
    sku: FieldMapping { names: &["артикул"], fallback: 6 },
    quantity: FieldMapping { names: &["количество"], fallback: 8 },
    price: FieldMapping { names: &["цена"], fallback: 13 },
    created_at: FieldMapping { names: &["дата создания"], fallback: 15 },
    status: FieldMapping { names: &["статус"], fallback: 16 },
};

static FBS: SchemaDescriptor = SchemaDescriptor {
    schema: ReportSchema::Fbs,
    order_id: FieldMapping { names: &["№ заказа"], fallback: 0 },
    sku: FieldMapping { names: &["артикул продавца", "артикул"], fallback: 1 },
    quantity: FieldMapping { names: &["кол-во", "количество"], fallback: 2 },
    price: FieldMapping { names: &["цена"], fallback: 3 },
    created_at: FieldMapping { names: &["дата создания"], fallback: 4 },
    status: FieldMapping { names: &["статус"], fallback: 5 },
};

/// Определяет схему отчёта по заголовку.
///
/// FBO-выгрузка содержит колонку «Номер заказа», FBS — «№ заказа».
/// Сравнение регистронезависимое по вхождению подстроки, чтобы
/// пережить разночтения шапок между версиями кабинета.
pub(crate) fn detect(headers: &csv::StringRecord) -> Option<&'static SchemaDescriptor> {
    let lower: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();

    if lower.iter().any(|h| h.contains("номер заказа")) {
        return Some(&FBO);
    }
    if lower.iter().any(|h| h.contains("№ заказа")) {
        return Some(&FBS);
    }
    None
}

/// Поле, привязанное к конкретному заголовку один раз на весь разбор
pub(crate) struct ResolvedField {
    named: Option<usize>,
    fallback: usize,
}

impl ResolvedField {
    fn bind(mapping: &FieldMapping, headers_lower: &[String]) -> Self {
        let named = mapping
            .names
            .iter()
            .find_map(|name| headers_lower.iter().position(|h| h == name));
        Self {
            named,
            fallback: mapping.fallback,
        }
    }

    /// Значение поля из строки: именованная колонка, если она есть и
    /// непуста, иначе позиционный индекс.
    pub fn pick<'a>(&self, row: &'a csv::StringRecord) -> &'a str {
        if let Some(idx) = self.named {
            if let Some(value) = row.get(idx) {
                if !value.is_empty() {
                    return value;
                }
            }
        }
        row.get(self.fallback).unwrap_or("")
    }
}

pub(crate) struct ResolvedSchema {
    pub schema: ReportSchema,
    pub order_id: ResolvedField,
    pub sku: ResolvedField,
    pub quantity: ResolvedField,
    pub price: ResolvedField,
    pub created_at: ResolvedField,
    pub status: ResolvedField,
}

impl SchemaDescriptor {
    /// Привязывает таблицу полей к фактическому заголовку выгрузки
    pub fn resolve(&self, headers: &csv::StringRecord) -> ResolvedSchema {
        let lower: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        ResolvedSchema {
            schema: self.schema,
            order_id: ResolvedField::bind(&self.order_id, &lower),
            sku: ResolvedField::bind(&self.sku, &lower),
            quantity: ResolvedField::bind(&self.quantity, &lower),
            price: ResolvedField::bind(&self.price, &lower),
            created_at: ResolvedField::bind(&self.created_at, &lower),
            status: ResolvedField::bind(&self.status, &lower),
        }
    }
}
