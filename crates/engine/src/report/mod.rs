mod normalizer;
pub(crate) mod schema;
pub(crate) mod timestamp;

pub use normalizer::normalize_report;

use serde::Deserialize;
use thiserror::Error;

/// Терминальные ошибки нормализации отчёта
///
/// Построчные проблемы (битая строка, нечисловая цена) не попадают
/// сюда: такие строки отбрасываются или получают значения по умолчанию,
/// а диагностика уходит в лог.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report is empty or has no data rows")]
    EmptyInput,

    #[error("could not determine report type (FBO/FBS) from headers")]
    UnrecognizedSchema,

    #[error("no valid order dates found in report")]
    NoDatesFound,
}

/// Настройки разбора выгрузки
///
/// Ozon выгружает CSV через запятую, но часть кабинетов отдаёт файлы
/// с точкой с запятой. Разделитель задаётся конфигурацией деплоя,
/// парсер его не угадывает.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub delimiter: char,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl ParseOptions {
    /// csv работает с байтами; не-ASCII разделитель заменяем запятой
    pub(crate) fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            b','
        }
    }
}
