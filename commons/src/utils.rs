//! Универсальные утилиты.

use chrono::NaiveDateTime;
use std::path::PathBuf;

/// Формат времени обновления котировки.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Формат полной временной метки (новости, снимки табло).
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Время в формате `HH:MM:SS`.
pub fn format_time(dt: &NaiveDateTime) -> String {
    dt.format(TIME_FORMAT).to_string()
}

/// Дата и время в формате `YYYY-MM-DD HH:MM:SS`.
pub fn format_date_time(dt: &NaiveDateTime) -> String {
    dt.format(DATE_TIME_FORMAT).to_string()
}

/// Округлить до сотых (цены, изменения и проценты показываются с двумя
/// знаками после запятой).
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Предоставить родительский каталог проекта.
///
/// Для `debug` это будет директория расположения `cargo.toml`, а для `release`
/// расположение скомпилированного файла.
#[cfg(debug_assertions)]
pub fn get_project_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

#[cfg(not(debug_assertions))]
pub fn get_project_root() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Предоставить корневую директорию всего проекта.
///
/// В зависимости от статуса проекта предоставляет путь к корневой директории
/// `workspace`, а для `release` к месту расположения скомпилированного файла,
/// что также является корневым путём.
pub fn get_workspace_root() -> PathBuf {
    let project_root = get_project_root();
    if cfg!(debug_assertions) {
        project_root
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or(project_root)
    } else {
        project_root
    }
}
