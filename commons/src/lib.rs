use crate::errors::MarketError;
use log::*;
use serde::de::DeserializeOwned;
use simplelog::{CombinedLogger, Config, WriteLogger};
use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub mod errors;
pub mod models;
pub mod randomizer;
pub mod traits;
pub mod utils;

/// Загрузить массив записей из JSON-файла.
///
/// ## Пример
///
/// ```no_run
/// use commons::load_json_records;
/// use commons::models::AssetSeed;
/// use commons::utils::get_workspace_root;
///
/// let path_to_file = get_workspace_root().join("data").join("assets.json");
/// let seeds: Vec<AssetSeed> = load_json_records(&path_to_file).unwrap();
///
/// println!("Data: {:?}", seeds);
/// ```
///
/// ## Ошибки
///
/// - [`MarketError::Io`] — файл не удалось открыть
/// - [`MarketError::Json`] — содержимое не соответствует формату
/// - [`MarketError::SeedError`] — массив записей пустой
pub fn load_json_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, MarketError> {
    let file = File::open(path)?;
    let records: Vec<T> = serde_json::from_reader(BufReader::new(file))?;

    if records.is_empty() {
        return Err(MarketError::seed_err(format!(
            "файл {} не содержит записей",
            path.display()
        )));
    }
    Ok(records)
}

/// Фабрика по созданию индивидуальных логгеров для приложений.
///
/// Инициализация требуется один раз при запуске приложения. Далее используются
/// стандартные макросы [`log::info`], [`log::warn`], [`log::error`] для
/// логирования событий.
///
/// ## Args
///
/// - `app_name` — название приложения (будет использовано для создания файла)
/// - `log_dir` — путь к директории расположения log-файлов (при отсутствии
///   пытается создать)
///
/// ## Пример
///
/// ```no_run
/// use log::*;
/// use commons::init_simple_logger;
/// use commons::utils::get_workspace_root;
///
/// let log_dir = get_workspace_root().join("log");
/// init_simple_logger("app_name", log_dir).unwrap();
///
/// info!("Всё в порядке");
/// warn!("Рынок штормит");
/// ```
///
/// ## Ошибки
///
/// Возвращает [`MarketError::Io`] при ошибке создания директории или
/// log-файла, [`MarketError::ValueError`] при повторной инициализации логгера.
pub fn init_simple_logger(app_name: &str, log_dir: PathBuf) -> Result<PathBuf, MarketError> {
    let config = Config::default();
    let log_file_path = log_dir.join(format!("{}.log", app_name));

    if !log_dir.exists() {
        fs::create_dir_all(&log_dir)?;
    }

    let log_file = File::create(&log_file_path)?;
    let logger = WriteLogger::new(LevelFilter::Info, config, log_file);

    CombinedLogger::init(vec![logger])
        .map_err(|e| MarketError::value_err(format!("ошибка инициализации логгера: {e}")))?;

    Ok(log_file_path)
}
