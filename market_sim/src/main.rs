//! Market Sim. Консольное табло котировок: индексы, сырьё, облигации и
//! валютный индекс с тиковым обновлением цен, лентой новостей и
//! макроиндикаторами. Все данные синтетические.

#![warn(missing_docs)]

use commons::errors::MarketError;
use commons::models::AssetSeed;
use commons::randomizer::make_rng;
use commons::traits::{Clock, SystemClock};
use commons::utils::get_workspace_root;
use crossbeam_channel::RecvTimeoutError;
use log::{error, info, warn};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

mod board;
mod charts;
mod cli;
mod config;
mod indicators;
mod market_hours;
mod news;
mod render;
mod seeds;
mod sentiment;
mod session;
mod simulator;

use board::{Board, BoardSnapshot};
use cli::{RunSettings, parse_cli_args};
use commons::init_simple_logger;
use config::{
    DATA_FOLDER, LOG_FOLDER, NEWS_COUNT, NEWS_STEP_MINUTES, SEEDS_FILENAME,
    SNAPSHOT_CHANNEL_CAPACITY,
};
use render::{OutputFormat, json_line};
use session::SimulationSession;

/// Как долго ждать снимок, прежде чем снова проверить флаг CTRL-C.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

fn main() -> ExitCode {
    let settings = parse_cli_args();

    if let Err(e) = init_logger() {
        eprintln!("Ошибка: {e}");
        return ExitCode::FAILURE;
    }

    info!("Market Sim запущен: {:?}", settings);

    match run(&settings) {
        Ok(()) => {
            info!("Market Sim завершил работу");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Ошибка работы приложения: {e}");
            eprintln!("Ошибка: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Организатор работы табло.
fn run(settings: &RunSettings) -> Result<(), MarketError> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .map_err(|e| MarketError::session_err(format!("ошибка установки Ctrl-C: {e}")))?;

    let seeds = settings.market.filter(load_run_seeds(settings)?);
    if seeds.is_empty() {
        return Err(MarketError::seed_err(format!(
            "нет инструментов для рынка {}",
            settings.market
        )));
    }

    let mut rng = make_rng(settings.seed);

    if settings.indicators {
        print_indicators(settings)?;
    }
    if settings.news {
        let now = SystemClock.now().naive_local();
        let feed = news::generate_news(&mut rng, now, NEWS_COUNT, NEWS_STEP_MINUTES)?;
        let selected = news::filter_news(&feed, settings.news_category);
        match settings.format {
            OutputFormat::Text => println!("{}\n", render::render_news(&selected)),
            OutputFormat::Json => {
                for item in selected {
                    println!("{}", json_line(item)?);
                }
            }
        }
    }

    let board = Board::new(&seeds, rng, Box::new(SystemClock), settings.hours)?;
    if let Some(id) = &settings.asset
        && board.find(id).is_none()
    {
        return Err(MarketError::value_err(format!(
            "инструмент '{id}' не найден (рынок {})",
            settings.market
        )));
    }

    show(&board.snapshot(), settings)?;
    if settings.ticks == Some(0) {
        return Ok(());
    }

    let session = SimulationSession::start(board, settings.refresh, SNAPSHOT_CHANNEL_CAPACITY)?;
    if settings.format == OutputFormat::Text {
        println!("\nЗавершить работу табло с помощью CTRL-C/CTRL-BREAK.\n");
    }

    let mut shown = 0u64;
    while running.load(Ordering::SeqCst) {
        match session.snapshots().recv_timeout(POLL_INTERVAL) {
            Ok(snapshot) => {
                show(&snapshot, settings)?;
                shown += 1;
                if settings.ticks.is_some_and(|limit| shown >= limit) {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                warn!("Тиковая задача прекратила работу");
                break;
            }
        }
    }

    if !running.load(Ordering::SeqCst) {
        info!("Работа табло прервана...");
    }
    session.stop()?;
    Ok(())
}

/// Исходные записи: из `--seeds`, из `data/assets.json` или встроенные.
fn load_run_seeds(settings: &RunSettings) -> Result<Vec<AssetSeed>, MarketError> {
    if let Some(path) = &settings.seeds_path {
        info!("Загрузка инструментов из {}", path.display());
        return seeds::load_seeds(path);
    }

    let default_path = get_workspace_root().join(DATA_FOLDER).join(SEEDS_FILENAME);
    if default_path.exists() {
        info!("Загрузка инструментов из {}", default_path.display());
        seeds::load_seeds(&default_path)
    } else {
        warn!(
            "Файл {} не найден, используется встроенный набор",
            default_path.display()
        );
        Ok(seeds::builtin_seeds())
    }
}

/// Показать снимок: табло целиком или карточку одного инструмента.
fn show(snapshot: &BoardSnapshot, settings: &RunSettings) -> Result<(), MarketError> {
    let asset = settings
        .asset
        .as_deref()
        .and_then(|id| snapshot.assets.iter().find(|a| a.id == id));

    match (settings.format, asset) {
        (OutputFormat::Text, Some(asset)) => {
            println!("{}\n", render::render_asset(asset, settings.range))
        }
        (OutputFormat::Text, None) => println!("{}\n", render::render_board(snapshot)),
        (OutputFormat::Json, Some(asset)) => println!("{}", json_line(asset)?),
        (OutputFormat::Json, None) => println!("{}", json_line(snapshot)?),
    }
    Ok(())
}

/// Показать макроиндикаторы: все или один, выбранный `--indicator`.
fn print_indicators(settings: &RunSettings) -> Result<(), MarketError> {
    let all = indicators::builtin_indicators();

    if let Some(id) = &settings.indicator {
        let indicator = indicators::find_indicator(&all, id)
            .ok_or_else(|| MarketError::value_err(format!("индикатор '{id}' не найден")))?;
        match settings.format {
            OutputFormat::Text => println!("{}\n", render::render_indicator(indicator)),
            OutputFormat::Json => println!("{}", json_line(indicator)?),
        }
        return Ok(());
    }

    match settings.format {
        OutputFormat::Text => println!("{}\n", render::render_indicators(&all)),
        OutputFormat::Json => {
            for item in &all {
                println!("{}", json_line(item)?);
            }
        }
    }
    Ok(())
}

/// Инициализировать логгер приложения.
///
/// Используется метод [`init_simple_logger`] из крейта [`commons`].
fn init_logger() -> Result<(), MarketError> {
    let log_folder = get_workspace_root().join(LOG_FOLDER);
    let app_name = env!("CARGO_PKG_NAME");
    init_simple_logger(app_name, log_folder)?;
    Ok(())
}
