//! Сессия симуляции: табло и тиковая задача с явным запуском и остановкой.

use crate::board::{Board, BoardSnapshot};
use commons::errors::MarketError;
use crossbeam_channel::{Receiver, SendTimeoutError, Sender, bounded, select, tick};
use log::{error, info, warn};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Имя потока тиковой задачи.
const TICKER_THREAD_NAME: &str = "market-ticker";

/// Сессия симуляции.
///
/// Сессия исключительно владеет табло: после [`SimulationSession::start`]
/// табло живёт в потоке тиковой задачи, наружу уходят только снимки.
/// Задача останавливается методом [`SimulationSession::stop`] или при
/// уничтожении сессии.
///
/// ## Пример
///
/// ```ignore
/// let session = SimulationSession::start(board, Duration::from_secs(1), 16)?;
/// let snapshot = session.snapshots().recv()?;
/// let board = session.stop()?;
/// ```
pub struct SimulationSession {
    /// Закрытие этого канала — сигнал остановки.
    shutdown: Option<Sender<()>>,
    handle: Option<JoinHandle<Board>>,
    snapshots: Receiver<BoardSnapshot>,
}

impl SimulationSession {
    /// Запустить тиковую задачу.
    ///
    /// ## Args
    ///
    /// - `board` — табло, которым будет владеть задача
    /// - `period` — период тика
    /// - `capacity` — ёмкость канала снимков
    ///
    /// ## Ошибки
    ///
    /// [`MarketError::ValueError`] при нулевом периоде или ёмкости,
    /// [`MarketError::Io`] если поток не удалось создать.
    pub fn start(board: Board, period: Duration, capacity: usize) -> Result<Self, MarketError> {
        if period.is_zero() {
            return Err(MarketError::value_err("период тика должен быть больше нуля"));
        }
        if capacity == 0 {
            return Err(MarketError::value_err("ёмкость канала должна быть больше нуля"));
        }

        let (snapshot_tx, snapshot_rx) = bounded(capacity);
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);

        let handle = thread::Builder::new()
            .name(TICKER_THREAD_NAME.into())
            .spawn(move || run_ticker(board, period, snapshot_tx, shutdown_rx))?;

        info!("Сессия симуляции запущена, период {} мс", period.as_millis());

        Ok(Self {
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
            snapshots: snapshot_rx,
        })
    }

    /// Канал снимков табло.
    ///
    /// Получатель можно клонировать; после остановки сессии канал
    /// закрывается.
    pub fn snapshots(&self) -> &Receiver<BoardSnapshot> {
        &self.snapshots
    }

    /// Остановить тиковую задачу и вернуть табло.
    ///
    /// ## Ошибки
    ///
    /// [`MarketError::SessionError`], если поток задачи завершился паникой.
    pub fn stop(mut self) -> Result<Board, MarketError> {
        match self.halt() {
            Some(Ok(board)) => {
                info!("Сессия симуляции остановлена после {} тиков", board.ticks());
                Ok(board)
            }
            Some(Err(_)) => Err(MarketError::session_err("тиковая задача завершилась паникой")),
            None => Err(MarketError::session_err("сессия уже остановлена")),
        }
    }

    /// Подать сигнал остановки и дождаться завершения потока.
    fn halt(&mut self) -> Option<thread::Result<Board>> {
        drop(self.shutdown.take());
        self.handle.take().map(JoinHandle::join)
    }
}

impl Drop for SimulationSession {
    fn drop(&mut self) {
        if let Some(Err(_)) = self.halt() {
            error!("Тиковая задача завершилась паникой");
        }
    }
}

/// Цикл тиковой задачи.
///
/// Завершается по сигналу остановки или если получатель снимков отключился.
/// Возвращает табло владельцу сессии.
fn run_ticker(
    mut board: Board,
    period: Duration,
    tx: Sender<BoardSnapshot>,
    shutdown: Receiver<()>,
) -> Board {
    info!("Тиковая задача запущена");
    let ticker = tick(period);

    loop {
        select! {
            recv(shutdown) -> _ => break,
            recv(ticker) -> _ => {
                board.tick();
                match tx.send_timeout(board.snapshot(), period) {
                    Ok(_) => (),
                    Err(SendTimeoutError::Timeout(_)) => {
                        warn!("Канал снимков занят (timeout), тик {} пропущен", board.ticks());
                    }
                    Err(SendTimeoutError::Disconnected(_)) => {
                        warn!("Канал снимков закрыт");
                        break;
                    }
                }
            }
        }
    }

    info!("Тиковая задача остановлена");
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::HoursMode;
    use crate::seeds::builtin_seeds;
    use chrono::DateTime;
    use commons::randomizer::make_rng;
    use commons::traits::FixedClock;

    fn board() -> Board {
        let at = DateTime::parse_from_rfc3339("2025-06-02T10:15:30+08:00").unwrap();
        Board::new(
            &builtin_seeds(),
            make_rng(Some(41)),
            Box::new(FixedClock(at)),
            HoursMode::Static,
        )
        .unwrap()
    }

    #[test]
    fn zero_period_is_rejected() {
        let res = SimulationSession::start(board(), Duration::ZERO, 4);
        assert!(matches!(res, Err(MarketError::ValueError(_))));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let res = SimulationSession::start(board(), Duration::from_millis(5), 0);
        assert!(matches!(res, Err(MarketError::ValueError(_))));
    }

    #[test]
    fn snapshots_arrive_in_tick_order() {
        let session = SimulationSession::start(board(), Duration::from_millis(5), 4).unwrap();

        let ticks: Vec<u64> = (0..3)
            .map(|_| {
                session
                    .snapshots()
                    .recv_timeout(Duration::from_secs(5))
                    .unwrap()
                    .tick
            })
            .collect();
        assert_eq!(ticks, [1, 2, 3]);

        let board = session.stop().unwrap();
        assert!(board.ticks() >= 3);
    }

    #[test]
    fn stop_closes_snapshot_channel() {
        let session = SimulationSession::start(board(), Duration::from_millis(5), 2).unwrap();
        let rx = session.snapshots().clone();
        rx.recv_timeout(Duration::from_secs(5)).unwrap();

        session.stop().unwrap();

        // Оставшиеся снимки вычитываются, затем канал закрыт.
        while rx.try_recv().is_ok() {}
        assert!(rx.recv_timeout(Duration::from_secs(1)).is_err());
        assert!(rx.is_empty());
    }

    #[test]
    fn drop_releases_ticker() {
        let session = SimulationSession::start(board(), Duration::from_millis(5), 2).unwrap();
        let rx = session.snapshots().clone();

        drop(session);

        while rx.try_recv().is_ok() {}
        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(1)),
            Err(crossbeam_channel::RecvTimeoutError::Disconnected)
        ));
    }
}
