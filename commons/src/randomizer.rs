//! Инструменты для генерации случайных данных и последовательностей.
//!
//! Все функции принимают источник случайности явно: в рабочем режиме это
//! генератор, инициализированный энтропией ОС, в тестах — генератор с
//! фиксированным зерном (см. [`make_rng`]).

use rand::distr::uniform::SampleUniform;
use rand::prelude::*;

/// Создать генератор случайных чисел.
///
/// - `Some(seed)` — детерминированная последовательность (воспроизводимые
///   прогоны и тесты)
/// - `None` — новая последовательность при каждом вызове
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Выбрать случайный элемент из среза.
///
/// ## Пример
///
/// ```
/// use commons::randomizer::{make_rng, random_choice};
///
/// let mut rng = make_rng(Some(7));
/// let seq = ["one", "two", "three"];
/// let result = random_choice(&mut rng, &seq).unwrap();
///
/// println!("I said: {}", result);
/// ```
///
/// ## Returns
///
/// Ссылка на случайный элемент. Если срез пустой, то `None`.
pub fn random_choice<'a, R, T>(rng: &mut R, seq: &'a [T]) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    seq.choose(rng)
}

/// Генерировать случайное число из заданного числового диапазона
/// (включительно `max`).
///
/// ## Пример
///
/// ```
/// use commons::randomizer::{make_rng, random};
///
/// let mut rng = make_rng(None);
/// let num = random(&mut rng, 10, 25);
/// println!("Lucky num: {}", num);
/// ```
pub fn random<R, T>(rng: &mut R, min: T, max: T) -> T
where
    R: Rng + ?Sized,
    T: SampleUniform + PartialOrd,
{
    rng.random_range(min..=max)
}

/// Обёртка для функции [`random`]: позволяет генерировать случайное число
/// из диапазона между двумя числами, заданным в кортеже.
pub fn random_by_tuple<R, T>(rng: &mut R, t: (T, T)) -> T
where
    R: Rng + ?Sized,
    T: SampleUniform + PartialOrd,
{
    random(rng, t.0, t.1)
}

/// Случайное значение `true` или `false`, с учётом предоставленного критерия
/// вероятности.
///
/// ## Args
///
/// - `prob` — вероятность результата быть `true`. Значения от 0 до 1.
///
/// Паникует, если `prob < 0` или `prob > 1`.
pub fn random_bool<R: Rng + ?Sized>(rng: &mut R, prob: f64) -> bool {
    rng.random_bool(prob)
}

/// Равномерное случайное число из `[0, 1)`.
pub fn unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random::<f64>()
}

/// Равномерное случайное число из `[-1, 1)`.
pub fn signed_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    2.0 * unit(rng) - 1.0
}
