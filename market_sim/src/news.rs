//! Новостная лента: генерация сообщений по шаблонам и фильтр по рубрикам.

use chrono::{NaiveDateTime, TimeDelta};
use commons::errors::MarketError;
use commons::models::{NewsCategory, NewsItem};
use commons::randomizer::{random, random_choice};
use commons::utils::format_date_time;
use rand::Rng;

/// Источник шаблона новости.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Desk {
    /// США и мир.
    Global,
    /// Китай.
    China,
}

impl Desk {
    fn url(&self) -> &'static str {
        match self {
            Desk::Global => "https://www.reuters.com",
            Desk::China => "https://www.cls.cn",
        }
    }

    fn summary(&self, title: &str) -> String {
        match self {
            Desk::Global => format!(
                "Reuters reports: {title}. Analysts say the news may move markets; \
                 investors should watch for follow-up details."
            ),
            Desk::China => format!(
                "Cailian Press: {title}. Industry observers read it as a positive signal \
                 that may lift confidence in related sectors."
            ),
        }
    }
}

struct Template {
    desk: Desk,
    category: NewsCategory,
    source: &'static str,
    title: &'static str,
    tags: &'static [&'static str],
}

#[rustfmt::skip]
const TEMPLATES: &[Template] = &[
    Template { desk: Desk::Global, category: NewsCategory::Earnings, source: "Reuters", title: "Nvidia Q3 revenue up {num}% year on year as AI chip demand still outstrips supply", tags: &["US stocks", "AI", "earnings"] },
    Template { desk: Desk::Global, category: NewsCategory::Earnings, source: "Reuters", title: "Microsoft Copilot users hit a record, cloud revenue beats estimates", tags: &["US stocks", "AI", "Microsoft"] },
    Template { desk: Desk::Global, category: NewsCategory::Earnings, source: "Reuters", title: "Tesla Cybertruck ramp-up on track, margins expected to recover", tags: &["US stocks", "EV", "Tesla"] },
    Template { desk: Desk::Global, category: NewsCategory::Macro, source: "Reuters", title: "Fed minutes: inflation remains sticky, rate cuts need more data", tags: &["macro", "Fed", "USD"] },
    Template { desk: Desk::Global, category: NewsCategory::Macro, source: "Reuters", title: "US nonfarm payrolls for month {month} rise by {num}0 thousand, well above forecasts", tags: &["macro", "payrolls", "Treasuries"] },
    Template { desk: Desk::Global, category: NewsCategory::Tech, source: "Reuters", title: "OpenAI releases a preview of its next model with much stronger reasoning", tags: &["tech", "AI", "US stocks"] },
    Template { desk: Desk::China, category: NewsCategory::CentralBank, source: "Cailian Press", title: "PBOC: will use a range of monetary tools to keep liquidity reasonably ample", tags: &["central bank", "macro", "A-shares"] },
    Template { desk: Desk::China, category: NewsCategory::CentralBank, source: "Cailian Press", title: "Galaxy Securities: room opens for LPR cut, positive for property and the real economy", tags: &["rates", "property", "opinion"] },
    Template { desk: Desk::China, category: NewsCategory::Macro, source: "Cailian Press", title: "NDRC: speed up digital infrastructure to grow the digital economy", tags: &["policy", "tech", "A-shares"] },
    Template { desk: Desk::China, category: NewsCategory::Earnings, source: "Cailian Press", title: "CATL unveils Shenxing Plus battery with range above 1000 km", tags: &["A-shares", "EV", "tech"] },
    Template { desk: Desk::China, category: NewsCategory::Tech, source: "Cailian Press", title: "Huawei Mate 70 pre-orders top one million, supply chain stocks rally", tags: &["tech", "Huawei", "A-shares"] },
    Template { desk: Desk::China, category: NewsCategory::Macro, source: "Cailian Press", title: "Ministry of Finance: more proactive fiscal policy to back innovation and manufacturing", tags: &["policy", "macro", "A-shares"] },
];

/// Сгенерировать ленту из `count` новостей.
///
/// Новость с индексом `i` датирована `now - i * step_minutes`, т. е. лента
/// упорядочена от свежих к старым.
///
/// ## Ошибки
///
/// [`MarketError::TimeError`], если метка времени выходит за пределы
/// календаря.
pub fn generate_news<R: Rng + ?Sized>(
    rng: &mut R,
    now: NaiveDateTime,
    count: usize,
    step_minutes: i64,
) -> Result<Vec<NewsItem>, MarketError> {
    let mut items = Vec::with_capacity(count);

    for i in 0..count {
        let Some(template) = random_choice(rng, TEMPLATES) else {
            break;
        };
        let num: u32 = random(rng, 10, 59);
        let month: u32 = random(rng, 1, 12);
        let title = template
            .title
            .replace("{num}", &num.to_string())
            .replace("{month}", &month.to_string());

        let published = TimeDelta::try_minutes(step_minutes * i as i64)
            .and_then(|back| now.checked_sub_signed(back))
            .ok_or_else(|| MarketError::time_err(format!("метка новости {i} вне диапазона")))?;

        items.push(NewsItem {
            id: format!("news-{i}"),
            summary: template.desk.summary(&title),
            title,
            source: template.source.to_string(),
            timestamp: format_date_time(&published),
            tags: template.tags.iter().map(|t| t.to_string()).collect(),
            url: template.desk.url().to_string(),
            category: template.category,
        });
    }

    Ok(items)
}

/// Новости выбранной рубрики; `None` — все.
pub fn filter_news(items: &[NewsItem], category: Option<NewsCategory>) -> Vec<&NewsItem> {
    items
        .iter()
        .filter(|n| category.is_none_or(|c| n.category == c))
        .collect()
}
