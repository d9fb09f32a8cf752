//! Scripted in-memory site for exercising the crawler and extractor.
//!
//! A [`FakeSite`] maps URLs to one or more HTML snapshots. Pages move to the
//! next snapshot when clicked (results lists growing under "show more") or
//! when read (views that finish rendering after a while). Gauges record how
//! many pages and browsers were opened so tests can check resource bounds.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::time::Duration;

use scraper::{Html, Selector};

use crate::error::ScrapeError;
use crate::page::{Browser, Launcher, Page};

/// When a scripted document moves to its next snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    OnClick,
    OnRead,
}

struct Document {
    states: Vec<String>,
    advance: Advance,
}

/// Counters shared by every browser and page of a site.
#[derive(Debug, Default)]
pub struct Gauges {
    pub launches: Cell<usize>,
    pub browsers_closed: Cell<usize>,
    pub pages_opened: Cell<usize>,
    pub open_pages: Cell<usize>,
    pub max_open_pages: Cell<usize>,
    pub clicks: Cell<usize>,
    pub popups_closed: Cell<usize>,
}

#[derive(Clone, Default)]
pub struct FakeSite {
    docs: Rc<RefCell<HashMap<String, Rc<Document>>>>,
    hung: Rc<RefCell<HashSet<String>>>,
    pending_popups: Rc<Cell<usize>>,
    refuse_pages: Rc<Cell<bool>>,
    pub gauges: Rc<Gauges>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a single static document at `url`.
    pub fn page(&self, url: &str, html: impl Into<String>) -> &Self {
        self.states(url, vec![html.into()], Advance::OnClick)
    }

    /// Serve a sequence of snapshots at `url`.
    pub fn states(&self, url: &str, states: Vec<String>, advance: Advance) -> &Self {
        self.docs
            .borrow_mut()
            .insert(url.to_string(), Rc::new(Document { states, advance }));
        self
    }

    /// Make loading `url` never finish.
    pub fn hang(&self, url: &str) -> &Self {
        self.hung.borrow_mut().insert(url.to_string());
        self
    }

    /// Popup windows to report on the next `close_popups` call.
    pub fn popups(&self, count: usize) -> &Self {
        self.pending_popups.set(count);
        self
    }

    /// Make every `new_page` call fail.
    pub fn refuse_pages(&self, refuse: bool) -> &Self {
        self.refuse_pages.set(refuse);
        self
    }

    pub fn launcher(&self) -> FakeLauncher {
        FakeLauncher { site: self.clone() }
    }

    pub fn browser(&self) -> FakeBrowser {
        FakeBrowser { site: self.clone() }
    }
}

#[derive(Clone)]
pub struct FakeLauncher {
    pub site: FakeSite,
}

impl Launcher for FakeLauncher {
    type Browser = FakeBrowser;

    async fn launch(&self) -> Result<FakeBrowser, ScrapeError> {
        let gauges = &self.site.gauges;
        gauges.launches.set(gauges.launches.get() + 1);
        Ok(self.site.browser())
    }
}

pub struct FakeBrowser {
    site: FakeSite,
}

impl Browser for FakeBrowser {
    type Page = FakePage;

    async fn new_page(&self) -> Result<FakePage, ScrapeError> {
        if self.site.refuse_pages.get() {
            return Err(ScrapeError::Config("page refused".to_string()));
        }
        let gauges = &self.site.gauges;
        gauges.pages_opened.set(gauges.pages_opened.get() + 1);
        gauges.open_pages.set(gauges.open_pages.get() + 1);
        if gauges.open_pages.get() > gauges.max_open_pages.get() {
            gauges.max_open_pages.set(gauges.open_pages.get());
        }
        // Let sibling extractions open their pages before this one proceeds.
        tokio::task::yield_now().await;

        Ok(FakePage {
            site: self.site.clone(),
            url: None,
            doc: None,
            state: 0,
        })
    }

    async fn close(self) -> Result<(), ScrapeError> {
        let gauges = &self.site.gauges;
        gauges.browsers_closed.set(gauges.browsers_closed.get() + 1);
        Ok(())
    }
}

pub struct FakePage {
    site: FakeSite,
    url: Option<String>,
    doc: Option<Rc<Document>>,
    state: usize,
}

impl FakePage {
    fn current(&self) -> Result<(&Document, &str), ScrapeError> {
        match &self.doc {
            Some(doc) => Ok((doc, doc.states[self.state.min(doc.states.len() - 1)].as_str())),
            None => Err(ScrapeError::Config("no document loaded".to_string())),
        }
    }

    fn matches(&self, selector: &str) -> Result<bool, ScrapeError> {
        let (_, html) = self.current()?;
        let selector = Selector::parse(selector)
            .map_err(|e| ScrapeError::Config(format!("bad selector {selector}: {e}")))?;
        Ok(Html::parse_document(html).select(&selector).next().is_some())
    }
}

impl Page for FakePage {
    async fn goto(&mut self, url: &str) -> Result<(), ScrapeError> {
        if self.site.hung.borrow().contains(url) {
            std::future::pending::<()>().await;
        }
        let doc = self.site.docs.borrow().get(url).cloned();
        match doc {
            Some(doc) if !doc.states.is_empty() => {
                self.url = Some(url.to_string());
                self.doc = Some(doc);
                self.state = 0;
                Ok(())
            }
            _ => Err(ScrapeError::Navigation {
                url: url.to_string(),
                reason: "404".to_string(),
            }),
        }
    }

    async fn current_url(&mut self) -> Result<String, ScrapeError> {
        self.url
            .clone()
            .ok_or_else(|| ScrapeError::Config("no document loaded".to_string()))
    }

    async fn content(&mut self) -> Result<String, ScrapeError> {
        let (doc, html) = self.current()?;
        let html = html.to_string();
        if doc.advance == Advance::OnRead && self.state + 1 < doc.states.len() {
            self.state += 1;
        }
        Ok(html)
    }

    async fn click(&mut self, selector: &str) -> Result<bool, ScrapeError> {
        if !self.matches(selector)? {
            return Ok(false);
        }
        let gauges = &self.site.gauges;
        gauges.clicks.set(gauges.clicks.get() + 1);
        let (doc, _) = self.current()?;
        if doc.advance == Advance::OnClick && self.state + 1 < doc.states.len() {
            self.state += 1;
        }
        Ok(true)
    }

    async fn wait_for(&mut self, selector: &str, _timeout: Duration) -> Result<bool, ScrapeError> {
        self.matches(selector)
    }

    async fn close_popups(&mut self) -> Result<usize, ScrapeError> {
        let closed = self.site.pending_popups.replace(0);
        let gauges = &self.site.gauges;
        gauges.popups_closed.set(gauges.popups_closed.get() + closed);
        Ok(closed)
    }

    async fn close(self) -> Result<(), ScrapeError> {
        let gauges = &self.site.gauges;
        gauges.open_pages.set(gauges.open_pages.get().saturating_sub(1));
        Ok(())
    }
}

// ── Fixture HTML ────────────────────────────────────────────────────────────

/// Origin every fixture URL lives under.
pub const ORIGIN: &str = "https://www.flashscore.pl";

/// Archive page listing seasons as `(label, href)` pairs.
pub fn archive_html(seasons: &[(&str, &str)]) -> String {
    let entries: String = seasons
        .iter()
        .map(|(label, href)| {
            format!(
                r#"<div class="archiveLatte__season"><a class="archiveLatte__text archiveLatte__text--clickable" href="{href}">{label}</a></div>"#
            )
        })
        .collect();
    format!("<html><body><div class=\"archive\">{entries}</div></body></html>")
}

/// Results view listing match hrefs, optionally with a "show more" link.
pub fn results_html(hrefs: &[String], load_more: bool) -> String {
    let rows: String = hrefs
        .iter()
        .map(|href| format!(r#"<div class="event__match"><a class="eventRowLink" href="{href}"></a></div>"#))
        .collect();
    let more = if load_more {
        r##"<div><div><div><a href="#" class="wclButtonLink">Pokaż więcej meczów</a></div></div></div>"##
    } else {
        "<div></div>"
    };
    format!(r#"<html><body><div id="live-table">{more}<div class="sportName">{rows}</div></div></body></html>"#)
}

/// Match page URL for an id, in the shape the site uses.
pub fn match_url(id: &str) -> String {
    format!("{ORIGIN}/mecz/{id}/?mid={id}")
}

/// Statistics view URL for [`match_url`].
pub fn stats_url(id: &str) -> String {
    format!("{ORIGIN}/mecz/{id}/szczegoly/statystyki/ogolnie/?mid={id}")
}

/// Everything a fixture match page shows.
#[derive(Debug, Clone)]
pub struct MatchFixture {
    pub home: Option<String>,
    pub away: Option<String>,
    pub score: Option<(u32, u32)>,
    pub start_time: String,
    pub status: String,
    pub referee: Option<(String, String)>,
    pub stadium: Option<(String, String)>,
    pub capacity: Option<String>,
    pub attendance: Option<String>,
    pub basic_stats: Vec<(String, String, String)>,
}

impl MatchFixture {
    pub fn new(home: &str, away: &str) -> Self {
        Self {
            home: Some(home.to_string()),
            away: Some(away.to_string()),
            score: Some((2, 1)),
            start_time: "21.07.2023 20:30".to_string(),
            status: "Koniec".to_string(),
            referee: Some(("Szymon Marciniak".to_string(), "Polska".to_string())),
            stadium: Some(("Stadion Miejski".to_string(), "Wrocław".to_string())),
            capacity: Some("42 771".to_string()),
            attendance: Some("12 345".to_string()),
            basic_stats: vec![(
                "Posiadanie piłki".to_string(),
                "55%".to_string(),
                "45%".to_string(),
            )],
        }
    }

    pub fn html(&self) -> String {
        let participant = |side: &str, name: &Option<String>| match name {
            Some(name) => format!(
                r#"<div class="duelParticipant__{side}"><div class="participant__participantName"><a href="/druzyna/x/">{name}</a></div></div>"#
            ),
            None => format!(r#"<div class="duelParticipant__{side}"></div>"#),
        };
        let score = match self.score {
            Some((h, a)) => format!(
                r#"<div class="detailScore__wrapper"><span>{h}</span><span>-</span><span>{a}</span></div>"#
            ),
            None => String::new(),
        };

        let mut info = String::new();
        if let Some((name, nat)) = &self.referee {
            info.push_str(&info_row("Sędzia:", &format!("<span>{name}</span><span>({nat})</span>")));
        }
        if let Some((name, city)) = &self.stadium {
            info.push_str(&info_row("Stadion:", &format!("<span>{name}</span><span>({city})</span>")));
        }
        if let Some(capacity) = &self.capacity {
            info.push_str(&info_row("Pojemność:", capacity));
        }
        if let Some(attendance) = &self.attendance {
            info.push_str(&info_row("Frekwencja:", attendance));
        }

        format!(
            r#"<html><body>
<div class="fixedHeaderDuel__detailStatus">{status}</div>
<div class="duelParticipant">
  <div class="duelParticipant__startTime"><div>{start}</div></div>
  {home}
  {score}
  {away}
</div>
<div class="stats">{stats}</div>
<div class="wcl-content_Vkmj9">{info}</div>
</body></html>"#,
            status = self.status,
            start = self.start_time,
            home = participant("home", &self.home),
            away = participant("away", &self.away),
            stats = stat_rows(&self.basic_stats),
        )
    }
}

fn info_row(label: &str, value: &str) -> String {
    format!(
        r#"<div class="wcl-infoLabelWrapper_DXbvw"><span>{label}</span></div><div class="wcl-infoValue_grawU">{value}</div>"#
    )
}

/// Statistic rows in the site's markup.
pub fn stat_rows(rows: &[(String, String, String)]) -> String {
    rows.iter()
        .map(|(category, home, away)| {
            format!(
                r#"<div data-testid="wcl-statistics"><div data-testid="wcl-statistics-value"><strong>{home}</strong></div><div data-testid="wcl-statistics-category"><strong>{category}</strong></div><div data-testid="wcl-statistics-value"><strong>{away}</strong></div></div>"#
            )
        })
        .collect()
}

/// Statistics view with titled sections of `(category, home, away)` rows.
pub fn sections_html(sections: &[(&str, Vec<(String, String, String)>)]) -> String {
    let body: String = sections
        .iter()
        .map(|(title, rows)| {
            format!(
                r#"<div class="section"><div class="section__title">{title}</div>{rows}</div>"#,
                rows = stat_rows(rows)
            )
        })
        .collect();
    format!(r#"<html><body><div class="statistics__sectionsWrapper_x1">{body}</div></body></html>"#)
}

/// Statistics view with rows but no sectioned breakdown.
pub fn flat_stats_html(rows: &[(String, String, String)]) -> String {
    format!("<html><body>{}</body></html>", stat_rows(rows))
}

/// Shorthand for a `(category, home, away)` row.
pub fn row(category: &str, home: &str, away: &str) -> (String, String, String) {
    (category.to_string(), home.to_string(), away.to_string())
}
