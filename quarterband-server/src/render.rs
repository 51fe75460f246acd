//! Scoreboard HTML rendering.
//!
//! Plain string assembly; the page is a single self-refreshing document
//! with one card per pick, no client-side framework.

use quarterband_scanner::config::ScannerConfig;
use quarterband_scanner::market::{Scoreboard, ScoredCandidate};

const STYLE: &str = "\
:root{--bg:#0b0f14;--card:#111826;--text:#e6edf3;--muted:#97a3ad;--border:#1f2937}\
*{box-sizing:border-box}body{margin:0;font-family:Inter,system-ui,Arial;background:var(--bg);color:var(--text)}\
header{padding:24px;border-bottom:1px solid var(--border)}h1{margin:0 0 8px 0;font-size:24px}\
header p{margin:0;color:var(--muted)}main{padding:24px}\
.empty{padding:24px;border:1px dashed var(--border);border-radius:12px;color:var(--muted)}\
.grid{display:grid;gap:16px;grid-template-columns:repeat(auto-fill,minmax(280px,1fr))}\
.card{background:var(--card);border:1px solid var(--border);border-radius:16px;padding:16px}\
.card-title{display:flex;align-items:center;justify-content:space-between;margin-bottom:8px}\
h2{margin:0;font-size:20px}\
.badge{background:rgba(91,156,255,.15);color:#b3d3ff;padding:4px 8px;border-radius:999px;font-size:12px;border:1px solid rgba(91,156,255,.35)}\
.row{display:flex;justify-content:space-between;padding:6px 0;border-bottom:1px dashed var(--border)}\
.row:last-of-type{border-bottom:none}.row.small{font-size:12px;color:var(--muted)}\
.footnote{padding:16px 24px;border-top:1px solid var(--border);color:var(--muted)}";

/// Render the full scoreboard page.
pub fn scoreboard_page(board: &Scoreboard, config: &ScannerConfig) -> String {
    let mut page = String::with_capacity(4_096);
    let refresh_seconds = config.refresh_interval.as_secs();

    page.push_str("<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\"/>");
    page.push_str("<title>QuarterBand 70/30</title>");
    page.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"/>");
    page.push_str(&format!(
        "<meta http-equiv=\"refresh\" content=\"{refresh_seconds}\">"
    ));
    page.push_str(&format!("<style>{STYLE}</style></head><body>"));

    page.push_str("<header><h1>QuarterBand 70/30</h1><p>");
    page.push_str(&format!(
        "Coinbase tokens in the ${:.2}\u{2013}${:.2} band with the highest heuristic chance to hit +70% in 30 days.",
        config.filter.price_min, config.filter.price_max
    ));
    page.push_str("</p></header><main>");

    if board.picks.is_empty() {
        page.push_str("<div class=\"empty\">No eligible tokens right now. Check back soon.</div>");
    } else {
        page.push_str("<div class=\"grid\">");
        for pick in &board.picks {
            page.push_str(&pick_card(pick));
        }
        page.push_str("</div>");
    }

    page.push_str("</main><footer class=\"footnote\"><p><strong>Disclaimer:</strong> ");
    page.push_str(
        "Heuristic screen, informational only, not financial advice. Crypto is volatile; you can lose capital.",
    );
    page.push_str("</p></footer></body></html>");
    page
}

fn pick_card(pick: &ScoredCandidate) -> String {
    let mut card = String::with_capacity(1_024);

    card.push_str("<article class=\"card\"><div class=\"card-title\">");
    card.push_str(&format!("<h2>{}</h2>", escape(&pick.symbol)));
    card.push_str(&format!(
        "<span class=\"badge\">P(\u{2265}+70%/30d): {:.1}%</span></div>",
        pick.probability_pct
    ));

    card.push_str(&row("Price", &format!("${:.4}", pick.price)));
    card.push_str(&row("24h Change", &fmt_pct(pick.pct_change_24h, 2)));
    card.push_str(&row("7d Change", &fmt_pct(pick.pct_change_7d, 2)));
    card.push_str(&row("Spread", &fmt_pct(pick.spread_pct, 3)));
    card.push_str(&row("24h Volume", &fmt_dollars(pick.dollar_volume_24h)));
    card.push_str(&row(
        "Risk (p50 / p90 DD)",
        &format!("{:.0}% / {:.0}%", pick.drawdown_p50_pct, pick.drawdown_p90_pct),
    ));

    card.push_str(&format!(
        "<div class=\"row small\"><div><strong>Score</strong></div><div>{:.2}</div></div>",
        pick.score
    ));
    card.push_str(&format!(
        "<footer><small>As of {}</small></footer></article>",
        pick.as_of.to_rfc3339()
    ));
    card
}

fn row(label: &str, value: &str) -> String {
    format!("<div class=\"row\"><div><strong>{label}</strong></div><div>{value}</div></div>")
}

fn fmt_pct(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(pct) => format!("{pct:.decimals$}%"),
        None => "\u{2014}".to_string(),
    }
}

fn fmt_dollars(value: Option<f64>) -> String {
    match value {
        Some(dollars) => format!("${}", thousands(dollars.round() as i64)),
        None => "\u{2014}".to_string(),
    }
}

/// Group an integer with comma separators: 10000000 → "10,000,000".
fn thousands(value: i64) -> String {
    let digits = value.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Minimal HTML escaping for exchange-sourced text.
fn escape(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            other => other.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use quarterband_scanner::market::GateReport;
    use smol_str::SmolStr;

    fn pick() -> ScoredCandidate {
        ScoredCandidate {
            product_id: SmolStr::new_static("ABC-USD"),
            symbol: SmolStr::new_static("ABC"),
            price: 0.15,
            pct_change_24h: Some(3.21),
            pct_change_7d: None,
            spread_pct: Some(0.2),
            dollar_volume_24h: Some(12_345_678.0),
            gates: GateReport {
                listed: true,
                in_band: true,
                liquid: true,
                tight: true,
            },
            score: 0.35,
            probability_pct: 21.0,
            drawdown_p50_pct: 18.0,
            drawdown_p90_pct: 32.0,
            as_of: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn empty_board_renders_empty_state() {
        let page = scoreboard_page(&Scoreboard::default(), &ScannerConfig::default());
        assert!(page.contains("No eligible tokens right now"));
        assert!(page.contains("http-equiv=\"refresh\" content=\"30\""));
    }

    #[test]
    fn picks_render_as_cards() {
        let board = Scoreboard {
            picks: vec![pick()],
            last_refresh: Some(DateTime::from_timestamp(1_700_000_000, 0).unwrap()),
        };
        let page = scoreboard_page(&board, &ScannerConfig::default());
        assert!(page.contains("<h2>ABC</h2>"));
        assert!(page.contains("21.0%"));
        assert!(page.contains("3.21%"));
        assert!(page.contains("$12,345,678"));
        // unknown 7d change renders as an em dash
        assert!(page.contains("\u{2014}"));
    }

    #[test]
    fn symbols_are_escaped() {
        let mut hostile = pick();
        hostile.symbol = SmolStr::new_static("<XSS>");
        let board = Scoreboard {
            picks: vec![hostile],
            last_refresh: None,
        };
        let page = scoreboard_page(&board, &ScannerConfig::default());
        assert!(page.contains("&lt;XSS&gt;"));
        assert!(!page.contains("<XSS>"));
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(10_000_000), "10,000,000");
        assert_eq!(thousands(1_234), "1,234");
    }
}
