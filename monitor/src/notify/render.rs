//! HTML rendering of spread alerts. Pure: same event in, same markup out.

use chrono::NaiveDateTime;
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::quote::Pair;
use crate::spread::format_pct;
use crate::time::format_timestamp;

/// Everything an alert message shows. Built per alert and dropped after sending.
#[derive(Debug, Clone)]
pub struct AlertEvent {
    pub pair: Pair,
    pub price_a: f64,
    pub price_b: f64,
    pub name_a: String,
    pub name_b: String,
    pub change_a: f64,
    pub change_b: f64,
    pub spread: f64,
    pub threshold: f64,
    pub timestamp: NaiveDateTime,
}

fn change_color(change: f64) -> &'static str {
    if change > 0.0 { "red" } else { "green" }
}

fn instrument_row(code: &str, name: &str, price: f64, change: f64) -> String {
    format!(
        concat!(
            r#"<tr style="border-top:1px solid #ccc;">"#,
            r#"<td style="padding:5px;"><b>{code}</b></td>"#,
            r#"<td style="padding:5px; color:#555;">{name}</td>"#,
            r#"<td style="padding:5px;"><b>{price:.2}</b></td>"#,
            r#"<td style="padding:5px; color:{color};">{change}</td>"#,
            "</tr>"
        ),
        code = encode_text(code),
        name = encode_text(name),
        price = price,
        color = change_color(change),
        change = format_pct(change),
    )
}

/// Renders the alert card; `img_url` adds a centred image above the title.
pub fn render_alert(event: &AlertEvent, img_url: Option<&str>) -> String {
    let img_html = img_url
        .map(|url| {
            format!(
                r#"<div style="text-align:center;"><img src="{}" alt="提醒图" style="width:120px;height:auto;margin-bottom:10px;"></div>"#,
                encode_double_quoted_attribute(url)
            )
        })
        .unwrap_or_default();

    let spread_color = if event.spread.abs() >= event.threshold {
        "red"
    } else {
        "black"
    };

    format!(
        concat!(
            r#"<div style="font-family:微软雅黑, Arial; line-height:1.5; background:#fefefe; padding:15px; border:1px solid #ddd; border-radius:10px;">"#,
            "{img}",
            r#"<h2 style="color:#333; text-align:center;">⚠️ 股票涨跌幅差提醒</h2>"#,
            r#"<table style="width:100%; border-collapse: collapse; margin-top:10px;">"#,
            "<tr>",
            r#"<th style="text-align:left; padding:5px;">股票</th>"#,
            r#"<th style="text-align:left; padding:5px;">公司</th>"#,
            r#"<th style="text-align:left; padding:5px;">最新价</th>"#,
            r#"<th style="text-align:left; padding:5px;">今日涨幅</th>"#,
            "</tr>",
            "{row_a}",
            "{row_b}",
            "</table>",
            r#"<div style="margin-top:10px; font-size:16px;">"#,
            r#"<b>差值:</b> <span style="color:{spread_color}; font-size:18px;">{spread}</span> （阈值: {threshold}）"#,
            "</div>",
            r#"<div style="margin-top:10px; font-size:12px; color:#999;">更新时间: {ts}</div>"#,
            "</div>"
        ),
        img = img_html,
        row_a = instrument_row(event.pair.a.as_str(), &event.name_a, event.price_a, event.change_a),
        row_b = instrument_row(event.pair.b.as_str(), &event.name_b, event.price_b, event.change_b),
        spread_color = spread_color,
        spread = format_pct(event.spread),
        threshold = format_pct(event.threshold),
        ts = format_timestamp(&event.timestamp),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::InstrumentCode;
    use chrono::NaiveDate;

    fn event(threshold: f64) -> AlertEvent {
        AlertEvent {
            pair: Pair::new(InstrumentCode::new("600000"), InstrumentCode::new("000001")),
            price_a: 105.0,
            price_b: 97.0,
            name_a: "浦发银行".into(),
            name_b: "平安银行".into(),
            change_a: 0.05,
            change_b: -0.03,
            spread: 0.08,
            threshold,
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 8)
                .unwrap()
                .and_hms_opt(14, 30, 0)
                .unwrap(),
        }
    }

    #[test]
    fn golden_output_without_image() {
        let expected = concat!(
            r#"<div style="font-family:微软雅黑, Arial; line-height:1.5; background:#fefefe; padding:15px; border:1px solid #ddd; border-radius:10px;">"#,
            r#"<h2 style="color:#333; text-align:center;">⚠️ 股票涨跌幅差提醒</h2>"#,
            r#"<table style="width:100%; border-collapse: collapse; margin-top:10px;">"#,
            r#"<tr><th style="text-align:left; padding:5px;">股票</th><th style="text-align:left; padding:5px;">公司</th><th style="text-align:left; padding:5px;">最新价</th><th style="text-align:left; padding:5px;">今日涨幅</th></tr>"#,
            r#"<tr style="border-top:1px solid #ccc;"><td style="padding:5px;"><b>600000</b></td><td style="padding:5px; color:#555;">浦发银行</td><td style="padding:5px;"><b>105.00</b></td><td style="padding:5px; color:red;">5.00%</td></tr>"#,
            r#"<tr style="border-top:1px solid #ccc;"><td style="padding:5px;"><b>000001</b></td><td style="padding:5px; color:#555;">平安银行</td><td style="padding:5px;"><b>97.00</b></td><td style="padding:5px; color:green;">-3.00%</td></tr>"#,
            r#"</table><div style="margin-top:10px; font-size:16px;"><b>差值:</b> <span style="color:red; font-size:18px;">8.00%</span> （阈值: 2.00%）</div>"#,
            r#"<div style="margin-top:10px; font-size:12px; color:#999;">更新时间: 2024-03-08 14:30:00</div></div>"#,
        );

        assert_eq!(render_alert(&event(0.02), None), expected);
    }

    #[test]
    fn image_block_precedes_title() {
        let html = render_alert(&event(0.02), Some("https://img.example/a.png"));

        let img = html.find(r#"<img src="https://img.example/a.png""#).unwrap();
        let title = html.find("<h2").unwrap();
        assert!(img < title);
    }

    #[test]
    fn spread_below_threshold_is_black() {
        let html = render_alert(&event(0.10), None);
        assert!(html.contains(r#"<span style="color:black; font-size:18px;">8.00%</span>"#));
        assert!(html.contains("（阈值: 10.00%）"));
    }

    #[test]
    fn flat_change_is_green_and_names_are_escaped() {
        let mut ev = event(0.02);
        ev.change_a = 0.0;
        ev.name_a = "A<B>&C".into();

        let html = render_alert(&ev, None);
        assert!(html.contains(r#"<td style="padding:5px; color:green;">0.00%</td>"#));
        assert!(html.contains("A&lt;B&gt;&amp;C"));
    }

    #[test]
    fn image_url_cannot_break_out_of_attribute() {
        let html = render_alert(&event(0.02), Some(r#"x.png" onerror="alert(1)"#));

        assert!(html.contains(r#"<img src="x.png&quot; onerror=&quot;alert(1)""#));
        assert!(!html.contains(r#"" onerror=""#));
    }
}
