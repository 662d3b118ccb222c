//! Contribution-graph SVG rendering.
//!
//! Week-major grid of day cells, most recent 53 weeks, with month labels
//! above the first week whose month name differs from the previous week's.
//! Cell intensity comes from the day's quartile level, never the raw count.

use crate::contributions::{ContributionCalendar, ContributionDay, level_index};
use crate::markdown::escape_html;
use chrono::NaiveDate;

const WEEK_LIMIT: usize = 53;
const DAYS_PER_WEEK: usize = 7;
const CELL: i32 = 11;
const GAP: i32 = 3;
const STEP: i32 = CELL + GAP;
const TOP_GUTTER: i32 = 20;

#[derive(Clone, Copy)]
pub enum Theme {
    Dark,
    Light,
}

pub struct ThemeColors {
    pub bg: &'static str,
    pub text: &'static str,
    pub levels: [&'static str; 5],
}

impl Theme {
    pub fn colors(self) -> ThemeColors {
        match self {
            Theme::Dark => ThemeColors {
                bg: "#161b22",
                text: "#c9d1d9",
                levels: ["#21262d", "#0e4429", "#006d32", "#26a641", "#39d353"],
            },
            Theme::Light => ThemeColors {
                bg: "#ffffff",
                text: "#24292f",
                levels: ["#ebedf0", "#9be9a8", "#40c463", "#30a14e", "#216e39"],
            },
        }
    }
}

/// Tooltip text for a day cell or the year total.
pub fn contribution_title(count: u64) -> String {
    match count {
        0 => "no contributions".to_string(),
        1 => "1 contribution".to_string(),
        n => format!("{n} contributions"),
    }
}

/// Month label for a week, from its first day that parses as a date.
fn week_month(days: &[ContributionDay]) -> Option<String> {
    days.iter()
        .filter_map(|day| NaiveDate::parse_from_str(&day.date, "%Y-%m-%d").ok())
        .map(|date| date.format("%b").to_string())
        .next()
}

/// Renders the calendar as an inline SVG, labelled for screen readers.
pub fn generate_graph(calendar: &ContributionCalendar, handle: &str, theme: Theme) -> String {
    let colors = theme.colors();

    let start = calendar.weeks.len().saturating_sub(WEEK_LIMIT);
    let weeks = &calendar.weeks[start..];

    let width = weeks.len() as i32 * STEP + GAP;
    let height = TOP_GUTTER + DAYS_PER_WEEK as i32 * STEP + GAP;

    let mut cells = String::new();
    let mut labels = String::new();
    let mut previous_month: Option<String> = None;

    for (week_index, week) in weeks.iter().enumerate() {
        let x = week_index as i32 * STEP + GAP;

        // Month labels compare the month name as a string, not calendar
        // boundaries.
        if let Some(month) = week_month(&week.days) {
            if previous_month.as_deref() != Some(&month) {
                labels.push_str(&format!(
                    "<text x=\"{x}\" y=\"{}\" class=\"month\">{month}</text>\n",
                    TOP_GUTTER - 6
                ));
                previous_month = Some(month);
            }
        }

        for day_index in 0..DAYS_PER_WEEK {
            let y = TOP_GUTTER + day_index as i32 * STEP;
            // Short trailing weeks render padded empty days.
            let (count, level) = match week.days.get(day_index) {
                Some(day) => (day.count, level_index(day.level.as_deref())),
                None => (0, 0),
            };
            let fill = colors.levels[level as usize];
            cells.push_str(&format!(
                "<rect x=\"{x}\" y=\"{y}\" width=\"{CELL}\" height=\"{CELL}\" rx=\"2\" fill=\"{fill}\"><title>{}</title></rect>\n",
                contribution_title(u64::from(count))
            ));
        }
    }

    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}"
     role="img" aria-label="GitHub contributions for @{handle}: {total} in the last year"
     font-family="ConsolasFallback,Consolas,monospace" font-size="10px">
<style>
.month {{ fill: {text}; }}
</style>
<rect width="{width}" height="{height}" fill="{bg}" rx="6"/>
{labels}{cells}</svg>
"#,
        total = contribution_title(calendar.total),
        text = colors.text,
        bg = colors.bg,
        handle = escape_html(handle),
    )
}
