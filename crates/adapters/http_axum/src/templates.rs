//! HTML templates for the dashboard.
//!
//! Embedded templates with plain string interpolation — no template-engine
//! dependency. All render functions are pure: reading + state in, markup
//! out.

use tankhub_domain::level::LevelState;
use tankhub_domain::reading::TankReading;

/// Render one `<tr>` for a tank reading.
///
/// The row is keyed by the tank id (`id` attribute) so it can be located
/// and replaced wholesale when an update for that tank arrives. The
/// fill-bar width is always the rounded percentage; `state` only selects
/// the CSS class. An absent percentage renders empty text and zero width,
/// an absent last-updated renders empty text. Disabled tanks get the
/// `hidden` attribute so they stay in the document without being shown.
#[must_use]
pub fn tank_row(reading: &TankReading, state: LevelState) -> String {
    let (percentage_text, fill_width) = match reading.percentage {
        #[allow(clippy::cast_possible_truncation)]
        Some(percentage) => {
            let rounded = percentage.round() as i64;
            (format!("{rounded}%"), rounded)
        }
        None => (String::new(), 0),
    };
    let last_updated = reading.last_updated.as_deref().unwrap_or("");
    let hidden = if reading.enabled { "" } else { " hidden" };
    let state = state.as_str();
    format!(
        r#"<tr id="{id}"{hidden}>
  <td class="tank-cell">
    <div class="tank-label">{label}</div>
    <div class="last-updated">{last_updated}</div>
  </td>
  <td class="gauge-cell">
    <div class="gauge">
      <div class="gauge-fill {state}" style="width: {fill_width}%;"></div>
      <div class="gauge-text {state}">{percentage_text}</div>
    </div>
  </td>
</tr>"#,
        id = escape(reading.id.as_str()),
        label = escape(&reading.label),
        last_updated = escape(last_updated),
    )
}

/// Render the tank container for the given readings.
///
/// More than one tank gets the full panel with a heading and a bordered
/// table; a single tank gets the minimal variant. Disabled tanks count
/// toward this decision — they are in the document, just hidden.
#[must_use]
pub fn tank_container(readings: &[TankReading]) -> String {
    let rows: Vec<String> = readings
        .iter()
        .map(|reading| tank_row(reading, LevelState::classify(reading)))
        .collect();
    let rows = rows.join("\n");
    if readings.len() > 1 {
        format!(
            "<p class=\"tank-heading\">Water Tanks</p>\n\
             <div id=\"tank-container\">\n\
             <table id=\"tank-table\" class=\"many\">\n{rows}\n</table>\n\
             </div>"
        )
    } else {
        format!(
            "<div id=\"tank-container\">\n\
             <table id=\"tank-table\">\n{rows}\n</table>\n\
             </div>"
        )
    }
}

/// Render the complete dashboard page.
///
/// The page auto-reloads every `refresh_secs` seconds via
/// `<meta http-equiv="refresh">` — no JavaScript involved.
#[must_use]
pub fn dashboard_page(readings: &[TankReading], refresh_secs: u16) -> String {
    let container = tank_container(readings);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta http-equiv="refresh" content="{refresh_secs}">
<title>tankhub</title>
<style>
body {{ font-family: sans-serif; margin: 2em auto; max-width: 48em; }}
.tank-heading {{ padding-top: 1em; font-weight: bold; }}
#tank-table {{ width: 100%; padding: 4px; border-collapse: collapse; }}
#tank-table.many {{ border: 1px solid #2e3959; border-radius: 12px; }}
.tank-cell {{ white-space: nowrap; padding: 0.5em; }}
.tank-label {{ font-weight: bold; }}
.last-updated {{ font-size: 0.8em; color: #666; }}
.gauge-cell {{ width: 100%; padding: 0.5em; }}
.gauge {{ position: relative; width: 100%; height: 2em; background-color: lightcyan;
  border: 1px solid cyan; border-radius: 10px; overflow: hidden; }}
.gauge-fill {{ position: absolute; height: 100%; z-index: 2; }}
.gauge-text {{ position: absolute; width: 100%; height: 100%; z-index: 3;
  text-align: center; line-height: 2em; }}
.gauge-fill.normal {{ background-color: #7fd4e8; }}
.gauge-fill.warning {{ background-color: #f0c649; }}
.gauge-fill.critical {{ background-color: #e05c4b; }}
.gauge-fill.overflow {{ background-color: #7a6ff0; }}
.gauge-text.sensor_error {{ color: #e05c4b; }}
</style>
</head>
<body>
{container}
</body>
</html>"#
    )
}

/// Minimal HTML escaping for interpolated text and attribute values.
fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
