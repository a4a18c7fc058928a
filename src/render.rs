use crate::map::Popup;
use crate::types::{Kind, Workout};
use crate::utils::round1;
use std::fmt;

/// One entry of the workout list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub id: String,
    pub kind: Kind,
    pub title: String,
    pub distance: f64,
    pub duration: f64,
    /// Pace or speed, already rounded to one decimal.
    pub metric: f64,
    pub metric_unit: &'static str,
    pub detail: f64,
    pub detail_unit: &'static str,
}

impl ListRow {
    pub fn new(w: &Workout) -> Self {
        let (metric, metric_unit) = w.metric();
        let (detail, detail_unit) = w.detail();
        Self {
            id: w.id().to_string(),
            kind: w.kind(),
            title: w.title(),
            distance: w.distance(),
            duration: w.duration(),
            metric: round1(metric),
            metric_unit,
            detail,
            detail_unit,
        }
    }

    const fn detail_icon(&self) -> &'static str {
        match self.kind {
            Kind::Running => "🦶🏼",
            Kind::Cycling => "⛰",
        }
    }

    pub fn to_html(&self) -> String {
        let kind = self.kind;
        let field = |icon: &str, value: f64, unit: &str| {
            format!(
                "  <div class=\"workout__details\">\n    \
                 <span class=\"workout__icon\">{icon}</span>\n    \
                 <span class=\"workout__value\">{value}</span>\n    \
                 <span class=\"workout__unit\">{unit}</span>\n  \
                 </div>\n"
            )
        };

        let mut html = format!(
            "<li class=\"workout workout--{kind}\" data-id=\"{}\">\n  \
             <span class=\"delete\">X</span>\n  \
             <h2 class=\"workout__title\">{}</h2>\n",
            self.id, self.title
        );
        html.push_str(&field(kind.icon(), self.distance, "km"));
        html.push_str(&field("⏱", self.duration, "min"));
        html.push_str(&field("⚡️", self.metric, self.metric_unit));
        html.push_str(&field(self.detail_icon(), self.detail, self.detail_unit));
        html.push_str("</li>");
        html
    }
}

impl fmt::Display for ListRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}  {} km  {} min  {} {}  {} {}",
            self.id,
            self.kind.icon(),
            self.title,
            self.distance,
            self.duration,
            self.metric,
            self.metric_unit,
            self.detail,
            self.detail_unit,
        )
    }
}

/// The popup a workout marker opens with.
pub fn marker_popup(w: &Workout) -> Popup {
    let kind = w.kind();
    Popup::sticky(
        format!(
            "<span class=\"workout__icon\">{}</span> \
             <span class=\"workout__title\">{}</span>",
            kind.icon(),
            w.title()
        ),
        format!("{kind}-popup"),
    )
}

/// The list surface next to the entry form.
pub trait ListView {
    /// Insert directly below the form, above every earlier row.
    fn insert_after_form(&mut self, row: ListRow);
    fn clear(&mut self);
}

/// Keeps rows in display order, top first.
#[derive(Debug, Default, Clone)]
pub struct RecordingList {
    pub rows: Vec<ListRow>,
}

impl RecordingList {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ListView for RecordingList {
    fn insert_after_form(&mut self, row: ListRow) {
        self.rows.insert(0, row);
    }

    fn clear(&mut self) {
        self.rows.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coords;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn running() -> Workout {
        let t = Utc.with_ymd_and_hms(2024, 4, 14, 10, 0, 0).unwrap();
        Workout::running("42".into(), t, 6.0, 32.0, Coords::new(1.0, 2.0), 160.0).unwrap()
    }

    #[rstest]
    fn row_rounds_metric_to_one_decimal() {
        let row = ListRow::new(&running());
        assert_eq!(row.metric, 5.3);
        assert_eq!(row.metric_unit, "min/km");
        assert_eq!(row.detail, 160.0);
        assert_eq!(row.detail_unit, "spm");
        assert_eq!(
            row.to_string(),
            "[42] 🏃‍♂️ Running on April 14  6 km  32 min  5.3 min/km  160 spm"
        );
    }

    #[rstest]
    fn html_row_carries_id_and_delete_affordance() {
        let html = ListRow::new(&running()).to_html();
        assert!(html.starts_with("<li class=\"workout workout--running\" data-id=\"42\">"));
        assert!(html.contains("<span class=\"delete\">X</span>"));
        assert!(html.contains("<span class=\"workout__value\">5.3</span>"));
        assert!(html.contains("<span class=\"workout__unit\">spm</span>"));
        assert!(html.ends_with("</li>"));
    }

    #[rstest]
    fn popup_is_sticky_and_kind_styled() {
        let p = marker_popup(&running());
        assert_eq!(p.class_name.as_deref(), Some("running-popup"));
        assert!(!p.auto_close);
        assert!(!p.close_on_click);
        assert!(p.content.contains("Running on April 14"));
    }

    #[rstest]
    fn newest_row_goes_on_top() {
        let mut list = RecordingList::new();
        let mut a = ListRow::new(&running());
        a.id = "a".into();
        let mut b = a.clone();
        b.id = "b".into();
        list.insert_after_form(a);
        list.insert_after_form(b);
        let ids: Vec<&str> = list.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
