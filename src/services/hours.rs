//! Business hours formatting for the site header and footer

use crate::models::BusinessHours;

const WEEKDAYS: [(&str, &str); 5] = [
    ("monday", "Mon"),
    ("tuesday", "Tue"),
    ("wednesday", "Wed"),
    ("thursday", "Thu"),
    ("friday", "Fri"),
];

const ALL_DAYS: [(&str, &str); 7] = [
    ("monday", "Mon"),
    ("tuesday", "Tue"),
    ("wednesday", "Wed"),
    ("thursday", "Thu"),
    ("friday", "Fri"),
    ("saturday", "Sat"),
    ("sunday", "Sun"),
];

const CLOSED: &str = "Closed";

fn open_hours<'a>(hours: &'a BusinessHours, day: &str) -> Option<&'a str> {
    hours
        .get(day)
        .map(String::as_str)
        .filter(|h| !h.is_empty() && *h != CLOSED)
}

/// One-line summary, e.g. `Mon-Fri: 7:00 AM - 6:00 PM | Sat: 8:00 AM - 4:00 PM`
pub fn format_business_hours(hours: Option<&BusinessHours>) -> String {
    let Some(hours) = hours else {
        return "Mon-Fri: 7AM-6PM | Sat: 8AM-4PM".to_string();
    };

    let monday = hours.get("monday").filter(|h| !h.is_empty());
    let weekdays_match = WEEKDAYS
        .iter()
        .all(|(day, _)| hours.get(*day).filter(|h| !h.is_empty()) == monday);

    let mut parts = Vec::new();
    match monday {
        Some(shared) if weekdays_match => parts.push(format!("Mon-Fri: {}", shared)),
        _ => {
            for (day, label) in WEEKDAYS {
                if let Some(h) = open_hours(hours, day) {
                    parts.push(format!("{}: {}", label, h));
                }
            }
        }
    }

    if let Some(h) = open_hours(hours, "saturday") {
        parts.push(format!("Sat: {}", h));
    }
    if let Some(h) = open_hours(hours, "sunday") {
        parts.push(format!("Sun: {}", h));
    }

    if parts.is_empty() {
        "Hours vary by day".to_string()
    } else {
        parts.join(" | ")
    }
}

/// One line per day for the contact section
pub fn format_detailed_hours(hours: Option<&BusinessHours>) -> Vec<String> {
    let Some(hours) = hours else {
        return vec![
            "Mon-Fri: 7:00 AM - 6:00 PM".to_string(),
            "Sat: 8:00 AM - 4:00 PM".to_string(),
            "Sun: Closed".to_string(),
        ];
    };

    ALL_DAYS
        .iter()
        .map(|(day, label)| format!("{}: {}", label, open_hours(hours, day).unwrap_or(CLOSED)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_hours;

    fn hours(pairs: &[(&str, &str)]) -> BusinessHours {
        pairs
            .iter()
            .map(|(d, h)| (d.to_string(), h.to_string()))
            .collect()
    }

    #[test]
    fn test_missing_hours_use_fallbacks() {
        assert_eq!(format_business_hours(None), "Mon-Fri: 7AM-6PM | Sat: 8AM-4PM");
        assert_eq!(format_detailed_hours(None).len(), 3);
    }

    #[test]
    fn test_uniform_weekdays_collapse() {
        let h = default_hours();
        assert_eq!(
            format_business_hours(Some(&h)),
            "Mon-Fri: 7:00 AM - 6:00 PM | Sat: 8:00 AM - 4:00 PM"
        );
    }

    #[test]
    fn test_uniform_closed_weekdays_still_collapse() {
        let h = hours(&[
            ("monday", "Closed"),
            ("tuesday", "Closed"),
            ("wednesday", "Closed"),
            ("thursday", "Closed"),
            ("friday", "Closed"),
            ("saturday", "9-5"),
        ]);
        assert_eq!(format_business_hours(Some(&h)), "Mon-Fri: Closed | Sat: 9-5");
    }

    #[test]
    fn test_mixed_weekdays_listed_individually() {
        let mut h = default_hours();
        h.insert("friday".to_string(), "7:00 AM - 3:00 PM".to_string());
        h.insert("wednesday".to_string(), "Closed".to_string());
        h.insert("sunday".to_string(), "10:00 AM - 2:00 PM".to_string());

        assert_eq!(
            format_business_hours(Some(&h)),
            "Mon: 7:00 AM - 6:00 PM | Tue: 7:00 AM - 6:00 PM | Thu: 7:00 AM - 6:00 PM | \
             Fri: 7:00 AM - 3:00 PM | Sat: 8:00 AM - 4:00 PM | Sun: 10:00 AM - 2:00 PM"
        );
    }

    #[test]
    fn test_nothing_open() {
        let h = hours(&[("tuesday", "Closed")]);
        assert_eq!(format_business_hours(Some(&h)), "Hours vary by day");
        assert_eq!(format_business_hours(Some(&BusinessHours::new())), "Hours vary by day");
    }

    #[test]
    fn test_detailed_lists_every_day() {
        let h = hours(&[("monday", "8-4"), ("saturday", "Closed")]);
        let lines = format_detailed_hours(Some(&h));
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "Mon: 8-4");
        assert_eq!(lines[1], "Tue: Closed");
        assert_eq!(lines[5], "Sat: Closed");
        assert_eq!(lines[6], "Sun: Closed");
    }
}
