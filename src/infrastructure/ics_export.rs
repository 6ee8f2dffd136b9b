use crate::domain::models::AppointmentRecord;
use chrono::{DateTime, Duration, Utc};

const CALENDAR_HEADER: [&str; 5] = [
    "BEGIN:VCALENDAR",
    "VERSION:2.0",
    "PRODID:-//Chairside//Scheduling Engine//EN",
    "CALSCALE:GREGORIAN",
    "METHOD:PUBLISH",
];
const UID_DOMAIN: &str = "chairside";
const MAX_LINE_OCTETS: usize = 75;

pub fn export_schedule(records: &[AppointmentRecord], now: DateTime<Utc>) -> String {
    let mut lines: Vec<String> = CALENDAR_HEADER.iter().map(ToString::to_string).collect();

    for record in records {
        if !record.has_start() {
            continue;
        }
        let start = parse_instant_or(record.start_at.as_deref(), now);
        let end = match parse_instant(record.end_at.as_deref()) {
            Some(parsed) if parsed > start => parsed,
            _ => start + Duration::minutes(30),
        };

        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{}@{UID_DOMAIN}", record.id.trim()));
        lines.push(format!("DTSTAMP:{}", format_instant(now)));
        lines.push(format!("DTSTART:{}", format_instant(start)));
        lines.push(format!("DTEND:{}", format_instant(end)));
        lines.push(format!("SUMMARY:{}", escape_text(&summary_for(record))));
        lines.push(format!("STATUS:{}", status_for(record)));
        if let Some(notes) = record
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        {
            lines.push(format!("DESCRIPTION:{}", escape_text(notes)));
        }
        let staff_name = record.staff_name.trim();
        if !staff_name.is_empty() {
            lines.push(format!(
                "ORGANIZER;CN={}:MAILTO:noreply@{UID_DOMAIN}.app",
                escape_text(staff_name)
            ));
        }
        lines.push("END:VEVENT".to_string());
    }

    lines.push("END:VCALENDAR".to_string());

    let mut document = String::new();
    for line in lines {
        document.push_str(&fold_line(&line));
        document.push_str("\r\n");
    }
    document
}

fn summary_for(record: &AppointmentRecord) -> String {
    let parts = [record.customer_name.trim(), record.service_name.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>();
    if parts.is_empty() {
        return "Appointment".to_string();
    }
    parts.join(" - ")
}

fn status_for(record: &AppointmentRecord) -> &'static str {
    match record
        .status
        .as_deref()
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("confirmed") => "CONFIRMED",
        Some("cancelled") | Some("canceled") => "CANCELLED",
        _ => "TENTATIVE",
    }
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%dT%H%M%SZ").to_string()
}

fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

fn fold_line(line: &str) -> String {
    let mut folded = String::with_capacity(line.len());
    let mut octets = 0usize;
    let mut continuation = false;
    for ch in line.chars() {
        let width = ch.len_utf8();
        let limit = if continuation {
            MAX_LINE_OCTETS - 1
        } else {
            MAX_LINE_OCTETS
        };
        if octets + width > limit {
            folded.push_str("\r\n ");
            continuation = true;
            octets = 0;
        }
        folded.push(ch);
        octets += width;
    }
    folded
}

fn parse_instant(value: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = value.map(str::trim).filter(|raw| !raw.is_empty())?;
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .ok()
}

fn parse_instant_or(value: Option<&str>, fallback: DateTime<Utc>) -> DateTime<Utc> {
    parse_instant(value).unwrap_or(fallback)
}
