//! Plain-text rendering of admin payloads
//!
//! Payloads are opaque JSON. Renderers read the `data` envelope and treat
//! every missing or mistyped field as zero / empty rather than as an error.

use serde_json::Value;
use std::fmt::Write;

use super::controller::View;

/// Appointment ids are shortened to this many characters
const ID_PREFIX_LEN: usize = 12;

/// Display name for a country code
pub fn country_name(code: &str) -> &str {
    match code {
        "PE" => "Perú",
        "CL" => "Chile",
        other => other,
    }
}

/// The `data` envelope of a payload, or the payload itself
fn envelope(payload: &Value) -> &Value {
    payload.get("data").unwrap_or(payload)
}

fn count(value: &Value, pointer: &str) -> u64 {
    match value.pointer(pointer) {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().map(|f| f.max(0.0).round() as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Numbers and non-empty strings as the backend sent them
fn scalar(value: &Value, pointer: &str, default: &str) -> String {
    match value.pointer(pointer) {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => default.to_string(),
    }
}

fn text<'a>(value: &'a Value, pointer: &str) -> &'a str {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or("-")
}

fn items<'a>(value: &'a Value, pointer: &str) -> &'a [Value] {
    value
        .pointer(pointer)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Format an RFC 3339 timestamp for display, passing anything else through
fn format_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn short_id(id: &str) -> String {
    if id == "-" || id.chars().count() <= ID_PREFIX_LEN {
        return id.to_string();
    }
    let prefix: String = id.chars().take(ID_PREFIX_LEN).collect();
    format!("{}...", prefix)
}

/// Render the dashboard from a stats payload
pub fn render_dashboard(payload: &Value) -> String {
    let stats = envelope(payload);
    let mut out = String::new();

    let _ = writeln!(out, "Resumen");
    let _ = writeln!(out, "{}", "-".repeat(40));
    let _ = writeln!(
        out,
        "{:<24} {} ({}% éxito)",
        "Total citas:",
        count(stats, "/overview/totalAppointments"),
        scalar(stats, "/overview/successRate", "0")
    );
    let _ = writeln!(out, "{:<24} {}", "Pendientes:", count(stats, "/overview/pendingAppointments"));
    let _ = writeln!(out, "{:<24} {}", "Confirmadas:", count(stats, "/overview/confirmedAppointments"));
    let _ = writeln!(out, "{:<24} {}", "Completadas:", count(stats, "/overview/completedAppointments"));

    let _ = writeln!(out);
    let _ = writeln!(out, "Citas por país");
    let _ = writeln!(out, "{}", "-".repeat(40));
    let _ = writeln!(out, "{:<24} {}", country_name("PE"), count(stats, "/rds/pe"));
    let _ = writeln!(out, "{:<24} {}", country_name("CL"), count(stats, "/rds/cl"));

    let _ = writeln!(out);
    let _ = writeln!(out, "Citas por estado");
    let _ = writeln!(out, "{}", "-".repeat(40));
    let _ = writeln!(out, "{:<24} {}", "Pendientes", count(stats, "/rds/byStatus/pending"));
    let _ = writeln!(out, "{:<24} {}", "Confirmadas", count(stats, "/rds/byStatus/confirmed"));
    let _ = writeln!(out, "{:<24} {}", "Completadas", count(stats, "/rds/byStatus/completed"));

    let last_update = text(stats, "/performance/lastUpdate");
    let _ = writeln!(out);
    let _ = writeln!(out, "Rendimiento");
    let _ = writeln!(out, "{}", "-".repeat(40));
    let _ = writeln!(out, "{:<24} {}", "Estado:", text(stats, "/performance/systemHealth"));
    let _ = writeln!(out, "{:<24} {}", "Tiempo promedio:", text(stats, "/performance/avgProcessingTime"));
    let _ = writeln!(out, "{:<24} {}", "Última actualización:", format_date(last_update));

    out
}

/// Render the appointment list, merging both countries
pub fn render_appointments(payload: &Value) -> String {
    let data = envelope(payload);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Total: {}   {}: {}   {}: {}",
        count(data, "/summary/totalRDS"),
        country_name("PE"),
        count(data, "/summary/byCountry/PE"),
        country_name("CL"),
        count(data, "/summary/byCountry/CL")
    );
    let _ = writeln!(out);

    let rows: Vec<&Value> = items(data, "/rds/pe/appointments")
        .iter()
        .chain(items(data, "/rds/cl/appointments"))
        .collect();

    if rows.is_empty() {
        let _ = writeln!(out, "No hay citas registradas");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<16} {:<10} {:<8} {:<22} {:<16} {:<22} {:<11} {}",
        "ID Cita", "Asegurado", "País", "Médico", "Especialidad", "Centro", "Estado", "Fecha Cita"
    );
    let _ = writeln!(out, "{}", "-".repeat(124));

    for apt in rows {
        let _ = writeln!(
            out,
            "{:<16} {:<10} {:<8} {:<22} {:<16} {:<22} {:<11} {}",
            short_id(text(apt, "/appointment_id")),
            text(apt, "/insured_id"),
            text(apt, "/country_iso"),
            text(apt, "/medic_name"),
            text(apt, "/specialty_name"),
            text(apt, "/center_name"),
            text(apt, "/status"),
            format_date(text(apt, "/appointment_date"))
        );
    }

    out
}

/// Render medics grouped by country
pub fn render_medics(payload: &Value) -> String {
    let data = envelope(payload);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Total médicos: {}   {}: {}   {}: {}",
        count(data, "/summary/totalMedics"),
        country_name("PE"),
        count(data, "/summary/byCountry/PE"),
        country_name("CL"),
        count(data, "/summary/byCountry/CL")
    );

    for (code, pointer) in [("PE", "/pe"), ("CL", "/cl")] {
        let medics = items(data, pointer);
        let _ = writeln!(out);
        let _ = writeln!(out, "{} ({})", country_name(code), medics.len());
        let _ = writeln!(out, "{}", "-".repeat(60));

        for medic in medics {
            let _ = writeln!(
                out,
                "{}  [{} | {}]",
                text(medic, "/name"),
                text(medic, "/specialty_name"),
                text(medic, "/center_name")
            );
            let _ = writeln!(
                out,
                "    {}, {}",
                text(medic, "/center_address"),
                text(medic, "/center_city")
            );
            let _ = writeln!(
                out,
                "    ID: {} | Centro: {} | Especialidad: {}",
                scalar(medic, "/medic_id", "-"),
                scalar(medic, "/center_id", "-"),
                scalar(medic, "/specialty_id", "-")
            );
        }
    }

    out
}

/// Placeholder for views without a renderer yet
pub fn render_placeholder(view: View) -> String {
    format!("{} (Próximamente)\n", view.title())
}
