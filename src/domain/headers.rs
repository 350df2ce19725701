use crate::domain::entities::field::FieldDescriptor;

pub const SERIAL_NO_PATTERNS: [&str; 5] = ["serial no", "serial", "sno", "sr no", "sr.no"];
pub const SERVICE_ID_PATTERNS: [&str; 3] = ["service id", "serviceid", "service_id"];

pub fn is_serial_label(label: &str) -> bool {
    let lower = label.to_lowercase();
    SERIAL_NO_PATTERNS.iter().any(|pattern| lower.contains(pattern))
}

pub fn is_service_id_label(label: &str) -> bool {
    let lower = label.to_lowercase();
    SERVICE_ID_PATTERNS.iter().any(|pattern| lower.contains(pattern))
}

fn header_rank(field: &FieldDescriptor) -> u8 {
    if is_serial_label(&field.label) {
        0
    } else if is_service_id_label(&field.label) {
        1
    } else {
        2
    }
}

/// Drops the trailing control column, then moves serial-number columns
/// first and service-id columns second. The sort is stable so every other
/// column keeps its relative order.
pub fn resolve_headers(raw: &[FieldDescriptor]) -> Vec<FieldDescriptor> {
    let Some((_control, visible)) = raw.split_last() else {
        return Vec::new();
    };
    let mut resolved = visible.to_vec();
    resolved.sort_by_key(header_rank);
    resolved
}
