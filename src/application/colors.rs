use std::collections::HashMap;

const SERVICE_PALETTE: [&str; 8] = [
    "#f87171", "#fb923c", "#facc15", "#4ade80", "#2dd4bf", "#60a5fa", "#a78bfa", "#f472b6",
];
const FALLBACK_COLOR: &str = "#9ca3af";

// Colors are keyed by service identity, not list position, so filtering or
// reordering the upstream service list never reshuffles assigned colors.
#[derive(Debug, Default)]
pub struct ServiceColorMap {
    assignments: HashMap<String, &'static str>,
    next_index: usize,
}

impl ServiceColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color_for(&mut self, service_id: &str) -> &'static str {
        let service_id = service_id.trim();
        if service_id.is_empty() {
            return FALLBACK_COLOR;
        }
        if let Some(color) = self.assignments.get(service_id) {
            return color;
        }
        let color = SERVICE_PALETTE[self.next_index % SERVICE_PALETTE.len()];
        self.next_index += 1;
        self.assignments.insert(service_id.to_string(), color);
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_is_stable_under_reordering_and_filtering() {
        let mut map = ServiceColorMap::new();
        let cut = map.color_for("svc-cut");
        let colour = map.color_for("svc-colour");
        let blowdry = map.color_for("svc-blowdry");

        // Later lookups in any order, with services missing, keep assignments.
        assert_eq!(map.color_for("svc-blowdry"), blowdry);
        assert_eq!(map.color_for("svc-cut"), cut);
        assert_eq!(map.color_for("svc-colour"), colour);
        assert_ne!(cut, colour);
        assert_ne!(colour, blowdry);
    }

    #[test]
    fn palette_cycles_when_exhausted() {
        let mut map = ServiceColorMap::new();
        let first = map.color_for("svc-0");
        for index in 1..SERVICE_PALETTE.len() {
            map.color_for(&format!("svc-{index}"));
        }
        let wrapped = map.color_for("svc-overflow");
        assert_eq!(wrapped, first);
    }

    #[test]
    fn blank_service_id_gets_fallback_color() {
        let mut map = ServiceColorMap::new();
        assert_eq!(map.color_for("   "), FALLBACK_COLOR);
        assert_eq!(map.color_for(""), FALLBACK_COLOR);
    }
}
