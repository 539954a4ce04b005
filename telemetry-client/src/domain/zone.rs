use serde::Serialize;

/// Static metadata for one production zone: display name and the cost
/// category the zone is billed under.
#[derive(Debug, Clone, Serialize)]
pub struct Zone {
    pub id: i32,
    pub name: &'static str,
    pub category: &'static str,
}

/// The single source of truth for zone metadata. Consumed by reference
/// everywhere, including by clients via the `/api/zones` endpoint.
pub const ZONES: [Zone; 11] = [
    Zone { id: 1, name: "PLATING", category: "C-49" },
    Zone { id: 2, name: "DIE CASTING + CHINA BUFFING + CNC", category: "C-50" },
    Zone { id: 3, name: "SCOTCH BUFFING", category: "C-50" },
    Zone { id: 4, name: "BUFFING", category: "C-49" },
    Zone { id: 5, name: "SPRAY+EPL-I", category: "C-50" },
    Zone { id: 6, name: "SPRAY+EPL-II", category: "C-49" },
    Zone { id: 7, name: "RUMBLE", category: "C-50" },
    Zone { id: 8, name: "AIR COMPRESSOR", category: "C-49" },
    Zone { id: 9, name: "TERRACE", category: "C-49" },
    Zone { id: 10, name: "TOOL ROOM", category: "C-50" },
    Zone { id: 11, name: "ADMIN BLOCK", category: "C-50" },
];

pub fn zone_by_id(id: i32) -> Option<&'static Zone> {
    ZONES.iter().find(|z| z.id == id)
}
