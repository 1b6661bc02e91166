use crate::catalog::Catalog;
use crate::models::{
    AttractionRecord, Coordinates, DifficultyLevel, RouteAlternative, RouteData,
    RouteDestination, RouteResult, Waypoint,
};

/// Pavlodar city centre; every synthesized route starts here.
pub const ROUTE_START: Coordinates = Coordinates::new(52.2900, 76.9500);

const WAYPOINT_TRIGGER_POPULARITY: f32 = 0.8;
const WAYPOINT_MIN_POPULARITY: f32 = 0.7;
const MAX_WAYPOINTS: usize = 2;
const BASE_DISTANCE_KM: f64 = 8.5;
const BASE_DURATION_MINUTES: u32 = 60;
const MEDIUM_DIFFICULTY_KM: f64 = 15.0;
const PLACEHOLDER_RELEVANCE: f32 = 13.4;
const FALLBACK_ALTERNATIVE_MINUTES: u32 = 120;

pub fn synthesize_route(destination: &AttractionRecord, catalog: &Catalog) -> RouteResult {
    let waypoints = if destination.popularity_score > WAYPOINT_TRIGGER_POPULARITY {
        catalog
            .list_all()
            .iter()
            .filter(|candidate| {
                candidate.id != destination.id
                    && candidate.popularity_score > WAYPOINT_MIN_POPULARITY
            })
            .take(MAX_WAYPOINTS)
            .map(|candidate| Waypoint {
                name: candidate.name.clone(),
                coordinates: candidate.coordinates,
            })
            .collect()
    } else {
        Vec::new()
    };

    let hash = stable_hash(&destination.id);
    let estimated_distance = BASE_DISTANCE_KM + (hash % 10) as f64;
    let estimated_duration = BASE_DURATION_MINUTES + (hash % 120) as u32;
    let difficulty_level = if estimated_distance < MEDIUM_DIFFICULTY_KM {
        DifficultyLevel::Easy
    } else {
        DifficultyLevel::Medium
    };

    RouteResult {
        start: ROUTE_START,
        end: destination.coordinates,
        waypoints,
        estimated_distance,
        estimated_duration,
        difficulty_level,
        highlights: vec![
            "Исторический центр".to_string(),
            "Живописные виды".to_string(),
        ],
        warnings: Vec::new(),
    }
}

pub fn route_destination(record: &AttractionRecord) -> RouteDestination {
    RouteDestination {
        id: record.id.clone(),
        name: record.name.clone(),
        coordinates: record.coordinates,
        categories: record.categories.clone(),
        rating: record.rating,
        popularity_score: record.popularity_score,
        opening_hours: record.working_hours.weekdays.clone(),
        relevance_score: PLACEHOLDER_RELEVANCE,
    }
}

pub fn build_route_data(record: &AttractionRecord, catalog: &Catalog) -> RouteData {
    let route = synthesize_route(record, catalog);
    let reasoning = vec![format!(
        "Добавлены {} интересные остановки по пути",
        route.waypoints.len()
    )];

    RouteData {
        destination: route_destination(record),
        route,
        reasoning,
    }
}

pub fn comprehensive_alternative(route: Option<&RouteResult>) -> RouteAlternative {
    let base = route
        .map(|route| route.estimated_duration)
        .unwrap_or(FALLBACK_ALTERNATIVE_MINUTES);

    RouteAlternative {
        kind: "comprehensive".to_string(),
        description: "Подробный осмотр с дополнительными остановками".to_string(),
        estimated_duration: base + 60,
    }
}

/// 64-bit FNV-1a over the UTF-8 bytes.
pub fn stable_hash(value: &str) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in value.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}
