use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub weekdays: String,
    pub weekend: String,
    #[serde(rename = "dayOff", default)]
    pub day_off: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttractionRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub coordinates: Coordinates,
    pub categories: Vec<String>,
    pub rating: f32,
    pub popularity_score: f32,
    pub working_hours: WorkingHours,
    #[serde(default)]
    pub contacts: Contacts,
    pub visit_duration: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    GetRoute,
    FindAttraction,
    GetInfo,
    #[serde(other)]
    General,
}

impl Intent {
    pub fn as_code(self) -> &'static str {
        match self {
            Self::GetRoute => "get_route",
            Self::FindAttraction => "find_attraction",
            Self::GetInfo => "get_info",
            Self::General => "general",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    pub intent: Intent,
    pub confidence: f32,
    pub destination: Option<String>,
    pub response_text: String,
    pub reasoning: Vec<String>,
}

impl IntentResult {
    pub fn wants_route(&self) -> Option<&str> {
        match (self.intent, self.destination.as_deref()) {
            (Intent::GetRoute, Some(name)) if !name.trim().is_empty() => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    Easy,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub name: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub start: Coordinates,
    pub end: Coordinates,
    pub waypoints: Vec<Waypoint>,
    pub estimated_distance: f64,
    pub estimated_duration: u32,
    pub difficulty_level: DifficultyLevel,
    pub highlights: Vec<String>,
    pub warnings: Vec<String>,
}

/// Compact destination block attached to a voice response next to its route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDestination {
    pub id: String,
    pub name: String,
    pub coordinates: Coordinates,
    pub categories: Vec<String>,
    pub rating: f32,
    pub popularity_score: f32,
    pub opening_hours: String,
    pub relevance_score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteData {
    pub destination: RouteDestination,
    pub route: RouteResult,
    pub reasoning: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteAlternative {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub estimated_duration: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceQueryInput {
    pub query: String,
    pub user_location: Option<Coordinates>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceQueryReply {
    pub intent: Intent,
    pub confidence: f32,
    pub destination: Option<RouteDestination>,
    pub fetchai_route: Option<RouteResult>,
    pub preferences: Vec<String>,
    pub reasoning: Vec<String>,
    pub alternatives: Vec<RouteAlternative>,
    pub response_text: String,
    pub route_data: Option<RouteData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRequest {
    pub destination_id: String,
    #[serde(default)]
    pub preferences: Option<Vec<String>>,
    #[serde(default)]
    pub user_location: Option<Coordinates>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteReply {
    pub destination: AttractionRecord,
    pub route: RouteResult,
    pub preferences: Vec<String>,
}
