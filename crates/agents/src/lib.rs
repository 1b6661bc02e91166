use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tourgid_core::{
    build_route_data, comprehensive_alternative, normalize_text, synthesize_route,
    AttractionRecord, Catalog, Coordinates, Intent, RouteReply, RouteRequest, VoiceQueryInput,
    VoiceQueryReply,
};
use tourgid_gateway::{CompletionClient, LanguageModelGateway};
use tourgid_observability::AppMetrics;
use tracing::{info, instrument};
use uuid::Uuid;

const CONTEXT_ATTRACTIONS: usize = 5;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Destination not found")]
    DestinationNotFound(String),
    #[error("query must not be empty")]
    EmptyQuery,
}

#[derive(Clone)]
pub struct GuideAgent<C>
where
    C: CompletionClient,
{
    catalog: Arc<Catalog>,
    gateway: LanguageModelGateway<C>,
    metrics: Arc<AppMetrics>,
}

impl<C> GuideAgent<C>
where
    C: CompletionClient,
{
    pub fn new(catalog: Arc<Catalog>, client: C, metrics: Arc<AppMetrics>) -> Self {
        Self {
            catalog,
            gateway: LanguageModelGateway::new(client),
            metrics,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn gateway(&self) -> &LanguageModelGateway<C> {
        &self.gateway
    }

    pub fn attractions(&self) -> &[AttractionRecord] {
        self.metrics.inc_request();
        self.catalog.list_all()
    }

    #[instrument(skip(self, input), fields(query_id = %Uuid::new_v4()))]
    pub async fn process_voice_query(
        &self,
        input: VoiceQueryInput,
    ) -> Result<VoiceQueryReply, AgentError> {
        let started = Instant::now();
        self.metrics.inc_request();

        if normalize_text(&input.query).is_empty() {
            return Err(AgentError::EmptyQuery);
        }

        let context = build_context(&self.catalog, input.user_location);
        let outcome = self.gateway.interpret_outcome(&input.query, &context).await;
        if outcome.is_fallback() {
            self.metrics.inc_fallback();
        }
        let interpreted = outcome.into_intent();

        let route_data = interpreted
            .wants_route()
            .and_then(|name| self.catalog.find_by_name_substring(name))
            .map(|record| build_route_data(record, &self.catalog));
        if route_data.is_some() {
            self.metrics.inc_route();
        }

        let alternatives = if interpreted.intent == Intent::GetRoute {
            vec![comprehensive_alternative(
                route_data.as_ref().map(|data| &data.route),
            )]
        } else {
            Vec::new()
        };

        self.metrics.observe_latency(started.elapsed());
        info!(
            intent = interpreted.intent.as_code(),
            confidence = interpreted.confidence,
            destination = route_data
                .as_ref()
                .map(|data| data.destination.id.as_str())
                .unwrap_or("-"),
            "voice query handled"
        );

        Ok(VoiceQueryReply {
            intent: interpreted.intent,
            confidence: interpreted.confidence,
            destination: route_data.as_ref().map(|data| data.destination.clone()),
            fetchai_route: route_data.as_ref().map(|data| data.route.clone()),
            preferences: Vec::new(),
            reasoning: interpreted.reasoning,
            alternatives,
            response_text: interpreted.response_text,
            route_data,
        })
    }

    pub fn generate_route(&self, request: RouteRequest) -> Result<RouteReply, AgentError> {
        self.metrics.inc_request();

        let destination = self
            .catalog
            .find_by_id(&request.destination_id)
            .ok_or_else(|| AgentError::DestinationNotFound(request.destination_id.clone()))?;

        let route = synthesize_route(destination, &self.catalog);
        self.metrics.inc_route();
        info!(
            destination = %destination.id,
            distance_km = route.estimated_distance,
            waypoints = route.waypoints.len(),
            "route generated"
        );

        Ok(RouteReply {
            destination: destination.clone(),
            route,
            preferences: request.preferences.unwrap_or_default(),
        })
    }
}

fn build_context(catalog: &Catalog, user_location: Option<Coordinates>) -> String {
    let names = catalog
        .head(CONTEXT_ATTRACTIONS)
        .iter()
        .map(|record| record.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut context = format!("Достопримечательности: {names}");
    if let Some(location) = user_location {
        context.push_str(&format!(
            " Пользователь в: {}, {}",
            location.latitude, location.longitude
        ));
    }
    context
}
