use std::sync::Arc;

use crate::config::AiConfig;
use crate::models::itinerary::{ItineraryRequest, PlanDay, PlanSource};
use crate::services::budget_service::{allocate, BudgetBreakdown, TravelStyle};
use crate::services::fallback_service::generate_fallback_plan;
use crate::services::gemini_service::{parse_ai_plan, AiError, GeminiClient, PlanModel};
use crate::services::prompt_service::build_prompt;

#[derive(Debug, Clone)]
pub struct PlannedItinerary {
    pub breakdown: BudgetBreakdown,
    pub plan: Vec<PlanDay>,
    pub source: PlanSource,
}

/// Produces day-by-day plans: from the AI model when one is configured and
/// answers usefully, otherwise from the template generator.
#[derive(Clone)]
pub struct ItineraryPlanner {
    model: Option<Arc<dyn PlanModel>>,
}

impl ItineraryPlanner {
    pub fn new(model: Option<Arc<dyn PlanModel>>) -> Self {
        Self { model }
    }

    pub fn from_config(config: &AiConfig) -> Self {
        // A missing key is not fatal; every plan just comes from the templates.
        let model = match GeminiClient::new(config) {
            Ok(client) => {
                log::info!("AI planner enabled with models: {}", config.models.join(", "));
                Some(Arc::new(client) as Arc<dyn PlanModel>)
            }
            Err(e) => {
                log::info!("AI planner not available: {}. Using template itineraries.", e);
                None
            }
        };
        Self { model }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub async fn plan(&self, request: &ItineraryRequest) -> PlannedItinerary {
        let style = TravelStyle::from_label(&request.travel_style);
        let breakdown = allocate(request.budget, request.days, style);

        if let Some(model) = &self.model {
            match self.plan_with_model(model.as_ref(), request, &breakdown).await {
                Ok(plan) => {
                    return PlannedItinerary {
                        breakdown,
                        plan,
                        source: PlanSource::Ai,
                    }
                }
                Err(e) => log::warn!(
                    "AI itinerary for {} failed ({}), using template plan",
                    request.city,
                    e
                ),
            }
        }

        PlannedItinerary {
            breakdown,
            plan: generate_fallback_plan(request, &breakdown),
            source: PlanSource::Fallback,
        }
    }

    async fn plan_with_model(
        &self,
        model: &dyn PlanModel,
        request: &ItineraryRequest,
        breakdown: &BudgetBreakdown,
    ) -> Result<Vec<PlanDay>, AiError> {
        let prompt = build_prompt(request, breakdown);
        let reply = model.generate(&prompt).await?;
        parse_ai_plan(&reply, request.days.max(0) as usize, breakdown.daily_budget)
    }
}
