use crate::models::itinerary::ItineraryRequest;
use crate::services::budget_service::{BudgetBreakdown, Pace};

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value.trim()
    }
}

/// Builds the instruction sent to the model for one itinerary request.
pub fn build_prompt(request: &ItineraryRequest, breakdown: &BudgetBreakdown) -> String {
    let pace = Pace::from_label(&request.pace);
    let interests = if request.interests.is_empty() {
        "general sightseeing".to_string()
    } else {
        request.interests.join(", ")
    };

    format!(
        "You are an expert travel planner for trips in India.\n\
         Create a {days}-day itinerary for {city}.\n\
         \n\
         Trip details:\n\
         - Total budget: ₹{total} (about ₹{daily} per day)\n\
         - Daily budget split: accommodation ₹{accommodation}, food ₹{food}, activities ₹{activities}, local transport ₹{transport}\n\
         - Travel style: {style}\n\
         - Accommodation preference: {stay}\n\
         - Pace: {pace_label} (about {per_day} activities per day)\n\
         - Getting around: {transport_mode}\n\
         - Interests: {interests}\n\
         \n\
         Respond with ONLY a JSON array of exactly {days} objects and no other text.\n\
         Each object must have these keys:\n\
         \"day\" (number, starting at 1), \"title\" (string), \"morning\" (string), \
         \"afternoon\" (string), \"evening\" (string), \"activities\" (array of strings), \
         \"approx_cost\" (number, estimated spend in rupees for that day).\n\
         Keep each day's approx_cost close to ₹{daily} and name real places in {city}.",
        days = request.days,
        city = request.city.trim(),
        total = breakdown.total,
        daily = breakdown.daily_budget,
        accommodation = breakdown.accommodation,
        food = breakdown.food,
        activities = breakdown.activities,
        transport = breakdown.transport,
        style = or_default(&request.travel_style, breakdown.style.describe()),
        stay = or_default(&request.accommodation, "no preference"),
        pace_label = or_default(&request.pace, "Standard"),
        per_day = pace.activities_per_day(),
        transport_mode = or_default(&request.transport_mode, "no preference"),
        interests = interests,
    )
}
