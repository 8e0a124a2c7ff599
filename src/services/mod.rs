pub mod auth_service;
pub mod budget_service;
pub mod city_service;
pub mod fallback_service;
pub mod gemini_service;
pub mod itinerary_service;
pub mod mechanic_service;
pub mod planner_service;
pub mod prompt_service;
pub mod request_service;
pub mod user_service;
