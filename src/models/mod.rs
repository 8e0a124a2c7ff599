pub mod city;
pub mod itinerary;
pub mod mechanic;
pub mod service_request;
pub mod user;
