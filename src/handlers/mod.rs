// Two tiers: public handlers (registration, token issuance) and protected
// handlers (todo CRUD behind the auth middleware).
pub mod auth;
pub mod todos;
