// handlers/protected/mod.rs - Handlers behind token_auth_middleware
//
// Every handler here receives the caller as Extension<AuthUser> and scopes
// all store access to that user. Nested resources resolve their parent
// through the same scope, so another user's ids behave as if absent.

pub mod account; // GET|PUT|PATCH|DELETE /users, POST /users/logout
pub mod airports; // /airports[/:icao]
pub mod briefs; // /flights/:flight_id/briefs[/:brief_id]
pub mod flights; // /flights[/:flight_id]
pub mod hazards; // /flights/:flight_id/briefs/:brief_id/hazards[/:hazard_id]
pub mod lists; // /lists[/:list_id]
pub mod named_locations; // /named-locations[/:city]
pub mod tasks; // /lists/:list_id/tasks[/:task_id]
pub mod weather; // /coordinates, /metars, /tafs

/*
 * Resource Handler Shape:
 *
 *   list     GET    collection   -> 200 [..]   (empty is [], never 404)
 *   create   POST   collection   -> 201 {..}
 *   show     GET    member       -> 200 {..}
 *   update   PUT    member       -> 200 {..}   (PATCH routes here too)
 *   destroy  DELETE member       -> 204
 *
 * Extractor order: State, Extension<AuthUser>, ApiPath, then ApiJson last
 * since it consumes the body.
 */
