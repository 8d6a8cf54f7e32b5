// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) -> Protected (Token auth)
//
// Routing lives in routes.rs; this module only groups handlers by the
// security tier they run under.
pub mod protected; // Tier 2: `Authorization: Token <key>` required (/api/v1/*)
pub mod public; // Tier 1: No authentication required (/, /health, signup, login)

/*
Directory structure:
src/
├── handlers/
│   ├── mod.rs              ← This file
│   ├── public/
│   │   ├── root.rs         ← GET /, GET /health
│   │   └── auth.rs         ← POST /api/v1/users/signup, /login
│   └── protected/
│       ├── account.rs      ← /api/v1/users profile, logout
│       ├── airports.rs     ← /api/v1/airports[/:icao]
│       ├── flights.rs      ← /api/v1/flights[/:flight_id]
│       ├── briefs.rs       ← .../briefs[/:brief_id]
│       ├── hazards.rs      ← .../hazards[/:hazard_id]
│       ├── named_locations.rs
│       ├── lists.rs
│       ├── tasks.rs
│       └── weather.rs      ← coordinates, METAR, TAF proxies
│
└── routes.rs               ← Router assembly and global layers
*/
